//! Kurumadai - car money (車代) tracking for away games
//!
//! A CLI tool that records driver reimbursements and assigns
//! participants to car-pool seats.

use clap::Parser;
use kurumadai::cli::Cli;
use kurumadai::commands;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
