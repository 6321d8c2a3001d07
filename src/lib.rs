//! Kurumadai Library
//!
//! Car money (車代) reimbursement tracking and car-pool seat
//! assignment for a team's away games.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod infrastructure;
pub mod output;
