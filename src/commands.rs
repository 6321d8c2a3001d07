//! Command handlers

use crate::app::{self, DriverEntry, FareSelection, SubmissionForm};
use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::domain::model::Amount;
use crate::domain::repository::TripLogRepository;
use crate::domain::service::{
    assign_seats, base_amount_for_distance, calculate_fare, summarize, AssignmentOptions,
    FareInput,
};
use crate::error::{Error, Result};
use crate::export::{export_to_csv, export_to_excel};
use crate::infrastructure::distance::DistanceService;
use crate::infrastructure::persistence::parse_date;
use crate::infrastructure::{load_roster, CsvDistanceTable, CsvTripLog};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Submit {
            date,
            drivers,
            amount,
            destination,
            one_way,
            toll_round_trip,
            toll_one_way,
            toll_cost,
        } => cmd_submit(
            &cli,
            &config,
            output_format,
            date.clone(),
            drivers,
            *amount,
            destination.clone(),
            *one_way,
            *toll_round_trip,
            *toll_one_way,
            toll_cost.as_deref(),
        ),

        Commands::Fare {
            amount,
            distance_km,
            one_way,
            toll_round_trip,
            toll_one_way,
            toll_cost,
        } => cmd_fare(
            &config,
            output_format,
            *amount,
            *distance_km,
            *one_way,
            *toll_round_trip,
            *toll_one_way,
            toll_cost.as_deref(),
        ),

        Commands::Summary => cmd_summary(&config, output_format),

        Commands::Pending => cmd_pending(&config, output_format),

        Commands::Resolve {
            date,
            driver,
            toll_cost,
        } => cmd_resolve(&config, output_format, date, driver, *toll_cost),

        Commands::Undo { batch } => cmd_undo(&config, batch),

        Commands::Delete { date, driver } => cmd_delete(&config, date, driver),

        Commands::Assign {
            roster,
            attending,
            vehicles,
            seed,
        } => cmd_assign(
            &config,
            output_format,
            roster.clone(),
            attending.as_deref(),
            *vehicles,
            *seed,
        ),

        Commands::Export { output } => cmd_export(&config, output),

        Commands::Config {
            show,
            set_log,
            set_roster,
            set_distance_table,
            set_origin,
            set_output,
            reset,
        } => cmd_config(
            config.clone(),
            *show,
            set_log.clone(),
            set_roster.clone(),
            set_distance_table.clone(),
            set_origin.clone(),
            *set_output,
            *reset,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_submit(
    cli: &Cli,
    config: &Config,
    output_format: OutputFormat,
    date: Option<String>,
    drivers: &str,
    amount: Option<i64>,
    destination: Option<String>,
    one_way: bool,
    toll_round_trip: bool,
    toll_one_way: bool,
    toll_cost: Option<&str>,
) -> Result<()> {
    let date = resolve_date(date.as_deref())?;

    let driver_names: Vec<String> = drivers
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if driver_names.is_empty() {
        println!("運転手を選択してください。");
        return Ok(());
    }

    let fare = match (destination.as_ref(), amount) {
        (Some(dest), _) => FareSelection::Destination(dest.clone()),
        (None, Some(tier)) => {
            validate_tier(config, tier)?;
            FareSelection::Tier(tier)
        }
        (None, None) => {
            return Err(Error::InvalidInput(
                "--amount か --destination を指定してください".to_string(),
            ))
        }
    };

    // Pending unless a numeric toll cost was given
    let toll_cost = toll_cost.map(Amount::parse).unwrap_or(Amount::Pending);

    let form = SubmissionForm {
        date,
        fare,
        drivers: driver_names
            .into_iter()
            .map(|name| DriverEntry {
                name,
                one_way,
                toll_round_trip,
                toll_one_way,
                toll_cost,
                destination: None,
            })
            .collect(),
    };

    let table = if destination.is_some() {
        load_distance_table(config)?
    } else {
        None
    };
    let service = table.as_ref().map(|t| t as &dyn DistanceService);

    let mut repo = CsvTripLog::new(config.log_path()?);
    let outcome = app::submit(&form, &mut repo, service)?;

    if cli.verbose {
        eprintln!(
            "Appended {} record(s) to {}",
            outcome.records.len(),
            repo.path().display()
        );
    }
    crate::output::output_submission(output_format, &outcome)
}

#[allow(clippy::too_many_arguments)]
fn cmd_fare(
    config: &Config,
    output_format: OutputFormat,
    amount: Option<i64>,
    distance_km: Option<f64>,
    one_way: bool,
    toll_round_trip: bool,
    toll_one_way: bool,
    toll_cost: Option<&str>,
) -> Result<()> {
    let base_amount = match (distance_km, amount) {
        (Some(km), _) => base_amount_for_distance(km),
        (None, Some(tier)) => {
            validate_tier(config, tier)?;
            tier
        }
        (None, None) => {
            return Err(Error::InvalidInput(
                "--amount か --distance-km を指定してください".to_string(),
            ))
        }
    };

    let breakdown = calculate_fare(&FareInput {
        base_amount,
        one_way,
        toll_round_trip,
        toll_one_way,
        toll_cost: toll_cost.map(Amount::parse).unwrap_or(Amount::Pending),
    });
    crate::output::output_breakdown(output_format, &breakdown)
}

fn cmd_summary(config: &Config, output_format: OutputFormat) -> Result<()> {
    let repo = CsvTripLog::new(config.log_path()?);
    let records = repo.find_all()?;
    let summary = summarize(&records);
    crate::output::output_summary(output_format, &summary)
}

fn cmd_pending(config: &Config, output_format: OutputFormat) -> Result<()> {
    let repo = CsvTripLog::new(config.log_path()?);
    let pending = repo.find_pending()?;
    crate::output::output_records(output_format, &pending)
}

fn cmd_resolve(
    config: &Config,
    output_format: OutputFormat,
    date: &str,
    driver: &str,
    toll_cost: i64,
) -> Result<()> {
    if toll_cost < 0 {
        return Err(Error::InvalidInput("高速代は0円以上で指定してください".to_string()));
    }
    let date = resolve_date(Some(date))?;
    let mut repo = CsvTripLog::new(config.log_path()?);
    let updated = repo.resolve_toll(date, driver, toll_cost)?;
    println!("高速代を反映しました。");
    crate::output::output_records(output_format, std::slice::from_ref(&updated))
}

fn cmd_undo(config: &Config, batch: &str) -> Result<()> {
    let mut repo = CsvTripLog::new(config.log_path()?);
    let deleted = repo.delete_batch(batch)?;
    if deleted == 0 {
        println!("バッチ {} のレコードはありません。", batch);
    } else {
        println!("{}件削除しました。", deleted);
    }
    Ok(())
}

fn cmd_delete(config: &Config, date: &str, driver: &str) -> Result<()> {
    let date = resolve_date(Some(date))?;
    let mut repo = CsvTripLog::new(config.log_path()?);
    let deleted = repo.delete_record(date, driver)?;
    if deleted == 0 {
        println!("該当するレコードはありません。");
    } else {
        println!("{}件削除しました。", deleted);
    }
    Ok(())
}

fn cmd_assign(
    config: &Config,
    output_format: OutputFormat,
    roster_path: Option<PathBuf>,
    attending: Option<&str>,
    vehicles: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let path = roster_path
        .or_else(|| config.roster_path.clone())
        .ok_or_else(|| {
            Error::Config("名簿が未設定です (--roster か config --set-roster)".to_string())
        })?;
    let roster = load_roster(&path)?;

    let participants = match attending {
        Some(list) => {
            let names: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            let (attending, unknown) = roster.select_attending(&names);
            if !unknown.is_empty() {
                eprintln!("Warning: 名簿にない名前: {}", unknown.join("、"));
            }
            attending
        }
        None => roster.participants.clone(),
    };

    let assignment = assign_seats(
        &participants,
        &roster.drivers,
        &AssignmentOptions {
            max_vehicles: vehicles,
            seed,
        },
    );
    crate::output::output_assignment(output_format, &assignment)
}

fn cmd_export(config: &Config, output: &Path) -> Result<()> {
    let repo = CsvTripLog::new(config.log_path()?);
    let records = repo.find_all()?;

    let is_excel = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    if is_excel {
        let summary = summarize(&records);
        export_to_excel(&records, &summary, output)?;
    } else {
        export_to_csv(&records, output)?;
    }
    println!("エクスポートしました: {}", output.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    mut config: Config,
    show: bool,
    set_log: Option<PathBuf>,
    set_roster: Option<PathBuf>,
    set_distance_table: Option<PathBuf>,
    set_origin: Option<String>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    let mut changed = false;

    if reset {
        config = Config::default();
        changed = true;
    }
    if let Some(path) = set_log {
        config.log_path = Some(path);
        changed = true;
    }
    if let Some(path) = set_roster {
        config.roster_path = Some(path);
        changed = true;
    }
    if let Some(path) = set_distance_table {
        config.distance_table = Some(path);
        changed = true;
    }
    if let Some(origin) = set_origin {
        config.origin = origin;
        changed = true;
    }
    if let Some(format) = set_output {
        config.output_format = format;
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Configuration saved.");
    }
    if show || !changed {
        println!("{}", config);
    }
    Ok(())
}

fn load_distance_table(config: &Config) -> Result<Option<CsvDistanceTable>> {
    match &config.distance_table {
        Some(path) => {
            let table = CsvDistanceTable::load(path, &config.origin)
                .map_err(|e| Error::Distance(e.to_string()))?;
            Ok(Some(table))
        }
        None => Ok(None),
    }
}

fn validate_tier(config: &Config, tier: i64) -> Result<()> {
    if config.fare_tiers.contains(&tier) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "金額 {} は選択肢にありません ({})",
            tier,
            config
                .fare_tiers
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join("/")
        )))
    }
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s).ok_or_else(|| Error::InvalidDate(s.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}
