use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use shared::models::{CheckKind, TemperatureReading};

use taquero::finance::{self, DateRange, Period};
use taquero::safety::{self, progress_label};
use taquero::safety::training::{expired, expiring_within};
use taquero::utils::time::{parse_date, today};
use taquero::{AppState, setup_environment};

/// Training expiring this soon is listed by `status`
const TRAINING_WARNING_DAYS: i64 = 30;

#[derive(Parser)]
#[command(name = "taquero")]
#[command(about = "Food safety and business records for a food truck")]
#[command(version)]
struct Cli {
    /// Local data directory (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Spreadsheet web app URL (overrides SHEETS_URL)
    #[arg(long)]
    sheets_url: Option<String>,

    /// Name recorded on changes (overrides OPERATOR)
    #[arg(long)]
    operator: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import POS or bank CSV exports into the finance book
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Income and expenses per period
    Report {
        /// day, week, month or quarter
        #[arg(long, default_value = "month")]
        period: Period,
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Business health score
    Health {
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,
    },

    /// Record counts per domain and sync state
    Status,

    /// Print the records of a domain as JSON
    List { domain: String },

    /// Reload a domain from the spreadsheet
    Pull { domain: String },

    /// Delete a record
    Delete { domain: String, id: String },

    /// Classify a probe reading
    Check {
        /// cooking, hot-holding, reheating, cooling, chilled, frozen
        kind: String,
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
        /// Minutes since cooking ended (cooling)
        #[arg(long)]
        minutes: Option<u32>,
    },

    /// Record the next validation batch on a method
    Batch {
        method_id: String,
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.message)
}

fn range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> anyhow::Result<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let range = DateRange::new(from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))?;
    Ok(Some(range))
}

fn reading(celsius: f64, minutes: Option<u32>) -> TemperatureReading {
    TemperatureReading { celsius, minutes }
}

fn check(kind: &str, celsius: f64, minutes: Option<u32>) -> anyhow::Result<()> {
    let kind: CheckKind = kind.parse().map_err(anyhow::Error::msg)?;
    let verdict = safety::classify(kind, reading(celsius, minutes));
    println!("{:?}: {} ({})", verdict, kind.label(), safety::describe(kind));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = setup_environment();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(url) = cli.sheets_url {
        config = config.with_sheets_url(url);
    }
    if let Some(operator) = cli.operator {
        config = config.with_operator(operator);
    }

    // Classifying a reading needs no state
    if let Commands::Check { kind, celsius, minutes } = &cli.command {
        return check(kind, *celsius, *minutes);
    }

    tracing::info!(environment = %config.environment, "Taquero starting");
    let state = AppState::initialize(&config).await.context("failed to open local data")?;
    let result = run(&state, cli.command).await;
    state.shutdown().await;
    result
}

async fn run(state: &AppState, command: Commands) -> anyhow::Result<()> {
    let operator = state.config.operator.clone();
    match command {
        Commands::Import { files } => {
            let (rows, report) = finance::import_files(&files);
            let stats = state.finance.merge(rows)?;
            for file in &report.files {
                match &file.outcome {
                    finance::FileOutcome::Imported { kind, rows, skipped } => {
                        println!("{}: {kind}, {rows} rows, {} skipped", file.name, skipped.len());
                        for skip in skipped {
                            println!("    line {}: {}", skip.line, skip.reason);
                        }
                    }
                    finance::FileOutcome::Failed { reason } => println!("{}: failed: {reason}", file.name),
                }
            }
            println!("{} new rows, {} already imported", stats.added, stats.duplicates);
            if report.succeeded() == 0 {
                bail!("no file could be imported");
            }
        }
        Commands::Report { period, from, to, json } => {
            let dashboard = state.finance.dashboard(range(from, to)?, period);
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                println!("{:<12} {:<12} {:>12} {:>12} {:>12}", "from", "to", "income", "expense", "net");
                for b in &dashboard.buckets {
                    println!(
                        "{:<12} {:<12} {:>12.2} {:>12.2} {:>12.2}",
                        b.start, b.end, b.income, b.expense, b.net
                    );
                }
                println!(
                    "{:<25} {:>12.2} {:>12.2} {:>12.2}",
                    "total", dashboard.totals.income, dashboard.totals.expense, dashboard.net
                );
            }
        }
        Commands::Health { from, to } => {
            let health = state.finance.dashboard(range(from, to)?, Period::Month).health;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Commands::Status => {
            for (domain, count) in state.stores.counts() {
                println!("{domain:<18} {count}");
            }
            match state.sync() {
                Some(sync) => println!("sync: online, {} pending", sync.status().pending()),
                None => println!("sync: offline"),
            }
            let today = today();
            for staff in state.stores.staff.list() {
                for t in expired(&staff, today) {
                    println!("training expired: {} {} ({})", staff.name, t.course, t.expires_on.unwrap_or(today));
                }
                for t in expiring_within(&staff, today, TRAINING_WARNING_DAYS) {
                    println!("training due: {} {} ({})", staff.name, t.course, t.expires_on.unwrap_or(today));
                }
            }
        }
        Commands::List { domain } => {
            let records = state.stores.list_json(&domain)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Pull { domain } => {
            let count = state.pull(&domain).await?;
            println!("{domain}: {count} records");
        }
        Commands::Delete { domain, id } => {
            state.stores.delete(&domain, &id, &operator)?;
            println!("deleted {domain}/{id}");
        }
        Commands::Batch { method_id, celsius, minutes, notes } => {
            let mut recorded = None;
            let method = state.stores.methods.update(&method_id, &operator, |method| {
                let number = method.batches.len() as u32 + 1;
                let batch =
                    safety::record_batch(method, number, reading(celsius, minutes), &operator, notes, Utc::now())?;
                recorded = Some(batch);
                Ok(())
            })?;
            if let Some(batch) = recorded {
                println!("batch {}: {:?}", batch.number, batch.verdict);
            }
            println!("{}: {}", method.name, progress_label(&method));
        }
        Commands::Check { kind, celsius, minutes } => check(&kind, celsius, minutes)?,
    }
    Ok(())
}
