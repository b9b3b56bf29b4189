use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dentfolio_core::constants::UTC_OFFSET_ENV;
use dentfolio_core::{
    utc_offset_from_env_value, Angle, Calendar, CoreConfig, DueStatus, DueStatusCalculator,
    FulfilmentEngine, Portfolio, PortfolioFulfilment, Uuid,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod load;

#[derive(Parser)]
#[command(name = "dentfolio")]
#[command(about = "Dental photo portfolio fulfilment and due-date reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report how far a portfolio's requirements are covered by a photo log
    Fulfilment {
        /// Portfolio YAML file
        portfolio: PathBuf,
        /// Photo log YAML file
        photos: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Classify a portfolio's due date
    Due {
        /// Portfolio YAML file
        portfolio: PathBuf,
        /// Evaluate as of this day (YYYY-MM-DD) instead of now
        #[arg(long)]
        today: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the slots that still need photos, one capture prefill per line
    Outstanding {
        /// Portfolio YAML file
        portfolio: PathBuf,
        /// Photo log YAML file
        photos: PathBuf,
    },
    /// List the angle vocabulary
    Angles,
}

#[derive(Debug, Serialize)]
struct RequirementReport {
    requirement_id: Uuid,
    procedure: String,
    satisfied: u32,
    required: u32,
    completion: f64,
}

#[derive(Debug, Serialize)]
struct FulfilmentReport {
    portfolio_id: Uuid,
    name: String,
    requirements: Vec<RequirementReport>,
    satisfied: u64,
    required: u64,
    completion: f64,
}

#[derive(Debug, Serialize)]
struct DueReport {
    portfolio_id: Uuid,
    name: String,
    due_date: Option<String>,
    days_until_due: Option<i64>,
    status: DueStatus,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dentfolio=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let offset = utc_offset_from_env_value(std::env::var(UTC_OFFSET_ENV).ok())
        .with_context(|| format!("invalid {UTC_OFFSET_ENV}"))?;
    let cfg = CoreConfig::new(offset);

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Fulfilment {
            portfolio,
            photos,
            json,
        }) => {
            let report = fulfilment_report(&portfolio, &photos)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_fulfilment(&report);
            }
        }
        Some(Commands::Due {
            portfolio,
            today,
            json,
        }) => {
            let calc = DueStatusCalculator::new(&cfg);
            let now = match today {
                Some(day) => start_of_day(&day, cfg.calendar())?,
                None => Utc::now(),
            };
            let portfolio = load::load_portfolio(&portfolio)?;
            let report = due_report(&portfolio, &calc, now);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                match (&report.due_date, report.days_until_due) {
                    (Some(due), Some(days)) => println!(
                        "{}: due {} ({} days), {}",
                        report.name, due, days, report.status
                    ),
                    _ => println!("{}: {}", report.name, report.status),
                }
            }
        }
        Some(Commands::Outstanding { portfolio, photos }) => {
            let portfolio = load::load_portfolio(&portfolio)?;
            let photos = load::load_photos(&photos)?;
            let result = FulfilmentEngine::evaluate(&portfolio, &photos);
            let lines = outstanding_lines(&result);
            if lines.is_empty() {
                println!("All requirements satisfied.");
            }
            for line in lines {
                println!("{line}");
            }
        }
        Some(Commands::Angles) => {
            for angle in Angle::ALL {
                println!("{angle}");
            }
        }
        None => {
            println!("Use 'dentfolio --help' for commands");
        }
    }

    Ok(())
}

fn fulfilment_report(portfolio: &Path, photos: &Path) -> anyhow::Result<FulfilmentReport> {
    let portfolio = load::load_portfolio(portfolio)?;
    let photos = load::load_photos(photos)?;
    let result = FulfilmentEngine::evaluate(&portfolio, &photos);

    Ok(FulfilmentReport {
        portfolio_id: portfolio.id,
        name: portfolio.name.to_string(),
        requirements: result
            .requirements
            .iter()
            .map(|r| RequirementReport {
                requirement_id: r.requirement_id,
                procedure: r.procedure.to_string(),
                satisfied: r.satisfied_count,
                required: r.total_required,
                completion: r.completion_fraction(),
            })
            .collect(),
        satisfied: result.satisfied_count,
        required: result.total_required,
        completion: result.completion_fraction(),
    })
}

fn print_fulfilment(report: &FulfilmentReport) {
    println!("{}", report.name);
    for req in &report.requirements {
        println!(
            "  {}: {}/{} ({:.0}%)",
            req.procedure,
            req.satisfied,
            req.required,
            req.completion * 100.0
        );
    }
    println!(
        "Total: {}/{} ({:.0}%)",
        report.satisfied,
        report.required,
        report.completion * 100.0
    );
}

fn due_report(portfolio: &Portfolio, calc: &DueStatusCalculator, now: DateTime<Utc>) -> DueReport {
    DueReport {
        portfolio_id: portfolio.id,
        name: portfolio.name.to_string(),
        due_date: portfolio
            .due_date
            .map(|due| calc.calendar().display_day(due)),
        days_until_due: portfolio.days_until_due(calc, now),
        status: portfolio.due_status(calc, now),
    }
}

fn outstanding_lines(result: &PortfolioFulfilment) -> Vec<String> {
    result
        .requirements
        .iter()
        .flat_map(|req| {
            req.outstanding_slots().map(move |slot| {
                format!(
                    "{} · {} · {}: {} more",
                    req.procedure,
                    slot.stage.abbreviation(),
                    slot.angle,
                    slot.shortfall()
                )
            })
        })
        .collect()
}

/// The first instant of `day` on the configured calendar.
fn start_of_day(day: &str, calendar: Calendar) -> anyhow::Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("--today must be YYYY-MM-DD, got '{day}'"))?;
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(calendar.offset()).single())
        .map(|local| local.with_timezone(&Utc))
        .with_context(|| format!("no start of day for {day}"))
}
