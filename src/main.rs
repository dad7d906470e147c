//! energy-analytics CLI
//!
//! Runs anomaly detection, next-day forecasting and dashboard aggregation
//! against a JSON file of readings.

use anyhow::Context;
use clap::{Parser, Subcommand};
use energy_analytics::config::AnalyticsConfig;
use energy_analytics::logging::{init_logging, LogConfig};
use energy_analytics::monitoring::{
    Budget, BudgetStore, DashboardService, MemoryAlertStore, MemoryBudgetStore, ReadingEvaluator,
};
use energy_analytics::history::check_amount;
use energy_analytics::{AnomalyDetector, MemoryHistoryStore, NewReading, SystemClock};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "energy-analytics", author, version, about = "Energy consumption analytics")]
struct Args {
    /// Configuration file (defaults to energy-analytics.toml if present)
    #[arg(short, long, global = true, env = "ENERGY_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of readings
    #[arg(short, long, global = true, env = "ENERGY_DATA", default_value = "readings.json")]
    data: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Also write logs to files in this directory; overrides the config file
    #[arg(long, global = true, env = "ENERGY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a candidate reading is anomalous
    Detect {
        #[arg(long)]
        subscriber: String,
        #[arg(long)]
        amount: f64,
    },

    /// Forecast next-day consumption
    Forecast {
        #[arg(long)]
        subscriber: String,
    },

    /// Record a reading, raising anomaly and budget alerts
    Record {
        #[arg(long)]
        subscriber: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        device: Option<String>,
        /// Monthly budget in kWh to check against
        #[arg(long)]
        budget: Option<f64>,
        /// Write the updated readings back to the data file
        #[arg(long)]
        save: bool,
    },

    /// Dashboard statistics
    Dashboard {
        #[arg(long)]
        subscriber: String,
        /// Monthly budget in kWh
        #[arg(long)]
        budget: Option<f64>,
    },

    /// Daily totals for the last seven days
    Summary {
        #[arg(long)]
        subscriber: String,
    },

    /// CO2 and impact metrics from all-time consumption
    Sustainability {
        #[arg(long)]
        subscriber: String,
    },

    /// Energy-saving recommendations
    Recommendations {
        #[arg(long)]
        subscriber: String,
    },

    /// Print a sample configuration file
    SampleConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Command::SampleConfig = args.command {
        print!("{}", AnalyticsConfig::sample_toml()?);
        return Ok(());
    }

    let config = AnalyticsConfig::load(args.config.as_deref())?;
    let mut log_config = LogConfig::from_analytics_config(&config);
    if let Some(level) = &args.log_level {
        log_config = log_config.with_level(level.clone());
    }
    if let Some(dir) = &args.log_dir {
        log_config = log_config.with_log_dir(dir.clone());
    }
    let _guard = init_logging(&log_config)?;

    let history = Arc::new(
        MemoryHistoryStore::from_json_file(&args.data)
            .with_context(|| format!("failed to load readings from {}", args.data.display()))?,
    );
    let alerts = Arc::new(MemoryAlertStore::new());
    let budgets = Arc::new(MemoryBudgetStore::new());
    let clock = Arc::new(SystemClock);

    let dashboard = DashboardService::new(
        history.clone(),
        alerts.clone(),
        budgets.clone(),
        clock.clone(),
        config.forecast.clone(),
        config.sustainability.clone(),
    );

    match args.command {
        Command::Detect { subscriber, amount } => {
            check_amount(amount)?;
            let detector = AnomalyDetector::new(history.clone(), config.anomaly.clone());
            let verdict = detector.evaluate(&subscriber, amount).await?;
            print_json(&verdict)?;
        }
        Command::Forecast { subscriber } => {
            let forecaster = dashboard.forecaster();
            let prediction = forecaster.forecast_next_day(&subscriber).await?;
            let model = forecaster.fit(&subscriber).await?;
            let trend = model
                .as_ref()
                .map(|m| m.direction(forecaster.config().stability_threshold));
            print_json(&json!({
                "subscriberId": subscriber,
                "prediction": prediction,
                "trend": trend,
                "model": model,
            }))?;
        }
        Command::Record {
            subscriber,
            amount,
            device,
            budget,
            save,
        } => {
            if let Some(limit) = budget {
                budgets.set(Budget::monthly(&subscriber, limit)?).await?;
            }

            let evaluator = ReadingEvaluator::new(
                history.clone(),
                alerts.clone(),
                budgets.clone(),
                clock.clone(),
                config.anomaly.clone(),
            );
            let mut new_reading = NewReading::new(&subscriber, amount);
            if let Some(device) = device {
                new_reading = new_reading.with_device(device);
            }

            let outcome = evaluator.record(new_reading).await?;
            if save {
                let readings = history.snapshot().await;
                std::fs::write(&args.data, serde_json::to_string_pretty(&readings)?)
                    .with_context(|| format!("failed to write {}", args.data.display()))?;
            }
            print_json(&outcome)?;
        }
        Command::Dashboard { subscriber, budget } => {
            if let Some(limit) = budget {
                budgets.set(Budget::monthly(&subscriber, limit)?).await?;
            }

            let stats = dashboard.stats(&subscriber).await?;
            print_json(&json!({
                "currentUsage": format!("{:.1}", stats.current_usage),
                "prediction": stats.prediction_label(),
                "alertCount": stats.alert_count,
                "monthlySpent": format!("{:.1}", stats.monthly_spent),
                "budgetLimit": stats.budget_limit,
            }))?;
        }
        Command::Summary { subscriber } => {
            print_json(&dashboard.consumption_summary(&subscriber).await?)?;
        }
        Command::Sustainability { subscriber } => {
            print_json(&dashboard.sustainability(&subscriber).await?)?;
        }
        Command::Recommendations { subscriber } => {
            print_json(&dashboard.recommendations(&subscriber).await?)?;
        }
        Command::SampleConfig => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
