pub mod cli;
pub mod core;
pub mod providers;

use crate::core::analytics::DEFAULT_TOP_LIMIT;
use crate::core::config::AppConfig;
use crate::core::synthetic::{self, ListingFilter};
use crate::core::{Metric, load_dataset};
use crate::providers::ErApiProvider;
use anyhow::Result;
use tracing::{debug, info};

pub const DEFAULT_YEAR: i32 = 2023;

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Countries,
    Stats {
        country: String,
        currency: Option<String>,
        json: bool,
    },
    Top {
        year: i32,
        limit: usize,
    },
    Trend {
        countries: Vec<String>,
        metric: Metric,
    },
    Compare {
        first: String,
        second: String,
        currency: Option<String>,
    },
    Map {
        year: Option<i32>,
        metric: Metric,
    },
}

impl AppCommand {
    pub fn top(year: Option<i32>, limit: Option<usize>) -> Self {
        AppCommand::Top {
            year: year.unwrap_or(DEFAULT_YEAR),
            limit: limit.unwrap_or(DEFAULT_TOP_LIMIT),
        }
    }
}

/// Options shared by every data command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    pub data_path: Option<String>,
    pub filter: ListingFilter,
}

pub async fn run_command(command: AppCommand, options: &RunOptions) -> Result<()> {
    info!("housedash starting...");

    let config = AppConfig::load_or_default(options.config_path.as_deref())?;
    debug!("Loaded config: {config:#?}");

    let data_path = config.resolve_data_path(options.data_path.as_deref());
    let dataset = load_dataset(&data_path)?;
    let dataset = synthetic::with_listing_attributes(&dataset, &config.synthetic);
    let dataset = options.filter.apply(&dataset);

    let rates_config = config.exchange_rates();
    let rate_provider = ErApiProvider::new(&rates_config.base_url, rates_config.timeout());
    let default_currency = config.currency.as_deref();

    match command {
        AppCommand::Countries => cli::countries::run(&dataset),
        AppCommand::Stats {
            country,
            currency,
            json,
        } => {
            cli::stats::run(
                &dataset,
                &country,
                currency.as_deref().or(default_currency),
                json,
                &rate_provider,
            )
            .await
        }
        AppCommand::Top { year, limit } => cli::top::run(&dataset, year, limit),
        AppCommand::Trend { countries, metric } => cli::trend::run(&dataset, &countries, metric),
        AppCommand::Compare {
            first,
            second,
            currency,
        } => {
            cli::compare::run(
                &dataset,
                &first,
                &second,
                currency.as_deref().or(default_currency),
                &rate_provider,
            )
            .await
        }
        AppCommand::Map { year, metric } => cli::map::run(&dataset, year, metric),
    }
}
