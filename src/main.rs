use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use housedash::cli::ui;
use housedash::core::Metric;
use housedash::core::log::init_logging;
use housedash::core::synthetic::ListingFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Path to the housing market CSV (overrides DATA_PATH)
    #[arg(short, long, global = true)]
    data_path: Option<String>,

    /// Keep only rows with at least this surface (m²)
    #[arg(long, global = true)]
    min_surface: Option<u32>,

    /// Keep only rows with at least this many rooms
    #[arg(long, global = true)]
    min_rooms: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List countries in the dataset
    Countries,
    /// Display summary statistics for a country
    Stats {
        country: String,
        /// Also show the average price index converted from USD to this currency
        #[arg(long)]
        currency: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display countries with the highest GDP growth in a year
    Top {
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Display a metric per year for one or more countries
    Trend {
        #[arg(required = true)]
        countries: Vec<String>,
        /// One of hpi, rent, inflation, gdp
        #[arg(short, long, default_value = "hpi")]
        metric: Metric,
    },
    /// Compare the summaries of two countries
    Compare {
        first: String,
        second: String,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Display a metric for every country in a year
    Map {
        /// Defaults to the most recent year in the dataset
        #[arg(short, long)]
        year: Option<i32>,
        #[arg(short, long, default_value = "hpi")]
        metric: Metric,
    },
}

impl From<Commands> for housedash::AppCommand {
    fn from(cmd: Commands) -> housedash::AppCommand {
        match cmd {
            Commands::Countries => housedash::AppCommand::Countries,
            Commands::Stats {
                country,
                currency,
                json,
            } => housedash::AppCommand::Stats {
                country,
                currency,
                json,
            },
            Commands::Top { year, limit } => housedash::AppCommand::top(year, limit),
            Commands::Trend { countries, metric } => {
                housedash::AppCommand::Trend { countries, metric }
            }
            Commands::Compare {
                first,
                second,
                currency,
            } => housedash::AppCommand::Compare {
                first,
                second,
                currency,
            },
            Commands::Map { year, metric } => housedash::AppCommand::Map { year, metric },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = housedash::RunOptions {
        config_path: cli.config_path,
        data_path: cli.data_path,
        filter: ListingFilter {
            min_surface: cli.min_surface,
            min_rooms: cli.min_rooms,
        },
    };

    let result = match cli.command {
        Some(Commands::Setup) => housedash::cli::setup::setup(),
        Some(cmd) => housedash::run_command(cmd.into(), &options).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        eprintln!("{}", ui::style_text(&format!("{e:#}"), ui::StyleType::Error));
        std::process::exit(1);
    }
    Ok(())
}
