use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tweet_dashboard::io::{write_json, DatasetLoader};
use tweet_dashboard::operators::rng_from_seed;
use tweet_dashboard::runtime::{AirlineBreakdownReport, RandomPost};
use tweet_dashboard::{Dashboard, DashboardConfig, RecordSet, Sentiment};

#[derive(Parser)]
#[command(name = "tdash")]
#[command(about = "Sentiment analytics over airline tweets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to dashboard YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// CSV data file, overrides source.path from the config
    #[arg(short, long)]
    data: Option<PathBuf>,
    /// Fixed random seed for sampling
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every view for one parameter set
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        random_sentiment: Option<Sentiment>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
        /// Airline to break down (repeatable)
        #[arg(long = "airline")]
        airlines: Vec<String>,
        #[arg(long)]
        cloud_sentiment: Option<Sentiment>,
        #[arg(long)]
        top_words: Option<usize>,
        /// Include the raw rows of the hour window
        #[arg(long)]
        show_raw: bool,
        /// Write the report to this JSON file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Number of tweets by sentiment
    Counts {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show a random tweet of one sentiment
    Random {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(short, long, default_value = "positive")]
        sentiment: Sentiment,
    },
    /// Tweets and locations within one hour of the day
    Map {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: u32,
        #[arg(long)]
        show_raw: bool,
    },
    /// Breakdown of airline tweets by sentiment
    Airlines {
        #[command(flatten)]
        source: SourceArgs,
        /// Airline to include (repeatable)
        #[arg(long = "airline")]
        airlines: Vec<String>,
    },
    /// Word-cloud term frequencies for one sentiment
    Words {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(short, long, default_value = "positive")]
        sentiment: Sentiment,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Validate a dashboard configuration
    Validate {
        /// Path to dashboard YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show version information
    Version,
}

fn resolve_config(source: &SourceArgs) -> anyhow::Result<DashboardConfig> {
    let mut config = match (&source.config, &source.data) {
        (Some(path), _) => DashboardConfig::from_yaml_file(path)?,
        (None, Some(data)) => DashboardConfig::for_path(data.display().to_string()),
        (None, None) => anyhow::bail!("either --config or --data is required"),
    };

    if let Some(data) = &source.data {
        config.source.path = data.display().to_string();
    }
    if source.seed.is_some() {
        config.sampler.seed = source.seed;
    }
    Ok(config)
}

fn open_dashboard(config: &DashboardConfig) -> anyhow::Result<Dashboard> {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?;
    pb.set_style(style);
    pb.set_message(format!("Loading {}", config.source.path));
    pb.enable_steady_tick(Duration::from_millis(100));

    let records = load_records(&pb, config)?;

    pb.finish_with_message(format!("Loaded {} tweets", records.len()));
    Ok(Dashboard::new(Arc::new(records), config))
}

/// The spinner is cleared before a load error is reported.
fn load_records(pb: &ProgressBar, config: &DashboardConfig) -> anyhow::Result<RecordSet> {
    let loaded = DatasetLoader::new(config.source.columns.clone())
        .and_then(|loader| loader.load_path(&config.source.path));

    match loaded {
        Ok(records) => Ok(records),
        Err(e) => {
            pb.finish_and_clear();
            Err(e).with_context(|| format!("Failed to load dataset: {}", config.source.path))
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            random_sentiment,
            hour,
            airlines,
            cloud_sentiment,
            top_words,
            show_raw,
            output,
        } => {
            let config = resolve_config(&source)?;
            let mut request = config.view.clone();
            if let Some(sentiment) = random_sentiment {
                request.random_sentiment = sentiment;
            }
            if let Some(hour) = hour {
                request.hour = hour;
            }
            if !airlines.is_empty() {
                request.airlines = airlines;
            }
            if let Some(sentiment) = cloud_sentiment {
                request.cloud_sentiment = sentiment;
            }
            if top_words.is_some() {
                request.top_words = top_words;
            }
            request.show_raw |= show_raw;

            let dashboard = open_dashboard(&config)?;
            let report = dashboard.render(&request, &mut rng_from_seed(config.sampler.seed));
            match output {
                Some(path) => {
                    write_json(&report, &path)?;
                    println!("✓ Report written to: {}", path.display());
                }
                None => print_json(&report)?,
            }
        }
        Commands::Counts { source } => {
            let dashboard = open_dashboard(&resolve_config(&source)?)?;
            print_json(&dashboard.sentiment_counts())?;
        }
        Commands::Random { source, sentiment } => {
            let config = resolve_config(&source)?;
            let dashboard = open_dashboard(&config)?;
            let mut rng = rng_from_seed(config.sampler.seed);
            let sampled = dashboard.random_post(sentiment, &mut rng);
            print_json(&RandomPost::from_sample(sentiment, sampled))?;
        }
        Commands::Map {
            source,
            hour,
            show_raw,
        } => {
            let dashboard = open_dashboard(&resolve_config(&source)?)?;
            print_json(&dashboard.hour_window(hour).report(show_raw))?;
        }
        Commands::Airlines { source, airlines } => {
            let dashboard = open_dashboard(&resolve_config(&source)?)?;
            match dashboard.airline_breakdown(&airlines) {
                Some(counts) => print_json(&AirlineBreakdownReport { airlines, counts })?,
                None => println!("No airlines picked; use --airline to select one or more"),
            }
        }
        Commands::Words {
            source,
            sentiment,
            top,
        } => {
            let dashboard = open_dashboard(&resolve_config(&source)?)?;
            print_json(&dashboard.word_cloud_report(sentiment, top))?;
        }
        Commands::Validate { config } => {
            let _config = DashboardConfig::from_yaml_file(&config)?;
            println!("✓ Dashboard configuration is valid");
        }
        Commands::Version => {
            println!("tdash version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
