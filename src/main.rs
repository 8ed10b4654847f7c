//! Journal Predictor - operator CLI
//!
//! Inspects, scores against, teaches and resets the persisted outcome model
//! outside the journal application.
//!
//! # Usage
//! ```sh
//! journal-predictor weights
//! journal-predictor score --entry 2650.50 --stop 2645 --take-profit 2660 --rr 2 --strategy Breakout
//! journal-predictor learn --outcome win --entry 2650.50 --stop 2645 --strategy Breakout
//! journal-predictor reset
//! ```
//!
//! # Environment Variables
//! - `PREDICTOR_WEIGHTS_PATH` - Weights file (default: ~/.journal_predictor/ai_weights.json)
//! - `PREDICTOR_METRICS_ENABLED` - Print a metrics snapshot after each command (default: true)
//! - `PREDICTOR_LOG_JSON` - JSON log lines on stderr (default: false)

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use journal_predictor::application::journal::JournalAiService;
use journal_predictor::application::ml::OnlinePredictor;
use journal_predictor::config::Config;
use journal_predictor::domain::journal::TradeDraft;
use journal_predictor::domain::journal::field_source::parse_timestamp_text;
use journal_predictor::domain::ml::{FEATURE_NAMES, FeatureEncoder, WeightVector};
use journal_predictor::infrastructure::JsonFileWeightRepository;
use journal_predictor::infrastructure::observability::PredictorMetrics;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the weights file location
    #[arg(long, global = true)]
    weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current weight vector
    Weights,
    /// Score a trade and print the clamped confidence
    Score(TradeArgs),
    /// Apply one online learning step from a closed trade
    Learn {
        /// Trade result: win, loss or be
        #[arg(long)]
        outcome: String,

        #[command(flatten)]
        trade: TradeArgs,
    },
    /// Discard learned weights and re-seed from the bootstrap set
    Reset,
}

#[derive(Args, Debug, Default)]
struct TradeArgs {
    /// Instrument, e.g. XAUUSD
    #[arg(long, default_value = "UNKNOWN")]
    pair: String,

    /// Trade time, e.g. "2024-05-01 14:30" (defaults to now)
    #[arg(long)]
    date: Option<String>,

    /// Entry price; currency symbols and separators are ignored
    #[arg(long)]
    entry: Option<String>,

    /// Stop-loss price
    #[arg(long)]
    stop: Option<String>,

    /// Take-profit price
    #[arg(long)]
    take_profit: Option<String>,

    /// Risk:reward ratio (R)
    #[arg(long)]
    rr: Option<String>,

    /// News event around the trade, e.g. NFP
    #[arg(long)]
    news: Option<String>,

    /// Strategy label, e.g. Breakout
    #[arg(long)]
    strategy: Option<String>,
}

impl TradeArgs {
    fn to_draft(&self) -> Result<TradeDraft> {
        let mut draft = TradeDraft::new(self.pair.clone());
        if let Some(date) = &self.date {
            let Some(ts) = parse_timestamp_text(date) else {
                bail!("Invalid --date '{}'. Expected 'YYYY-MM-DD HH:MM'", date);
            };
            draft = draft.with_date(ts);
        }
        draft.entry_price = self.entry.clone().into();
        draft.stop_loss = self.stop.clone().into();
        draft.take_profit = self.take_profit.clone().into();
        draft.risk_reward = self.rr.clone().into();
        draft.news_event = self.news.clone().into();
        draft.strategy = self.strategy.clone().into();
        Ok(draft)
    }
}

fn print_weights(weights: &WeightVector) {
    for (name, value) in FEATURE_NAMES.iter().zip(weights.values().iter()) {
        println!("  {:<22} {:>+.6}", name, value);
    }
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().or_else(|e| match &cli.weights {
        // An explicit --weights makes the HOME-based default irrelevant.
        Some(path) => Config::from_lookup(|key| match key {
            "PREDICTOR_WEIGHTS_PATH" => Some(path.display().to_string()),
            _ => std::env::var(key).ok(),
        }),
        None => Err(e),
    })?;

    // Logs go to stderr so command output on stdout stays clean
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into());
    if config.observability.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let weights_path = cli
        .weights
        .clone()
        .unwrap_or_else(|| config.predictor.weights_path.clone());
    info!(
        "Journal Predictor {} using weights at {:?}",
        env!("CARGO_PKG_VERSION"),
        weights_path
    );

    let metrics = if config.observability.metrics_enabled {
        Some(PredictorMetrics::new().context("Failed to register predictor metrics")?)
    } else {
        None
    };

    let repository = Arc::new(JsonFileWeightRepository::new(weights_path));
    let predictor = Arc::new(OnlinePredictor::initialize_with(
        repository,
        FeatureEncoder::default(),
        metrics.clone(),
    ));

    match &cli.command {
        Command::Weights => {
            println!("Weights (learning rate {}):", predictor.learning_rate());
            print_weights(&predictor.weights());
        }
        Command::Score(trade) => {
            let draft = trade.to_draft()?;
            let mut service = JournalAiService::new(predictor.clone());
            if let Some(metrics) = &metrics {
                service = service.with_metrics(metrics.clone());
            }
            let confidence = service.score_draft(&draft);
            println!("AI Trade Confidence: {}", confidence);
            println!("  raw confidence      {:.6}", confidence.value());
        }
        Command::Learn { outcome, trade } => {
            let draft = trade.to_draft()?.with_result(outcome.clone());
            match predictor.learn_from_outcome(&draft) {
                Some(report) => {
                    println!(
                        "Learned '{}' (target {:.1}): prediction {:.6} -> {:.6}",
                        report.outcome,
                        report.target,
                        report.prediction_before,
                        report.prediction_after
                    );
                    if !report.persisted {
                        println!("  warning: updated weights could not be saved");
                    }
                    print_weights(&report.weights);
                }
                None => bail!("--outcome must not be blank"),
            }
        }
        Command::Reset => {
            let weights = predictor
                .reset()
                .context("Weights were reset in memory but could not be saved")?;
            println!("Weights reset to bootstrap prior:");
            print_weights(&weights);
        }
    }

    if let Some(metrics) = &metrics {
        info!("Metrics snapshot:\n{}", metrics.encode_text()?);
    }

    Ok(())
}
