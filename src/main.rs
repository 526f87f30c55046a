//! Trade Journal CLI
//!
//! Records a trade to the local CSV journal and/or the remote spreadsheet,
//! numbering it after the trades already saved.
//!
//! # Usage
//! ```sh
//! tradejournal record --pair EURUSD --type long --timing LNO --result win --pnl 50
//! tradejournal next
//! tradejournal kpi --result loss --pnl 50 --equity 10000
//! ```
//!
//! # Environment Variables
//! - `JOURNAL_CSV_PATH` - Local journal file (default: trades_journal.csv)
//! - `SHEETS_ENABLED` - Also write to Google Sheets (default: false)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;
use tradejournal::application::bootstrap::PersistenceBootstrap;
use tradejournal::application::trade_store::AppendReport;
use tradejournal::config::Config;
use tradejournal::domain::journal::{
    GoalPolicy, KpiInput, TradeDraft, TradeKpis, TradeResult, compute_kpis, format_amount,
};
use tradejournal::domain::repositories::SinkKind;

#[derive(Parser)]
#[command(author, version, about = "Trading journal recorder", long_about = None)]
struct Cli {
    /// TOML file overriding the goal policy
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save one trade to the journal
    Record(RecordArgs),
    /// Print the number the next saved trade will get
    Next,
    /// Compute the KPIs of a result without saving anything
    Kpi {
        /// win, loss or breakeven
        #[arg(long)]
        result: TradeResult,

        /// Profit or loss amount in USD
        #[arg(long, default_value = "0")]
        pnl: Decimal,

        /// Equity before the trade (default: baseline equity)
        #[arg(long)]
        equity: Option<Decimal>,

        /// Daily goal percentage (default: policy value)
        #[arg(long)]
        daily_goal_pct: Option<Decimal>,
    },
}

#[derive(clap::Args)]
struct RecordArgs {
    /// Traded symbol, e.g. EURUSD
    #[arg(long)]
    pair: String,

    /// long or short
    #[arg(long = "type")]
    direction: String,

    /// Session window (FFO, LNO, MMM1, MMM2, NYO, NYT, LNC)
    #[arg(long)]
    timing: String,

    #[arg(long)]
    screenshot_url: Option<String>,

    /// win, loss or breakeven
    #[arg(long)]
    result: Option<String>,

    #[arg(long)]
    pnl: Option<Decimal>,

    #[arg(long)]
    equity: Option<Decimal>,

    #[arg(long)]
    daily_goal_pct: Option<Decimal>,

    #[arg(long, default_value = "")]
    comments: String,

    /// Confluence that was present (repeatable)
    #[arg(long)]
    confluence: Vec<String>,

    /// Approach #1 answer as key=value (repeatable)
    #[arg(long, value_name = "KEY=VALUE")]
    approach1: Vec<String>,

    #[arg(long, value_name = "KEY=VALUE")]
    approach2: Vec<String>,

    #[arg(long, value_name = "KEY=VALUE")]
    approach3: Vec<String>,

    #[arg(long, value_name = "KEY=VALUE")]
    approach4: Vec<String>,

    /// Backfill date (YYYY-MM-DD); requires --time
    #[arg(long, requires = "time")]
    date: Option<NaiveDate>,

    /// Backfill time (HH:MM); requires --date
    #[arg(long, requires = "date")]
    time: Option<String>,

    /// Sink to write to, local or remote (repeatable; default: all configured)
    #[arg(long)]
    sink: Vec<SinkKind>,
}

impl RecordArgs {
    fn draft(&self) -> TradeDraft {
        let mut draft = TradeDraft::new(&self.pair, &self.direction, &self.timing);
        draft.screenshot_url = self.screenshot_url.clone();
        draft.result = self.result.clone();
        draft.pnl = self.pnl;
        draft.equity = self.equity;
        draft.daily_goal_percent = self.daily_goal_pct;
        draft.comments = self.comments.clone();
        for name in &self.confluence {
            draft = draft.confluence(name);
        }
        let approaches = [&self.approach1, &self.approach2, &self.approach3, &self.approach4];
        for (index, entries) in approaches.into_iter().enumerate() {
            for entry in entries {
                draft = draft.approach_entry(index + 1, entry);
            }
        }
        if let (Some(date), Some(time)) = (self.date, &self.time) {
            draft = draft.manual_datetime(date, time);
        }
        draft
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean on stdout
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = &cli.policy {
        config = config.with_policy_file(path)?;
        info!("Goal policy loaded from {}", path.display());
    }
    let policy = config.goal_policy();

    match cli.command {
        Commands::Record(args) => record(&config, &policy, &args).await,
        Commands::Next => {
            let store = PersistenceBootstrap::init(&config)?;
            let next = store
                .next_trade_number()
                .await
                .context("Failed to count saved trades")?;
            println!("{}", next);
            Ok(())
        }
        Commands::Kpi {
            result,
            pnl,
            equity,
            daily_goal_pct,
        } => {
            let kpis = compute_kpis(
                &KpiInput {
                    result,
                    pnl,
                    equity: equity.unwrap_or(policy.baseline_equity),
                    daily_goal_percent: daily_goal_pct.unwrap_or(policy.daily_goal_percent),
                },
                &policy,
            )
            .context("Failed to compute KPIs")?;
            print_kpis(&kpis);
            Ok(())
        }
    }
}

async fn record(config: &Config, policy: &GoalPolicy, args: &RecordArgs) -> Result<()> {
    let store = PersistenceBootstrap::init(config)?;
    let requested: BTreeSet<SinkKind> = if args.sink.is_empty() {
        store.configured()
    } else {
        args.sink.iter().copied().collect()
    };
    for kind in requested.difference(&store.configured()) {
        warn!(sink = %kind, "Requested sink is not enabled; skipping");
    }

    let now = Local::now().naive_local();
    let submission = store
        .submit(&args.draft(), &requested, now, policy)
        .await
        .context("Failed to record trade")?;

    for warning in &submission.warnings {
        println!("Warning: {}", warning);
    }
    print_report(&submission.report);

    if !submission.report.any_succeeded() {
        anyhow::bail!(
            "Trade #{} was not saved to any sink",
            submission.report.trade_number()
        );
    }
    Ok(())
}

fn print_report(report: &AppendReport) {
    let record = &report.record;
    println!(
        "Trade #{} {} {} {} at {}",
        report.trade_number(),
        record.pair,
        record.direction,
        record.timing,
        record.datetime_final
    );
    if let Some(kpis) = &record.kpis {
        print_kpis(kpis);
    }
    for kind in report.succeeded() {
        println!("Saved to {}", kind);
    }
    for (kind, error) in report.failures() {
        println!("Failed to save to {}: {}", kind, error);
    }
}

fn print_kpis(kpis: &TradeKpis) {
    println!("  PnL:                {}", format_amount(kpis.pnl));
    println!("  Equity:             {}", format_amount(kpis.new_equity));
    println!("  Delta vs baseline:  {}%", format_amount(kpis.delta_percent));
    println!(
        "  Daily goal:         {} ({}%)",
        format_amount(kpis.daily_goal_value),
        format_amount(kpis.daily_goal_percent)
    );
    println!("  Monthly goal:       {}", format_amount(kpis.monthly_goal_value));
    println!(
        "  Left to monthly:    {} ({}%)",
        format_amount(kpis.monthly_diff),
        format_amount(kpis.monthly_diff_percent)
    );
}
