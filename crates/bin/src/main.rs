//! trendscan CLI binary.
//!
//! Screens a ticker universe for earnings growth and price momentum and
//! writes the ranked report.

mod config;
mod logging;

use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;
use trendscan::data::{CsvTickerFeed, NasdaqTickerFeed, SecTickerFeed, TickerFeed, YahooProvider};
use trendscan::output::{ExportFormat, Exporter, ReportWriter, report_columns};
use trendscan::{ScreenOutcome, Screener};

#[derive(Parser)]
#[command(name = "trendscan")]
#[command(about = "Growth and momentum equity screener", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FeedKind {
    /// SEC company tickers file
    Sec,
    /// NASDAQ stock screener
    Nasdaq,
    /// CSV file with a `symbol` column
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen the universe and write the report
    Run {
        /// Where the universe comes from
        #[arg(long, value_enum, default_value = "sec")]
        feed: FeedKind,

        /// Contact user agent for the SEC feed ("Name email@example.com")
        #[arg(long)]
        sec_user_agent: Option<String>,

        /// Ticker file for `--feed csv`
        #[arg(long, required_if_eq("feed", "csv"))]
        tickers: Option<PathBuf>,

        /// Report file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Report format: csv, json or pretty-json (default: from the file extension)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Also write the run summary as JSON
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Process only the first N tickers
        #[arg(long)]
        limit: Option<usize>,

        /// Tickers processed at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Minimum milliseconds between provider requests
        #[arg(long)]
        min_interval_ms: Option<u64>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List report columns and their format hints
    Columns {
        /// Quarters per quarterly series
        #[arg(long, default_value = "4")]
        quarters: usize,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let progress = ProgressBar::hidden();
    logging::init(cli.verbose, &progress);

    match cli.command {
        Commands::Run {
            feed,
            sec_user_agent,
            tickers,
            output,
            format,
            summary,
            limit,
            concurrency,
            min_interval_ms,
            config,
        } => {
            let mut app = AppConfig::load(config.as_deref())?;
            if limit.is_some() {
                app.screener.limit = limit;
            }
            if let Some(concurrency) = concurrency {
                app.screener.concurrency = concurrency;
            }
            if let Some(ms) = min_interval_ms {
                app.yahoo.min_request_interval_ms = ms;
            }

            let outcome = match (feed, tickers) {
                (FeedKind::Sec, _) => {
                    let feed = match sec_user_agent.as_deref() {
                        Some(agent) => SecTickerFeed::with_user_agent(agent)?,
                        None => SecTickerFeed::new()?,
                    };
                    screen(&feed, &app, &progress).await?
                }
                (FeedKind::Csv, Some(path)) => {
                    screen(&CsvTickerFeed::new(path), &app, &progress).await?
                }
                (FeedKind::Csv, None) => return Err("--feed csv needs --tickers FILE".into()),
                (FeedKind::Nasdaq, _) => screen(&NasdaqTickerFeed::new()?, &app, &progress).await?,
            };

            write_report(
                &outcome,
                app.screener.report_quarters,
                output.as_deref(),
                format,
            )?;

            let run_summary = outcome.summary();
            eprint!("{}", run_summary.to_ascii_table());
            if let Some(path) = summary {
                run_summary.export_to_file(&path, ExportFormat::PrettyJson)?;
                info!(path = %path.display(), "wrote run summary");
            }
        }
        Commands::Columns { quarters } => list_columns(quarters),
    }

    Ok(())
}

async fn screen<F: TickerFeed>(
    feed: &F,
    app: &AppConfig,
    progress: &ProgressBar,
) -> Result<ScreenOutcome, Box<dyn std::error::Error>> {
    let provider = YahooProvider::with_config(app.yahoo.clone())?;

    progress.set_draw_target(ProgressDrawTarget::stderr());
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message("Fetching ticker universe...");

    let bar = progress.clone();
    let screener = Screener::new(app.screener.clone()).on_progress(move |p| {
        bar.set_length(p.total as u64);
        bar.set_position(p.completed as u64);
        bar.set_message(p.symbol.clone());
    });

    let outcome = screener.run(feed, &provider).await;
    progress.finish_and_clear();
    Ok(outcome?)
}

fn write_report(
    outcome: &ScreenOutcome,
    quarters: usize,
    output: Option<&Path>,
    format: Option<ExportFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = outcome.report_table(quarters);

    match output {
        Some(path) => {
            let format = format.unwrap_or_else(|| ExportFormat::from_path(path));
            table.export_to_file(path, format)?;
            info!(path = %path.display(), rows = table.len(), "wrote report");
        }
        None => {
            let writer = format.unwrap_or(ExportFormat::Csv).writer();
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writer.write_table(&table, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn list_columns(quarters: usize) {
    println!("{:<32} {:<26} {:<8} Description", "Key", "Header", "Format");
    println!("{}", "-".repeat(100));
    for column in report_columns(quarters) {
        println!(
            "{:<32} {:<26} {:<8} {}",
            column.key, column.header, column.format, column.description
        );
    }
}
