// Command-line entry point: analyze one ticker and print the response as JSON
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use indicator_engine::config::settings::EngineSettings;
use indicator_engine::data::csv_parser::CsvDialect;
use indicator_engine::data::market_data::{CsvDirectorySource, CsvFileSource, PriceSource};
use indicator_engine::services::{AnalysisService, ErrorResponse};

/// Compute Bollinger Bands, volume, SMA/EMA and RSI for a ticker's daily history.
#[derive(Parser, Debug)]
#[command(name = "indicator-engine", version, about)]
struct Args {
    /// Ticker to analyze; echoed back unchanged in the response
    ticker: String,

    /// Read this CSV file instead of looking the ticker up in the data directory
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Directory holding one `<TICKER>.csv` per instrument
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// CSV layout of the input files
    #[arg(long, value_enum)]
    dialect: Option<CsvDialect>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep only this many trailing days of history (0 keeps everything, negative is an error)
    #[arg(long, allow_negative_numbers = true)]
    history_days: Option<i64>,

    /// Write the response here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let settings = load_settings(args)?;
    let dialect = settings.data.dialect;
    let source: Box<dyn PriceSource> = match &args.csv {
        Some(path) => Box::new(CsvFileSource::new(path, dialect)),
        None => Box::new(CsvDirectorySource::new(&settings.data.dir, dialect)),
    };
    let service = AnalysisService::new(source, &settings).context("invalid engine settings")?;

    match service.analyze(&args.ticker) {
        Ok(response) => {
            write_json(args, &response)?;
            info!(ticker = %args.ticker, "Analysis written");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(ticker = %args.ticker, error = %e, "Analysis failed");
            write_json(args, &ErrorResponse::from_error(&args.ticker, &e))?;
            Ok(ExitCode::from(e.exit_code() as u8))
        }
    }
}

fn load_settings(args: &Args) -> anyhow::Result<EngineSettings> {
    let mut settings = EngineSettings::load(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        settings.data.dir = dir.clone();
    }
    if let Some(dialect) = args.dialect {
        settings.data.dialect = dialect;
    }
    if let Some(days) = args.history_days {
        settings.override_history_days(days)?;
    }
    settings.validate()?;
    Ok(settings)
}

fn write_json<T: Serialize>(args: &Args, value: &T) -> anyhow::Result<()> {
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create '{}'", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
