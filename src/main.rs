use chrono::{Local, NaiveDate};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use vendor_risk::config::AppConfig;
use vendor_risk::error::AppError;
use vendor_risk::register::domain::{RiskCategory, NEEDS_REVIEW, RISK_CATEGORY};
use vendor_risk::register::{self, report};
use vendor_risk::telemetry;

const DEFAULT_CANDIDATES: [&str; 2] = [
    "data/vendor_register_template.xlsx",
    "data/vendor_register_template.csv",
];

#[derive(Parser, Debug)]
#[command(
    name = "vendor-risk",
    about = "Analyze a vendor risk register: derive review flags and emit annotated reports",
    version
)]
struct Cli {
    /// Input register file (xlsx or csv); defaults to the template search order
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,
    /// Output directory for reports and charts
    #[arg(long, short = 'o', default_value = "outputs")]
    outdir: PathBuf,
    /// Staleness window in days for the Needs Review flag
    #[arg(long, short = 'd', default_value_t = 365)]
    days: i64,
    /// High-risk score cutoff
    #[arg(long, short = 't', default_value_t = 80)]
    threshold: i64,
    /// Evaluation date for the run (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load();
    telemetry::init(&config.telemetry)?;

    info!("starting register analysis");

    let candidates: Vec<PathBuf> = match &cli.input {
        Some(path) => vec![path.clone()],
        None => DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
    };

    let source = register::resolve_source(&candidates)?;
    let mut frame = register::load(&source)?;
    register::ensure_columns(&mut frame);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let high_threshold = cli.threshold as f64;
    register::compute_flags(&mut frame, today, cli.days, high_threshold);

    log_summary(&frame, high_threshold);

    fs::create_dir_all(&cli.outdir)?;
    register::write_reports(&frame, &cli.outdir, high_threshold)?;
    register::render_charts(&frame, &cli.outdir)?;

    let outdir = cli.outdir.canonicalize().unwrap_or(cli.outdir);
    info!(outdir = %outdir.display(), "analysis complete");
    Ok(())
}

fn log_summary(frame: &register::Frame, high_threshold: f64) {
    let high_risk = (0..frame.row_count())
        .filter(|row| report::row_is_high_risk(frame, *row, high_threshold))
        .count();
    let needs_review = (0..frame.row_count())
        .filter(|row| frame.value(*row, NEEDS_REVIEW).as_bool().unwrap_or(false))
        .count();

    info!(rows = frame.row_count(), high_risk, needs_review, "register flagged");

    for category in RiskCategory::ordered() {
        let count = (0..frame.row_count())
            .filter(|row| frame.value(*row, RISK_CATEGORY).render() == category.label())
            .count();
        if count > 0 {
            info!(category = category.label(), count, "risk category");
        }
    }
}
