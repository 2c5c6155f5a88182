//! demand_plan CLI: forecast monthly demand from a sales CSV and plan orders.

use clap::Parser;
use demand_forecast::report::{render_text, write_chart_csv, write_json, write_order_plan_csv};
use demand_forecast::{parse_stock, DataLoader, DemandError, DemandPlanner, PlannerConfig};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "demand_plan")]
#[command(about = "Forecast monthly sales and units, then plan purchase orders")]
#[command(version)]
struct Cli {
    /// Sales history CSV (ProductName, SalesMonth, TotalSales, TotalUnits)
    input: PathBuf,

    /// Current warehouse stock; prompted for when omitted
    #[arg(short, long)]
    stock: Option<f64>,

    /// Months to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// Safety stock as a share of predicted demand
    #[arg(long)]
    safety_ratio: Option<f64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the order plan as CSV
    #[arg(long)]
    plan_csv: Option<PathBuf>,

    /// Write actual and forecast sales as CSV
    #[arg(long)]
    chart_csv: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error ({}): {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DemandError> {
    let mut config = match &cli.config {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig::default(),
    };
    if let Some(horizon) = cli.horizon {
        config = config.with_horizon(horizon);
    }
    if let Some(ratio) = cli.safety_ratio {
        config = config.with_safety_ratio(ratio);
    }

    let planner = DemandPlanner::from_config(config)?;

    // Input problems surface before the user is asked for anything
    tracing::info!("Loading sales data from {}", cli.input.display());
    let data = DataLoader::from_csv(&cli.input)?;

    let current_stock = match cli.stock {
        Some(stock) => stock,
        None => prompt_stock(planner.config().default_stock)?,
    };

    let report = planner.run(&data, current_stock)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(render_text(&report)?.as_bytes())?;

    if let Some(path) = &cli.plan_csv {
        write_order_plan_csv(&report.order_plan, create(path)?)?;
        tracing::info!("Order plan written to {}", path.display());
    }
    if let Some(path) = &cli.chart_csv {
        write_chart_csv(&report, create(path)?)?;
        tracing::info!("Chart data written to {}", path.display());
    }
    if let Some(path) = &cli.json {
        let mut writer = create(path)?;
        write_json(&report, &mut writer)?;
        writer.flush()?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}

fn prompt_stock(default_stock: f64) -> Result<f64, DemandError> {
    let mut stderr = io::stderr();
    write!(stderr, "Current stock [{:.0}]: ", default_stock)?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    parse_stock(&line, default_stock)
}

fn create(path: &Path) -> Result<BufWriter<File>, DemandError> {
    Ok(BufWriter::new(File::create(path)?))
}
