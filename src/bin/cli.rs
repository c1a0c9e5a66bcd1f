//! Borough Sales CLI
//!
//! Command-line access to the dashboard tables:
//! - List boroughs
//! - Rank neighborhoods, monthly trend, borough totals
//! - Browse sale rows
//! - Check server status
//! - Generate a config file

use anyhow::{bail, Context};
use borough_sales::aggregate::{
    BoroughTotal, MonthlyTotal, NeighborhoodCount, SalesAggregator, DEFAULT_BOTTOM_N,
    DEFAULT_TOP_N,
};
use borough_sales::config::Config;
use borough_sales::dataset::{Borough, EnrichedSale, SalesLoader};
use borough_sales::load_sales;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "borough-sales-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "NYC property sales by borough")]
#[command(long_about = "Query the NYC rolling sales dataset the way the dashboard does:\nneighborhood rankings, monthly price trends and borough totals.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sales CSV, overrides the configured path
    #[arg(long, global = true)]
    pub sales: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the borough catalog
    Boroughs,

    /// Most and least active neighborhoods of a borough
    Neighborhoods {
        /// Borough name (e.g. "Staten Island")
        borough: String,
        /// Size of the top ranking
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
        /// Size of the bottom ranking
        #[arg(long, default_value_t = DEFAULT_BOTTOM_N)]
        bottom: usize,
    },

    /// Monthly sale price totals of a borough
    Trend {
        /// Borough name
        borough: String,
    },

    /// Sale price totals per borough
    Totals,

    /// Print sale rows
    Records {
        /// Restrict to one borough
        #[arg(short, long)]
        borough: Option<String>,
        /// Maximum rows to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show server status
    Status {
        /// API server URL
        #[arg(long, default_value = "http://localhost:8086")]
        api_url: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Boroughs => {
            let rows: Vec<BoroughRow> = Borough::ALL.into_iter().map(BoroughRow::from).collect();
            emit(cli.format, &rows, &["Code", "Name"], |r| {
                vec![r.code.to_string(), r.name.to_string()]
            })?;
        }

        Commands::Neighborhoods {
            borough,
            top,
            bottom,
        } => {
            let aggregator = open_aggregator(&cli)?;
            let ranking = aggregator.rank_neighborhoods(borough, *top, *bottom)?;

            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&ranking)?);
            } else {
                let name = ranking.borough.name();
                let rows: Vec<RankedRow> = ranked_rows("top", &ranking.top)
                    .chain(ranked_rows("bottom", &ranking.bottom))
                    .collect();

                if cli.format == OutputFormat::Table {
                    println!("Top {} neighborhoods in {} by sales", top, name);
                    print_counts(&ranking.top);
                    println!();
                    println!("Bottom {} neighborhoods in {} by sales", bottom, name);
                    print_counts(&ranking.bottom);
                } else {
                    print_csv(&rows)?;
                }
            }
        }

        Commands::Trend { borough } => {
            let aggregator = open_aggregator(&cli)?;
            let months = aggregator.monthly_trend(borough)?;

            if cli.format == OutputFormat::Table {
                if let Some(first) = months.first() {
                    println!("Monthly sale prices in {}", first.borough_name);
                }
            }
            emit(cli.format, &months, &["Month", "Sale price"], |m: &MonthlyTotal| {
                vec![m.month.to_string(), format_price(m.sale_price)]
            })?;
        }

        Commands::Totals => {
            let aggregator = open_aggregator(&cli)?;
            let totals = aggregator.borough_totals();

            emit(
                cli.format,
                totals,
                &["Code", "Borough", "Sale price"],
                |t: &BoroughTotal| {
                    vec![
                        t.borough_code.to_string(),
                        t.borough_name.to_string(),
                        format_price(t.sale_price),
                    ]
                },
            )?;

            if cli.format == OutputFormat::Table {
                let grand: f64 = totals.iter().map(|t| t.sale_price).sum();
                println!("{}", "-".repeat(50));
                println!("{:<30} {:>19}", "Total", format_price(grand));
            }
        }

        Commands::Records { borough, limit } => {
            let aggregator = open_aggregator(&cli)?;
            let page = aggregator.records(borough.as_deref(), 0, *limit)?;

            emit(
                cli.format,
                &page.records,
                &["Borough", "Neighborhood", "Sale price", "Sale date"],
                |r: &&EnrichedSale| {
                    vec![
                        r.borough.name().to_string(),
                        r.neighborhood.clone(),
                        format_price(r.sale_price),
                        r.sale_date.to_string(),
                    ]
                },
            )?;

            if cli.format == OutputFormat::Table && page.total > page.records.len() {
                println!();
                println!("({} of {} rows shown)", page.records.len(), page.total);
            }
        }

        Commands::Status { api_url } => {
            let client = reqwest::Client::new();
            let response = client.get(format!("{}/health", api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Borough Sales v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );

                    println!();
                    println!("Dataset:");
                    if let Some(records) = health["records"].as_u64() {
                        println!("  Sale rows: {}", records);
                    }
                    if let Some(boroughs) = health["boroughs"].as_array() {
                        let names: Vec<&str> =
                            boroughs.iter().filter_map(|b| b.as_str()).collect();
                        println!("  Boroughs: {}", names.join(", "));
                    }
                    if let Some(features) = health["boundary_features"].as_u64() {
                        println!("  Boundary features: {}", features);
                    }
                    if let Some(loaded) = health["loaded_at"].as_str() {
                        println!("  Loaded at: {}", loaded);
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Borough Sales API at {}", api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin borough-sales");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = borough_sales::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Load the configured sales CSV, honoring `--config` and `--sales`
fn open_aggregator(cli: &Cli) -> anyhow::Result<SalesAggregator> {
    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    let loader = SalesLoader::from_config(&config.data)?;
    let path = cli.sales.clone().unwrap_or(config.data.sales_csv);
    if !path.exists() {
        bail!("Sales file not found: {:?}", path);
    }

    let dataset = load_sales(&path, &loader)
        .with_context(|| format!("Failed to load sales from {:?}", path))?;
    Ok(SalesAggregator::new(dataset))
}

#[derive(Serialize)]
struct BoroughRow {
    code: u8,
    name: &'static str,
}

impl From<Borough> for BoroughRow {
    fn from(borough: Borough) -> Self {
        Self {
            code: borough.code(),
            name: borough.name(),
        }
    }
}

#[derive(Serialize)]
struct RankedRow<'a> {
    ranking: &'static str,
    neighborhood: &'a str,
    count: usize,
}

fn ranked_rows<'a>(
    ranking: &'static str,
    counts: &'a [NeighborhoodCount],
) -> impl Iterator<Item = RankedRow<'a>> + 'a {
    counts.iter().map(move |c| RankedRow {
        ranking,
        neighborhood: &c.neighborhood,
        count: c.count,
    })
}

/// Print rows in the selected format
fn emit<T: Serialize>(
    format: OutputFormat,
    rows: &[T],
    headers: &[&str],
    cells: impl Fn(&T) -> Vec<String>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => print_csv(rows)?,
        OutputFormat::Table => print_table(headers, rows.iter().map(cells).collect()),
    }
    Ok(())
}

fn print_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("No data");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers.to_vec()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));

    for row in &rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn print_counts(counts: &[NeighborhoodCount]) {
    print_table(
        &["Neighborhood", "Count"],
        counts
            .iter()
            .map(|c| vec![c.neighborhood.clone(), c.count.to_string()])
            .collect(),
    );
}

/// Whole dollars with thousands separators
fn format_price(price: f64) -> String {
    let whole = format!("{:.0}", price.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);

    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if price < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
