//! Report Viewer CLI
//!
//! Command-line access to the same pipeline the web page uses:
//! - List tables
//! - Filter a table and print or export the result
//! - Generate a default config file

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use report_viewer::api::dto::parse_bound;
use report_viewer::config::{generate_default_config, Config, ConfigOverrides};
use report_viewer::export::write_csv;
use report_viewer::pipeline::{list_tables, load_and_filter, FilterOutcome};
use report_viewer::store::RowSet;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Widest cell printed in table output
const MAX_CELL_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "report-viewer-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Filter and export a table from a local SQLite report database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database path (overrides DB_FILEPATH)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Table to read (overrides TABLE_NAME)
    #[arg(short, long, global = true)]
    pub table: Option<String>,

    /// Config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tables and views in the database
    Tables,

    /// Filter rows and print them
    Query {
        /// Inclusive start date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        from: Option<String>,
        /// Inclusive end date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        to: Option<String>,
        /// Value for the first field column (default: TIN)
        #[arg(long)]
        field1: Option<String>,
        /// Value for the second field column (default: Assessment Number)
        #[arg(long)]
        field2: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays clean for csv and json
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "report_viewer=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = ConfigOverrides {
        db_path: cli.db_path,
        table_name: cli.table,
        ..Default::default()
    };
    let load_config = || {
        Config::load_with_overrides(cli.config.as_deref(), &overrides)
            .context("Failed to load configuration")
    };

    match cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }

        Commands::Tables => {
            let config = load_config()?;
            let tables = list_tables(&config.source)?;
            if tables.is_empty() {
                println!("No tables found.");
            }
            for table in tables {
                println!("{}", table);
            }
        }

        Commands::Query {
            from,
            to,
            field1,
            field2,
            format,
            output,
        } => {
            let config = load_config()?;
            let from = parse_bound(from.as_deref()).map_err(|e| anyhow!(e))?;
            let to = parse_bound(to.as_deref()).map_err(|e| anyhow!(e))?;
            let criteria = config.filter.criteria(from, to, &[field1, field2]);

            let outcome = load_and_filter(&config, &criteria)?;

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("Failed to create {:?}", path))?,
                ),
                None => Box::new(std::io::stdout().lock()),
            };

            match format {
                OutputFormat::Csv => write_csv(outcome.rows(), &mut out)?,
                OutputFormat::Json => print_json(&mut out, &outcome)?,
                OutputFormat::Table => print_table(&mut out, &outcome)?,
            }
            out.flush()?;

            if let Some(path) = output {
                eprintln!("Wrote {} rows to {:?}", outcome.rows().len(), path);
            }
        }
    }

    Ok(())
}

fn print_json(out: &mut dyn Write, outcome: &FilterOutcome) -> anyhow::Result<()> {
    let rows = outcome.rows();
    let body = serde_json::json!({
        "columns": rows.columns(),
        "rows": rows.rows(),
        "source_rows": outcome.source_rows,
        "unparsed_rows": outcome.unparsed_rows,
        "summary": outcome.summary,
    });
    serde_json::to_writer_pretty(&mut *out, &body)?;
    writeln!(out)?;
    Ok(())
}

fn print_table(out: &mut dyn Write, outcome: &FilterOutcome) -> anyhow::Result<()> {
    let rows = outcome.rows();

    if rows.is_empty() {
        writeln!(out, "No rows match the selected filters")?;
    } else {
        write_table(out, rows)?;
    }

    let summary = &outcome.summary;
    writeln!(out)?;
    writeln!(out, "Rows: {} (of {} in table)", summary.row_count, outcome.source_rows)?;
    if let Some(total) = summary.amount_total {
        writeln!(out, "Total amount: {:.2}", total)?;
    }
    if let Some((lo, hi)) = summary.date_span {
        writeln!(out, "Date range: {} to {}", lo, hi)?;
    }
    if outcome.unparsed_rows > 0 {
        writeln!(
            out,
            "Skipped {} rows with an unreadable date",
            outcome.unparsed_rows
        )?;
    }
    Ok(())
}

fn write_table(out: &mut dyn Write, rows: &RowSet) -> std::io::Result<()> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|v| truncate(&v.to_string())).collect())
        .collect();

    let widths: Vec<usize> = rows
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(truncate(name).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &mut dyn Iterator<Item = String>| -> String {
        cells
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    writeln!(out, "{}", line(&mut rows.columns().iter().map(|c| truncate(c))))?;
    writeln!(
        out,
        "{}",
        "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1))
    )?;
    for row in cells {
        writeln!(out, "{}", line(&mut row.into_iter()))?;
    }
    Ok(())
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
        t.push('…');
        t
    }
}
