use analytik_core::{FilterState, MonthCalendar, TOP_N_MAX, TOP_N_MIN};
use analytik_ingest::{DEFAULT_EXPORT_FILE, ExportOptions, SourceTable};
use analytik_reports::Dashboard;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod render;
mod state;

use config::{Config, init_config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "analytik",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ANALYTIK_BUILD_SHA"), ")"),
    about = "Commercial sales dashboard: KPIs, top customers, and monthly trends"
)]
struct Cli {
    /// Config file (default: ~/.analytik/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute KPIs, top customers and the monthly series for a filter selection
    Report {
        /// Sales CSV (defaults to ./ventas.csv if present)
        #[arg(long)]
        csv: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print the full snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write the filtered rows as CSV
    Export {
        /// Sales CSV (defaults to ./ventas.csv if present)
        #[arg(long)]
        csv: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (default: reporte_comercial.csv)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Append year, month_number and month_name columns
        #[arg(long, default_value_t = false)]
        with_periods: bool,
    },

    /// List the values available for each filter
    Options {
        /// Sales CSV (defaults to ./ventas.csv if present)
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write the default config file
    InitConfig,
}

/// Filter selection. A repeated flag selects several values; no flag means all.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long = "seller")]
    sellers: Vec<String>,

    #[arg(long = "customer")]
    customers: Vec<String>,

    #[arg(long = "year")]
    years: Vec<i32>,

    /// Month name from the configured calendar, or its number (1-12)
    #[arg(long = "month")]
    months: Vec<String>,

    /// Number of customers in the ranking (default from config)
    #[arg(long, value_parser = clap::value_parser!(u16).range(TOP_N_MIN as i64..=TOP_N_MAX as i64))]
    top_n: Option<u16>,
}

impl FilterArgs {
    fn to_state(&self, cfg: &Config) -> Result<FilterState> {
        let months = resolve_months(&self.months, &cfg.calendar.months)?;
        let top_n = self.top_n.map(usize::from).unwrap_or_else(|| cfg.default_top_n());
        Ok(FilterState::new()
            .with_sellers(self.sellers.iter().cloned())
            .with_customers(self.customers.iter().cloned())
            .with_years(self.years.iter().copied())
            .with_months(months)
            .with_top_n(top_n))
    }
}

fn resolve_months(args: &[String], calendar: &MonthCalendar) -> Result<Vec<String>> {
    args.iter()
        .map(|m| {
            if calendar.month_number(m).is_some() {
                return Ok(m.clone());
            }
            if let Ok(n) = m.parse::<u32>() {
                if let Ok(name) = calendar.month_name(n) {
                    return Ok(name.to_string());
                }
            }
            bail!(
                "unknown month '{}' (expected one of: {})",
                m,
                calendar.names().join(", ")
            )
        })
        .collect()
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Report { csv, filters, json } => {
            let cfg = load_config(cli.config.as_deref())?;
            let state = filters.to_state(&cfg)?;
            let mut dashboard = open_dashboard(csv, &cfg)?;
            let snap = dashboard.refresh(&state)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snap)?);
            } else {
                print!("{}", render::render_report(&snap, &cfg.labels)?);
            }
        }

        Command::Export { csv, filters, out, with_periods } => {
            let cfg = load_config(cli.config.as_deref())?;
            let state = filters.to_state(&cfg)?;
            let mut dashboard = open_dashboard(csv, &cfg)?;
            let bytes = dashboard.export(
                &state,
                ExportOptions { include_period_columns: with_periods },
            )?;

            let out = out.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
            std::fs::write(&out, &bytes).with_context(|| format!("write {}", out.display()))?;
            println!("Wrote {}", out.display());
        }

        Command::Options { csv, json } => {
            let cfg = load_config(cli.config.as_deref())?;
            let mut dashboard = open_dashboard(csv, &cfg)?;
            let snap = dashboard.refresh(&FilterState::new())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snap.options)?);
            } else {
                print!("{}", render::render_options(&snap.options)?);
            }
        }

        Command::InitConfig => {
            init_config(cli.config.as_deref())?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn default_sales_csv() -> PathBuf {
    PathBuf::from("ventas.csv")
}

fn open_dashboard(csv: Option<PathBuf>, cfg: &Config) -> Result<Dashboard> {
    let csv_path = csv.unwrap_or_else(default_sales_csv);
    if !csv_path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv_path.display());
    }

    let options = cfg.load_options();
    let mut dashboard = Dashboard::new(move || SourceTable::from_csv_path(&csv_path, &options));
    dashboard.table().context("loading sales table")?;
    Ok(dashboard)
}
