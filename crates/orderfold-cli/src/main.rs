//! Binary entrypoint: reconcile an order export against a catalog export.
mod presenters;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use orderfold_core::{
    CatalogSource, JsonFileSource, OrderSource, Presenter, ReconcileConfig, Reconciler, Scope,
};
use presenters::{JsonPresenter, TablePresenter};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    ManufacturerRequests,
    Installments,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::ManufacturerRequests => Scope::ManufacturerRequests,
            ScopeArg::Installments => Scope::Installments,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "orderfold", version, about = "Reconcile order lines into one row per order")]
struct Cli {
    /// JSON file with raw order/request records
    #[arg(long, value_name = "PATH")]
    orders: PathBuf,

    /// JSON file with catalog models and their variants
    #[arg(long, value_name = "PATH")]
    catalog: PathBuf,

    /// YAML reconciliation settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listing the records come from; overrides the config file
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Print the run report to stderr
    #[arg(long)]
    report: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn reconcile_config(&self) -> Result<ReconcileConfig> {
        let config = match &self.config {
            Some(path) => ReconcileConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ReconcileConfig::default(),
        };
        Ok(match self.scope {
            Some(scope) => config.with_scope(scope.into()),
            None => config,
        })
    }

    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let reconciler = Reconciler::new(cli.reconcile_config()?);

    // Both inputs must be complete before reconciliation starts
    let orders = JsonFileSource::new(&cli.orders);
    let catalog = JsonFileSource::new(&cli.catalog);
    let (records, models) = tokio::try_join!(
        tokio::task::spawn_blocking(move || orders.fetch_lines()),
        tokio::task::spawn_blocking(move || catalog.fetch_models()),
    )
    .context("loading inputs")?;
    let records = records.with_context(|| format!("reading {}", cli.orders.display()))?;
    let models = models.with_context(|| format!("reading {}", cli.catalog.display()))?;

    tracing::info!(
        records = records.len(),
        models = models.len(),
        scope = %reconciler.config().scope,
        "inputs loaded"
    );

    let run = reconciler.run(&records, &models);

    let stdout = std::io::stdout();
    let out = stdout.lock();
    match cli.format {
        Format::Table => TablePresenter::new(out).present(&run.orders)?,
        Format::Json => JsonPresenter::new(out).present(&run.orders)?,
    }

    if cli.report {
        eprintln!("{}", serde_json::to_string_pretty(&run.report)?);
        eprintln!("fingerprint: {}", run.fingerprint()?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "orderfold",
            "--orders",
            "requests.json",
            "--catalog",
            "catalog.json",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.orders, PathBuf::from("requests.json"));
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.log_level(), Level::TRACE);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "orderfold", "--orders", "a", "--catalog", "b", "--quiet", "-v",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scope_flag_overrides_default() {
        let cli = Cli::try_parse_from([
            "orderfold", "--orders", "a", "--catalog", "b", "--scope", "installments",
        ])
        .unwrap();
        let reconciler = Reconciler::new(cli.reconcile_config().unwrap());
        assert_eq!(reconciler.config().scope, Scope::Installments);

        let cli = Cli::try_parse_from(["orderfold", "--orders", "a", "--catalog", "b"]).unwrap();
        assert_eq!(cli.reconcile_config().unwrap().scope, Scope::ManufacturerRequests);
    }

    #[test]
    fn test_requires_inputs() {
        assert!(Cli::try_parse_from(["orderfold", "--orders", "a"]).is_err());
    }
}
