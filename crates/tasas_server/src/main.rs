//! Chilean loan interest-rate dashboard server

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tasas_core::Dataset;
use tasas_server::config::{build_config, CliArgs as ConfigCliArgs, Environment};
use tasas_server::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tasas dashboard server - interest rates of Chilean bank loans
#[derive(Parser, Debug)]
#[command(name = "tasas_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "TASAS_SERVER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TASAS_SERVER_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASAS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Dataset file (.xlsx, .xls, .ods or .csv)
    #[arg(short, long, value_name = "FILE", env = "TASAS_DATA_PATH")]
    data: Option<PathBuf>,

    /// Worksheet to read from a spreadsheet dataset
    #[arg(long, env = "TASAS_SHEET_NAME")]
    sheet: Option<String>,

    /// File served by /download_excel (defaults to the dataset file)
    #[arg(long, value_name = "FILE", env = "TASAS_EXCEL_PATH")]
    excel: Option<PathBuf>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            data_path: args.data,
            sheet_name: args.sheet,
            excel_path: args.excel,
        }
    }
}

fn init_tracing(log_level: &str, environment: Environment) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match environment {
        Environment::Production => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        Environment::Development => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cli_args: ConfigCliArgs = args.into();
    let config = build_config(&cli_args).context("invalid configuration")?;

    init_tracing(config.log_level.as_filter_str(), config.environment);

    tracing::info!("Tasas Dashboard Server v{}", tasas_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        environment = %config.environment,
        data_path = %config.data_path.display(),
        sheet = %config.sheet_name,
        "Server configuration loaded"
    );

    let source = config.data_source();
    let dataset = Dataset::load(&source)
        .with_context(|| format!("failed to load dataset from {}", config.data_path.display()))?;

    let server = Server::new(config, dataset);
    tracing::info!(address = %server.socket_addr(), "Starting server");

    server.run().await?;

    Ok(())
}
