use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::fs;
use std::sync::Arc;
use chrono::Local;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use transaction_summary::{create_router, SummaryConfig, SummaryEngine};

#[derive(Parser, Debug)]
#[command(about = "HTTP service summarizing transaction files by product and city")]
struct Args {
    /// Base directory containing transactions/ and products/ProductReference.csv
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Directory of transaction files (overrides <DATA_DIR>/transactions)
    #[arg(long)]
    transactions_dir: Option<PathBuf>,

    /// Product reference file (overrides <DATA_DIR>/products/ProductReference.csv)
    #[arg(long)]
    product_file: Option<PathBuf>,

    /// Extension of transaction files, repeatable (defaults to csv)
    #[arg(long = "extension")]
    extensions: Vec<String>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Log directory (defaults to logs/)
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

impl Args {
    fn summary_config(&self) -> SummaryConfig {
        let mut config = SummaryConfig::from_data_dir(&self.data_dir)
            .with_extensions(self.extensions.clone());
        if let Some(dir) = &self.transactions_dir {
            config.transactions_dir = dir.clone();
        }
        if let Some(file) = &self.product_file {
            config.product_file = file.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Create logs directory if it doesn't exist
    if !args.log_dir.exists() {
        fs::create_dir_all(&args.log_dir)?;
    }

    // Generate log filename with current datetime
    let datetime = Local::now().format("%Y%m%d_%H%M%S");
    let log_file = args.log_dir.join(format!("transaction_summary_{}.log", datetime));

    // Initialize logging to a file
    let file_appender =
        tracing_appender::rolling::never(&args.log_dir, log_file.file_name().unwrap_or_default());
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = args.summary_config();
    info!(
        "Serving transactions from {:?} with products from {:?}",
        config.transactions_dir, config.product_file
    );

    let app = create_router(Arc::new(SummaryEngine::new(config)));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error")?;

    Ok(())
}
