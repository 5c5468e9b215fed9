//! CSV Indexer Main Entry Point
//!
//! Rebuilds the features index from a delimited file: deletes the index,
//! recreates it and bulk loads every row.
//!
//! Usage: `csv-indexer [SOURCE_FILE]`

use csv_indexer::{Dependencies, IndexerConfig, IndexingError};
use dotenv::dotenv;
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("csv_indexer=info,csv_indexer_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "csv-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting CSV Indexer");

    let mut config = IndexerConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;
    if let Some(path) = env::args().nth(1) {
        config = config.with_source_path(path);
    }

    let deps = match Dependencies::new(&config) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let Dependencies {
        mut orchestrator,
        source,
    } = deps;

    match orchestrator.run(source).await {
        Ok(report) => {
            if report.is_clean() {
                info!(
                    documents_uploaded = report.documents_uploaded,
                    "Index rebuilt successfully"
                );
            } else {
                warn!(
                    documents_uploaded = report.documents_uploaded,
                    batches_failed = report.batches_failed,
                    document_failures = report.document_failures.len(),
                    "Index rebuilt with failures"
                );
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Index rebuild failed");
            Err(e.into())
        }
    }
}
