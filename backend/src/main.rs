use std::sync::Arc;

use earnings_dashboard::app;
use earnings_dashboard::config::AppConfig;
use earnings_dashboard::logging::{self, LoggingConfig};
use earnings_dashboard::state::AppState;
use earnings_dashboard::store::{AnalysisStore, PgAnalysisStore};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let store = Arc::new(PgAnalysisStore::connect(&config.database).await?);
    report_table(store.as_ref()).await;

    let app = app::create_app(AppState::new(store.clone()));

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Earnings dashboard backend running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("👋 Shutdown complete");

    Ok(())
}

/// Log the shape of the analysis table so a misconfigured database shows up at boot.
async fn report_table(store: &dyn AnalysisStore) {
    match store.describe().await {
        Ok(description) => {
            for (name, data_type) in &description.columns {
                info!("  transcript_analyses.{}: {}", name, data_type);
            }
            info!("📈 transcript_analyses holds {} rows", description.row_count);
        }
        Err(e) => warn!("⚠️ Could not inspect transcript_analyses: {}", e),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
