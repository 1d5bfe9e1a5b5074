use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use streakcert_core::{AppConfig, Clock, SystemClock};
use streakcert_http::{AppState, create_router, start_reconcile_scheduler};

use crate::open_storage;

pub(crate) async fn run(config: AppConfig, port: Option<u16>, host: Option<String>) -> Result<()> {
    let storage = open_storage(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = Arc::new(AppState::new(storage, clock));

    if config.reconcile_interval_secs > 0 {
        tracing::info!(
            interval_secs = config.reconcile_interval_secs,
            "Starting reconcile scheduler"
        );
        start_reconcile_scheduler(
            Arc::clone(&state.reconciler),
            Duration::from_secs(config.reconcile_interval_secs),
        );
    } else {
        tracing::info!("STREAKCERT_RECONCILE_INTERVAL_SECS=0, reconcile scheduler disabled");
    }

    let router = create_router(state);
    let addr = format!(
        "{}:{}",
        host.unwrap_or(config.host),
        port.unwrap_or(config.port)
    );
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
