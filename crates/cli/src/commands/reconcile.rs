//! One-shot reconciliation for cron-style schedulers.
//!
//! Prints the same JSON body as `POST /api/reconcile` and exits non-zero on
//! failure.

use std::sync::Arc;

use anyhow::Result;
use streakcert_core::{AppConfig, Clock, SystemClock};
use streakcert_http::ReconcileResponse;
use streakcert_service::StreakReconciler;

use crate::open_storage;

pub(crate) async fn run(config: AppConfig) -> Result<()> {
    let storage = open_storage(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let reconciler = StreakReconciler::new(storage, clock);

    match reconciler.reconcile().await {
        Ok(report) => {
            let body = ReconcileResponse { success: true, results: report, timestamp: report.timestamp };
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        },
        Err(e) => {
            let body = serde_json::json!({"success": false, "error": e.to_string()});
            println!("{}", serde_json::to_string_pretty(&body)?);
            Err(e.into())
        },
    }
}
