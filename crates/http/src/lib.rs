//! HTTP API server for streakcert.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;
#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;

use streakcert_core::Clock;
use streakcert_service::{
    DailySessionService, ProfileService, QuestionSelector, StreakReconciler,
};
use streakcert_storage::StorageBackend;

pub use response_types::{ReadinessResponse, ReconcileResponse, SessionView, VersionResponse};

/// Spawns a background task that runs the streak reconciler every `interval`.
///
/// The first run happens one full interval after startup. Errors are logged
/// and the loop carries on; the next tick retries.
pub fn start_reconcile_scheduler(reconciler: Arc<StreakReconciler>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval() fires immediately; skip that so startup does not reconcile.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tracing::debug!("Reconcile scheduler: running streak reconciliation...");
            let job = Arc::clone(&reconciler);
            let result = tokio::spawn(async move { job.reconcile().await }).await;
            match result {
                Ok(Ok(report)) => {
                    if report.failed > 0 {
                        tracing::warn!(failed = report.failed, "Reconcile scheduler: some users failed");
                    }
                },
                Ok(Err(e)) => {
                    tracing::error!("Reconcile scheduler error: {e}");
                },
                Err(e) => {
                    tracing::error!("Reconcile scheduler panic: {e:?}");
                },
            }
        }
    });
}

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Which storage backend is serving requests, for readiness output
    pub backend: &'static str,
    /// Daily session lifecycle
    pub session_service: Arc<DailySessionService>,
    /// Streak/penalty reconciliation job
    pub reconciler: Arc<StreakReconciler>,
    /// Profile and ledger reads
    pub profile_service: Arc<ProfileService>,
}

impl AppState {
    /// Wire every service over one storage backend and clock.
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        let selector = Arc::new(QuestionSelector::new(Arc::clone(&storage)));
        Self::with_selector(storage, clock, selector)
    }

    #[must_use]
    pub fn with_selector(
        storage: Arc<StorageBackend>,
        clock: Arc<dyn Clock>,
        selector: Arc<QuestionSelector>,
    ) -> Self {
        Self {
            backend: storage.kind(),
            session_service: Arc::new(DailySessionService::new(
                Arc::clone(&storage),
                selector,
                Arc::clone(&clock),
            )),
            reconciler: Arc::new(StreakReconciler::new(Arc::clone(&storage), clock)),
            profile_service: Arc::new(ProfileService::new(storage)),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/readiness", get(readiness))
        .route("/api/version", get(version))
        .route(
            "/api/sessions/today",
            get(handlers::sessions::get_today).post(handlers::sessions::start_today),
        )
        .route("/api/sessions/today/answer", post(handlers::sessions::answer))
        .route("/api/sessions/today/advance", post(handlers::sessions::advance))
        .route("/api/sessions/today/complete", post(handlers::sessions::complete))
        .route("/api/reconcile", post(handlers::reconcile::run_reconcile))
        .route("/api/profile/{user_id}", get(handlers::profile::get_profile))
        .route("/api/profile/{user_id}/transactions", get(handlers::profile::get_transactions))
        .route("/api/profile/{user_id}/streaks", get(handlers::profile::get_streaks))
        .route("/api/profile/{user_id}/sessions", get(handlers::profile::get_sessions))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn readiness(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<ReadinessResponse> {
    Json(ReadinessResponse { status: "ready".to_owned(), backend: state.backend.to_owned() })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION").to_owned() })
}
