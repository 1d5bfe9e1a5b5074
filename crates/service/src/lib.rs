//! Service layer for streakcert
//!
//! Centralizes the practice engine between the HTTP/CLI edges and storage:
//! batch selection, the daily session lifecycle, the streak reconciler and
//! the profile read side.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]
#![allow(clippy::arithmetic_side_effects, reason = "Counters are bounded by the user count")]

mod error;
mod profile_service;
mod reconciler;
mod selector;
mod session_service;
#[cfg(test)]
mod tests;

pub use error::ServiceError;
pub use profile_service::ProfileService;
pub use reconciler::{ReconcileReport, StreakReconciler};
pub use selector::QuestionSelector;
pub use session_service::{
    Advance, AnswerOutcome, AnsweredQuestion, CompletionSummary, DailySessionService,
    PracticeSession, SessionStart,
};
