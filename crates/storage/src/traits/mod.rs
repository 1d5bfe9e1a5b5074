//! Storage backend trait abstraction
//!
//! Async domain traits for every read and write the practice engine makes.
//! The service layer depends only on these, never on a concrete transport.

pub mod history;
pub mod ledger;
pub mod profile;
pub mod question;
pub mod session;

pub use history::HistoryStore;
pub use ledger::LedgerStore;
pub use profile::ProfileStore;
pub use question::QuestionStore;
pub use session::SessionStore;
