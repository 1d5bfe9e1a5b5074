//! Core types and rules for streakcert
//!
//! Domain types shared across all other crates, plus the pure pieces of the
//! practice engine: the mastery update rule, question scoring and batch
//! sampling, and the injectable clock.

mod clock;
pub mod constants;
mod env_config;
mod error;
mod history;
mod ledger;
mod profile;
mod question;
mod selection;
#[cfg(test)]
mod selection_tests;
mod session;

pub use clock::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use history::*;
pub use ledger::*;
pub use profile::*;
pub use question::*;
pub use selection::*;
pub use session::*;
