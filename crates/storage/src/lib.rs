//! Storage layer for streakcert
//!
//! PostgreSQL is the production backend; an in-process backend with the same
//! atomicity guarantees serves tests and local runs. Both sit behind the store
//! traits and are dispatched through [`StorageBackend`].

mod backend;
mod error;
mod memory;
#[cfg(feature = "postgres")]
mod pg_migrations;
#[cfg(feature = "postgres")]
mod pg_storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
#[cfg(feature = "postgres")]
pub use pg_migrations::run_pg_migrations;
#[cfg(feature = "postgres")]
pub use pg_storage::PgStorage;
