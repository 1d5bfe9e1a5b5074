//! Shared constants for streakcert.
//!
//! Selection tuning, the commitment contract and pool sizing live here so the
//! service and storage crates agree on them.

/// Questions presented in one daily session.
pub const DAILY_BATCH_SIZE: usize = 10;

/// Highest-scoring questions kept as the sampling pool.
pub const CANDIDATE_POOL_SIZE: usize = 30;

/// Width of the front-of-pool window each draw picks from.
pub const DRAW_WINDOW_SIZE: usize = 15;

/// Backfill only runs when the certification has at least this many approved questions.
pub const BACKFILL_MIN_APPROVED: usize = 10;

/// Score given to a question the user has never seen.
pub const UNSEEN_SCORE: f64 = 100.0;

/// Weight of `(100 - mastery_level)` in the score of a seen question.
pub const MASTERY_WEIGHT: f64 = 0.6;

/// Weight of `100 * (1 - success_rate)` in the score of a seen question.
pub const FAILURE_WEIGHT: f64 = 0.3;

/// Flat bonus added to every seen question. `last_seen_at` is not consulted.
pub const RECENCY_BONUS: f64 = 20.0;

/// Upper bound of `mastery_level`.
pub const MAX_MASTERY: i32 = 100;

/// Mastery points earned per exposure, on top of the success percentage.
pub const MASTERY_PER_EXPOSURE: i32 = 2;

/// Penalty charged for a missed day, in minor units (pence).
pub const PENALTY_AMOUNT_MINOR: i64 = 50;

/// Currency of every penalty.
pub const PENALTY_CURRENCY: &str = "GBP";

/// Consecutive days that make a streak refund-eligible.
pub const REFUND_STREAK_DAYS: i32 = 30;

/// Reason recorded in penalty metadata.
pub const MISSED_SESSION_REASON: &str = "missed_daily_session";

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Default number of rows returned by list endpoints.
pub const DEFAULT_LIST_LIMIT: usize = 30;

/// Maximum number of rows any list endpoint returns.
pub const MAX_LIST_LIMIT: usize = 365;
