//! PostgreSQL schema migrations for streakcert storage.

use sqlx::PgPool;

use crate::error::StorageError;

/// Run all PostgreSQL migrations. Every statement is idempotent.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS certifications (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            provider TEXT NOT NULL,
            code TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            certification_id TEXT NOT NULL REFERENCES certifications (id),
            question_text TEXT NOT NULL,
            option_a TEXT NOT NULL,
            option_b TEXT NOT NULL,
            option_c TEXT NOT NULL,
            option_d TEXT NOT NULL,
            correct_answer TEXT NOT NULL CHECK (correct_answer IN ('A', 'B', 'C', 'D')),
            explanation TEXT NOT NULL DEFAULT '',
            difficulty_level INTEGER NOT NULL DEFAULT 1,
            topic TEXT NOT NULL DEFAULT '',
            source_url TEXT,
            approved BOOLEAN NOT NULL DEFAULT FALSE,
            times_answered BIGINT NOT NULL DEFAULT 0,
            times_correct BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_questions_cert_approved
             ON questions (certification_id) WHERE approved",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id TEXT PRIMARY KEY,
            selected_certification_id TEXT,
            streak_count INTEGER NOT NULL DEFAULT 0 CHECK (streak_count >= 0),
            longest_streak INTEGER NOT NULL DEFAULT 0,
            last_session_date DATE,
            total_questions_answered BIGINT NOT NULL DEFAULT 0,
            total_correct_answers BIGINT NOT NULL DEFAULT 0,
            subscription_active BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CHECK (longest_streak >= streak_count)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_profiles_active ON user_profiles (id) WHERE subscription_active",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_question_history (
            user_id TEXT NOT NULL,
            question_id TEXT NOT NULL,
            times_seen INTEGER NOT NULL DEFAULT 0,
            times_correct INTEGER NOT NULL DEFAULT 0,
            mastery_level INTEGER NOT NULL DEFAULT 0 CHECK (mastery_level BETWEEN 0 AND 100),
            last_seen_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (user_id, question_id),
            CHECK (times_correct <= times_seen)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            session_date DATE NOT NULL,
            certification_id TEXT NOT NULL,
            question_ids JSONB NOT NULL DEFAULT '[]',
            questions_answered INTEGER NOT NULL DEFAULT 0,
            correct_answers INTEGER NOT NULL DEFAULT 0,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            completed_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, session_date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_answers (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES daily_sessions (id),
            question_id TEXT NOT NULL,
            user_answer TEXT NOT NULL,
            correct BOOLEAN NOT NULL,
            time_spent_seconds INTEGER NOT NULL DEFAULT 0,
            answered_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_answers_session ON session_answers (session_id, answered_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            transaction_type TEXT NOT NULL,
            amount_minor BIGINT NOT NULL,
            currency TEXT NOT NULL DEFAULT 'GBP',
            status TEXT NOT NULL DEFAULT 'pending',
            missed_date DATE,
            metadata JSONB NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one penalty per user per missed day, even under concurrent reconcile runs.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_tx_penalty_once
             ON transactions (user_id, missed_date, transaction_type)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS streak_records (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            streak_length INTEGER NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            completed_30_days BOOLEAN NOT NULL DEFAULT FALSE,
            refund_processed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_streaks_user ON streak_records (user_id, end_date DESC)")
        .execute(pool)
        .await?;

    tracing::debug!("PostgreSQL migrations applied");
    Ok(())
}
