use std::sync::Arc;

use streakcert_core::QuestionHistory;
use streakcert_storage::traits::HistoryStore;

use super::{CERT, Harness};
use crate::{QuestionSelector, ServiceError};

#[tokio::test]
async fn five_approved_questions_all_returned() {
    let h = Harness::on("2024-01-05");
    h.seed_questions(5).await;

    let batch = h.selector.select_daily_batch("u1", CERT).await.unwrap();
    let mut ids: Vec<String> = batch.into_iter().map(|q| q.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["q00", "q01", "q02", "q03", "q04"]);
}

#[tokio::test]
async fn unknown_or_inactive_certification_is_invalid() {
    let h = Harness::on("2024-01-05");
    h.seed_certification("retired", false).await;

    let unknown = h.selector.select_daily_batch("u1", "nope").await.unwrap_err();
    assert!(matches!(unknown, ServiceError::InvalidInput(_)));
    let inactive = h.selector.select_daily_batch("u1", "retired").await.unwrap_err();
    assert!(matches!(inactive, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn unseen_questions_come_first() {
    let h = Harness::on("2024-01-05");
    h.seed_questions(50).await;
    let now = h.clock_now();
    // Master the first 25; the 25 unseen ones keep every draw window full.
    for i in 0..25 {
        let mut history = QuestionHistory::unseen("u1", &format!("q{i:02}"), now);
        for _ in 0..20 {
            history.record_answer(true, now);
        }
        h.storage.upsert_history(&history).await.unwrap();
    }

    let batch = h.selector.select_daily_batch("u1", CERT).await.unwrap();
    assert_eq!(batch.len(), 10);
    for q in &batch {
        let n: usize = q.id[1..].parse().unwrap();
        assert!(n >= 25, "mastered question {} drawn before unseen ones", q.id);
    }
}

#[tokio::test]
async fn same_seed_same_batch() {
    let h = Harness::on("2024-01-05");
    h.seed_questions(40).await;

    let a = QuestionSelector::with_seed(Arc::clone(&h.storage), 99);
    let b = QuestionSelector::with_seed(Arc::clone(&h.storage), 99);
    let ids = |v: Vec<streakcert_core::Question>| v.into_iter().map(|q| q.id).collect::<Vec<_>>();
    assert_eq!(
        ids(a.select_daily_batch("u1", CERT).await.unwrap()),
        ids(b.select_daily_batch("u1", CERT).await.unwrap())
    );
}
