use super::{create_test_profile, create_test_session, create_test_storage, date};
use crate::traits::{HistoryStore, ProfileStore, SessionStore};
use chrono::Utc;
use streakcert_core::{AnswerOption, QuestionHistory, SessionAnswer, SessionCompletion};

fn answer(id: &str, session_id: &str, question_id: &str, correct: bool) -> SessionAnswer {
    SessionAnswer {
        id: id.to_owned(),
        session_id: session_id.to_owned(),
        question_id: question_id.to_owned(),
        user_answer: AnswerOption::A,
        correct,
        time_spent_seconds: 7,
        answered_at: Utc::now(),
    }
}

fn answered_history(user_id: &str, question_id: &str, correct: bool) -> QuestionHistory {
    let now = Utc::now();
    let mut history = QuestionHistory::unseen(user_id, question_id, now);
    history.record_answer(correct, now);
    history
}

fn completion(session_id: &str, user_id: &str, day: &str, answered: i32, correct: i32) -> SessionCompletion {
    SessionCompletion {
        session_id: session_id.to_owned(),
        user_id: user_id.to_owned(),
        session_date: date(day),
        questions_answered: answered,
        correct_answers: correct,
        completed_at: Utc::now(),
    }
}

#[tokio::test]
async fn create_daily_session_keeps_first_row_for_the_day() {
    let storage = create_test_storage();
    let first = create_test_session("s1", "u1", "2024-01-05");
    let mut second = create_test_session("s2", "u1", "2024-01-05");
    second.question_ids = vec!["q9".to_owned()];

    let created = storage.create_daily_session(&first).await.unwrap();
    let raced = storage.create_daily_session(&second).await.unwrap();

    assert_eq!(created.id, "s1");
    assert_eq!(raced.id, "s1");
    assert_eq!(raced.question_ids, first.question_ids);
    assert_eq!(storage.recent_sessions("u1", 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn answers_are_returned_in_insert_order() {
    let storage = create_test_storage();
    storage.create_daily_session(&create_test_session("s1", "u1", "2024-01-05")).await.unwrap();
    for (i, qid) in ["q1", "q2"].iter().enumerate() {
        storage
            .record_answer(
                &answer(&format!("a{i}"), "s1", qid, false),
                &answered_history("u1", qid, false),
            )
            .await
            .unwrap();
    }

    let answers = storage.get_session_answers("s1").await.unwrap();
    let ids: Vec<&str> = answers.iter().map(|a| a.question_id.as_str()).collect();
    assert_eq!(ids, vec!["q1", "q2"]);
    assert_eq!(storage.fetch_history("u1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn record_answer_writes_nothing_when_history_write_fails() {
    let storage = create_test_storage();
    storage.create_daily_session(&create_test_session("s1", "u1", "2024-01-05")).await.unwrap();
    storage.inject_fault("upsert_history", "u1").await;

    let err = storage
        .record_answer(&answer("a1", "s1", "q1", true), &answered_history("u1", "q1", true))
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert!(storage.get_session_answers("s1").await.unwrap().is_empty());
    assert!(storage.get_history("u1", "q1").await.unwrap().is_none());

    storage.clear_faults().await;
    storage
        .record_answer(&answer("a1", "s1", "q1", true), &answered_history("u1", "q1", true))
        .await
        .unwrap();
    assert_eq!(storage.get_session_answers("s1").await.unwrap().len(), 1);
    let history = storage.get_history("u1", "q1").await.unwrap().unwrap();
    assert_eq!(history.times_seen, 1);
    assert_eq!(history.times_correct, 1);
}

#[tokio::test]
async fn complete_session_updates_profile_once() {
    let storage = create_test_storage();
    storage.save_profile(&create_test_profile("u1", 4, Some("2024-01-04"))).await.unwrap();
    storage.create_daily_session(&create_test_session("s1", "u1", "2024-01-05")).await.unwrap();

    let done = completion("s1", "u1", "2024-01-05", 10, 7);
    let profile = storage.complete_session(&done).await.unwrap().unwrap();
    assert_eq!(profile.streak_count, 5);
    assert_eq!(profile.longest_streak, 5);
    assert_eq!(profile.total_questions_answered, 10);
    assert_eq!(profile.total_correct_answers, 7);

    assert!(storage.complete_session(&done).await.unwrap().is_none());
    let stored = storage.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(stored.streak_count, 5);
    assert_eq!(stored.total_questions_answered, 10);

    let session = storage.get_daily_session("u1", date("2024-01-05")).await.unwrap().unwrap();
    assert!(session.completed);
    assert_eq!(session.correct_answers, 7);
    assert!(session.completed_at.is_some());
}

#[tokio::test]
async fn complete_session_without_profile_leaves_session_open() {
    let storage = create_test_storage();
    storage.create_daily_session(&create_test_session("s1", "ghost", "2024-01-05")).await.unwrap();

    let err = storage
        .complete_session(&completion("s1", "ghost", "2024-01-05", 2, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, crate::StorageError::NotFound { entity: "user_profile", .. }));

    let session = storage.get_daily_session("ghost", date("2024-01-05")).await.unwrap().unwrap();
    assert!(!session.completed);
}

#[tokio::test]
async fn recent_sessions_newest_first_with_limit() {
    let storage = create_test_storage();
    for (id, day) in [("s1", "2024-01-03"), ("s2", "2024-01-05"), ("s3", "2024-01-04")] {
        storage.create_daily_session(&create_test_session(id, "u1", day)).await.unwrap();
    }

    let recent = storage.recent_sessions("u1", 2).await.unwrap();
    let ids: Vec<&str> = recent.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s3"]);
}
