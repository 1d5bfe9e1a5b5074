//! Test utilities and module declarations for storage tests.

#![allow(clippy::unwrap_used, reason = "test code")]

use chrono::{NaiveDate, Utc};
use streakcert_core::{AnswerOption, DailySession, Question, UserProfile, parse_date};

use crate::MemoryStorage;

pub fn create_test_storage() -> MemoryStorage {
    MemoryStorage::new()
}

pub fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

pub fn create_test_question(id: &str, certification_id: &str, approved: bool) -> Question {
    Question {
        id: id.to_owned(),
        certification_id: certification_id.to_owned(),
        question_text: format!("Question {id}?"),
        option_a: "alpha".to_owned(),
        option_b: "beta".to_owned(),
        option_c: "gamma".to_owned(),
        option_d: "delta".to_owned(),
        correct_answer: AnswerOption::B,
        explanation: "beta is right".to_owned(),
        difficulty_level: 2,
        topic: "networking".to_owned(),
        source_url: None,
        approved,
        times_answered: 0,
        times_correct: 0,
        created_at: Utc::now(),
    }
}

pub fn create_test_profile(id: &str, streak: i32, last: Option<&str>) -> UserProfile {
    let mut profile = UserProfile::new(id, Utc::now());
    profile.streak_count = streak;
    profile.longest_streak = streak;
    profile.last_session_date = last.map(date);
    profile.subscription_active = true;
    profile.selected_certification_id = Some("cert-1".to_owned());
    profile
}

pub fn create_test_session(id: &str, user_id: &str, day: &str) -> DailySession {
    DailySession::new(
        id.to_owned(),
        user_id.to_owned(),
        date(day),
        "cert-1".to_owned(),
        vec!["q1".to_owned(), "q2".to_owned()],
        Utc::now(),
    )
}

mod session_tests;
