//! Service tests against the in-memory backend.

#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use streakcert_core::{
    AnswerOption, Certification, Clock, FixedClock, Question, UserProfile, parse_date,
};
use streakcert_storage::traits::{ProfileStore, QuestionStore};
use streakcert_storage::{MemoryStorage, StorageBackend};

use crate::{DailySessionService, ProfileService, QuestionSelector, StreakReconciler};

pub const CERT: &str = "cert-1";

pub fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

/// Everything a test needs, sharing one in-memory store and one clock.
pub struct Harness {
    pub memory: MemoryStorage,
    pub storage: Arc<StorageBackend>,
    pub clock: Arc<FixedClock>,
    pub selector: Arc<QuestionSelector>,
    pub sessions: DailySessionService,
    pub reconciler: StreakReconciler,
    pub profiles: ProfileService,
}

impl Harness {
    pub fn on(day: &str) -> Self {
        let memory = MemoryStorage::new();
        let storage = Arc::new(StorageBackend::Memory(memory.clone()));
        let clock = Arc::new(FixedClock::on_date(date(day)));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let selector = Arc::new(QuestionSelector::with_seed(Arc::clone(&storage), 7));
        let sessions =
            DailySessionService::new(Arc::clone(&storage), Arc::clone(&selector), Arc::clone(&dyn_clock));
        let reconciler = StreakReconciler::new(Arc::clone(&storage), dyn_clock);
        let profiles = ProfileService::new(Arc::clone(&storage));
        Self { memory, storage, clock, selector, sessions, reconciler, profiles }
    }

    pub async fn seed_certification(&self, id: &str, active: bool) {
        self.storage
            .save_certification(&Certification {
                id: id.to_owned(),
                name: "Cloud Practitioner".to_owned(),
                provider: "Acme".to_owned(),
                code: "ACM-100".to_owned(),
                description: String::new(),
                active,
            })
            .await
            .unwrap();
    }

    /// Active certification with `count` approved questions, all answered by `B`.
    pub async fn seed_questions(&self, count: usize) {
        self.seed_certification(CERT, true).await;
        for i in 0..count {
            self.storage.save_question(&question(&format!("q{i:02}"), CERT)).await.unwrap();
        }
    }

    pub async fn seed_profile(&self, id: &str, streak: i32, last: Option<&str>) -> UserProfile {
        let mut profile = UserProfile::new(id, Utc::now());
        profile.streak_count = streak;
        profile.longest_streak = streak;
        profile.last_session_date = last.map(date);
        profile.subscription_active = true;
        profile.selected_certification_id = Some(CERT.to_owned());
        self.storage.save_profile(&profile).await.unwrap();
        profile
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn profile(&self, id: &str) -> UserProfile {
        self.storage.get_profile(id).await.unwrap().unwrap()
    }
}

pub fn question(id: &str, certification_id: &str) -> Question {
    Question {
        id: id.to_owned(),
        certification_id: certification_id.to_owned(),
        question_text: format!("What is {id}?"),
        option_a: "one".to_owned(),
        option_b: "two".to_owned(),
        option_c: "three".to_owned(),
        option_d: "four".to_owned(),
        correct_answer: AnswerOption::B,
        explanation: "two it is".to_owned(),
        difficulty_level: 1,
        topic: "basics".to_owned(),
        source_url: None,
        approved: true,
        times_answered: 0,
        times_correct: 0,
        created_at: Utc::now(),
    }
}

mod selector_tests;
