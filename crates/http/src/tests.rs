#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{Value, json};
use streakcert_core::{
    AnswerOption, Certification, Clock, FixedClock, Question, UserProfile, parse_date,
};
use streakcert_service::QuestionSelector;
use streakcert_storage::StorageBackend;
use streakcert_storage::traits::{ProfileStore, QuestionStore};
use tower::ServiceExt as _;

use crate::{AppState, create_router};

async fn app_with_data(questions: usize) -> Router {
    let storage = Arc::new(StorageBackend::new_memory());
    storage
        .save_certification(&Certification {
            id: "cert-1".to_owned(),
            name: "Networking".to_owned(),
            provider: "Acme".to_owned(),
            code: "NET-1".to_owned(),
            description: String::new(),
            active: true,
        })
        .await
        .unwrap();
    for i in 0..questions {
        storage
            .save_question(&Question {
                id: format!("q{i}"),
                certification_id: "cert-1".to_owned(),
                question_text: format!("Question {i}"),
                option_a: "a".to_owned(),
                option_b: "b".to_owned(),
                option_c: "c".to_owned(),
                option_d: "d".to_owned(),
                correct_answer: AnswerOption::A,
                explanation: "a is right".to_owned(),
                difficulty_level: 1,
                topic: "basics".to_owned(),
                source_url: None,
                approved: true,
                times_answered: 0,
                times_correct: 0,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }
    for (id, streak, last) in [("u1", 0, None), ("lapsed", 5, Some("2024-01-01"))] {
        let mut profile = UserProfile::new(id, Utc::now());
        profile.streak_count = streak;
        profile.longest_streak = streak;
        profile.last_session_date = last.map(|d| parse_date(d).unwrap());
        profile.subscription_active = true;
        profile.selected_certification_id = Some("cert-1".to_owned());
        storage.save_profile(&profile).await.unwrap();
    }

    let clock: Arc<dyn Clock> = Arc::new(FixedClock::on_date(parse_date("2024-01-05").unwrap()));
    let selector = Arc::new(QuestionSelector::with_seed(Arc::clone(&storage), 3));
    create_router(Arc::new(AppState::with_selector(storage, clock, selector)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        },
        None => Body::empty(),
    };
    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_and_version() {
    let app = app_with_data(0).await;
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let (_, body) = send(&app, "GET", "/api/readiness", None).await;
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn full_session_over_http() {
    let app = app_with_data(12).await;

    let (status, body) =
        send(&app, "POST", "/api/sessions/today", Some(json!({"user_id": "u1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "active");
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    assert!(questions[0].get("correct_answer").is_none());

    for i in 0..10 {
        let (status, outcome) = send(
            &app,
            "POST",
            "/api/sessions/today/answer",
            Some(json!({"user_id": "u1", "index": i, "choice": "A", "time_spent_seconds": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["correct"], true);

        let (status, step) =
            send(&app, "POST", "/api/sessions/today/advance", Some(json!({"user_id": "u1"})))
                .await;
        assert_eq!(status, StatusCode::OK);
        if i < 9 {
            assert_eq!(step["state"], "next");
            assert_eq!(step["index"], i + 1);
        } else {
            assert_eq!(step["state"], "completed");
            assert_eq!(step["streak_count"], 1);
            assert_eq!(step["session"]["correct_answers"], 10);
        }
    }

    let (status, body) =
        send(&app, "POST", "/api/sessions/today/complete", Some(json!({"user_id": "u1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newly_completed"], false);

    let (_, body) =
        send(&app, "POST", "/api/sessions/today", Some(json!({"user_id": "u1"}))).await;
    assert_eq!(body["state"], "already_completed");

    let (_, profile) = send(&app, "GET", "/api/profile/u1", None).await;
    assert_eq!(profile["streak_count"], 1);
    assert_eq!(profile["total_correct_answers"], 10);
}

#[tokio::test]
async fn session_errors_map_to_status_codes() {
    let app = app_with_data(10).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sessions/today/answer",
        Some(json!({"user_id": "u1", "index": 0, "choice": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    send(&app, "POST", "/api/sessions/today", Some(json!({"user_id": "u1"}))).await;
    let user = json!({"user_id": "u1"});
    let (status, _) =
        send(&app, "POST", "/api/sessions/today/advance", Some(user.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, body) =
        send(&app, "POST", "/api/sessions/today/complete", Some(user)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "question 0 has not been answered");
    let (_, profile) = send(&app, "GET", "/api/profile/u1", None).await;
    assert_eq!(profile["streak_count"], 0);

    let answer = json!({"user_id": "u1", "index": 0, "choice": "B"});
    let (status, _) = send(&app, "POST", "/api/sessions/today/answer", Some(answer.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/api/sessions/today/answer", Some(answer)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions/today/answer",
        Some(json!({"user_id": "u1", "index": 42, "choice": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions/today",
        Some(json!({"user_id": "u1", "certification_id": "missing"})),
    )
    .await;
    // An active session exists, so the override is not consulted.
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        send(&app, "POST", "/api/sessions/today", Some(json!({"user_id": "nobody"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_certification_reports_no_content() {
    let app = app_with_data(0).await;
    let (status, body) =
        send(&app, "POST", "/api/sessions/today", Some(json!({"user_id": "u1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "no_content");
}

#[tokio::test]
async fn reconcile_endpoint_reports_counts() {
    let app = app_with_data(0).await;

    let (status, body) = send(&app, "POST", "/api/reconcile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["results"]["checked"], 2);
    assert_eq!(body["results"]["penalties"], 1);
    assert_eq!(body["results"]["streaks_reset"], 1);
    assert!(body["timestamp"].is_string());

    let (_, again) = send(&app, "POST", "/api/reconcile", None).await;
    assert_eq!(again["results"]["penalties"], 0);

    let (_, txs) = send(&app, "GET", "/api/profile/lapsed/transactions?limit=5", None).await;
    assert_eq!(txs.as_array().unwrap().len(), 1);
    assert_eq!(txs[0]["missed_date"], "2024-01-04");
    let (_, streaks) = send(&app, "GET", "/api/profile/lapsed/streaks", None).await;
    assert_eq!(streaks[0]["streak_length"], 5);
}
