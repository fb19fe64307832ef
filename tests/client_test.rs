//! Tests for the game service HTTP client against a mock service.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use whodat::{Answer, ConfirmReply, GameClient, TurnReply};

/// Serves the given router on an ephemeral port and returns a client
/// pointed at it.
async fn serve_mock(app: Router) -> GameClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock listener");
    let addr = listener.local_addr().expect("No local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server failed");
    });
    GameClient::new(&format!("http://{addr}"), Duration::from_secs(5))
        .expect("Failed to create client")
}

fn playing_body() -> serde_json::Value {
    serde_json::json!({
        "session_id": "s1",
        "status": "playing",
        "question_text": "Do they write Rust?",
        "attribute_key": "writes_rust",
        "questions_asked": 1
    })
}

#[tokio::test]
async fn test_start_game_success() {
    let app = Router::new().route("/start_game", post(|| async { Json(playing_body()) }));
    let client = serve_mock(app).await;

    let reply = client.start_game().await.expect("Start failed");
    assert_eq!(reply.session_id, "s1");
    assert_eq!(reply.question_text, "Do they write Rust?");
    assert_eq!(reply.attribute_key, "writes_rust");
    assert_eq!(reply.questions_asked, 1);
}

#[tokio::test]
async fn test_start_game_error_status_is_protocol_error() {
    let app = Router::new().route(
        "/start_game",
        post(|| async {
            Json(serde_json::json!({
                "session_id": "s1",
                "status": "error",
                "message": "No characters loaded"
            }))
        }),
    );
    let client = serve_mock(app).await;

    let err = client.start_game().await.expect_err("Start should fail");
    assert!(!err.is_transport());
    assert!(err.to_string().contains("No characters loaded"));
}

#[tokio::test]
async fn test_start_game_missing_fields_is_protocol_error() {
    let app = Router::new().route(
        "/start_game",
        post(|| async {
            Json(serde_json::json!({
                "session_id": "s1",
                "status": "playing",
                "questions_asked": 1
            }))
        }),
    );
    let client = serve_mock(app).await;

    let err = client.start_game().await.expect_err("Start should fail");
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_submit_answer_sends_wire_vocabulary() {
    let captured: Arc<Mutex<Option<serde_json::Value>>> = Arc::new(Mutex::new(None));
    let capture = captured.clone();
    let app = Router::new().route(
        "/questions",
        post(move |Json(body): Json<serde_json::Value>| {
            let capture = capture.clone();
            async move {
                *capture.lock().unwrap() = Some(body);
                Json(serde_json::json!({
                    "session_id": "s1",
                    "status": "playing",
                    "question_text": "Do they use Vim?",
                    "attribute_key": "uses_vim",
                    "questions_asked": 2
                }))
            }
        }),
    );
    let client = serve_mock(app).await;

    let envelope = client
        .submit_answer("s1", "writes_rust", Answer::ProbablyYes)
        .await
        .expect("Submit failed");
    assert!(matches!(envelope.reply, TurnReply::Playing { .. }));

    let body = captured.lock().unwrap().clone().expect("Body not captured");
    assert_eq!(body["session_id"], "s1");
    assert_eq!(body["attribute_key"], "writes_rust");
    assert_eq!(body["answer"], "Probably Yes");
}

#[tokio::test]
async fn test_submit_answer_parses_guess() {
    let app = Router::new().route(
        "/questions",
        post(|| async {
            Json(serde_json::json!({
                "session_id": "s1",
                "status": "make_guess",
                "guess": "Grace Hopper",
                "certainty": 0.92
            }))
        }),
    );
    let client = serve_mock(app).await;

    let envelope = client
        .submit_answer("s1", "writes_rust", Answer::Yes)
        .await
        .expect("Submit failed");
    assert_eq!(envelope.session_id.as_deref(), Some("s1"));
    assert_eq!(
        envelope.reply,
        TurnReply::MakeGuess {
            guess: Some("Grace Hopper".to_string()),
            certainty: 0.92,
        }
    );
}

#[tokio::test]
async fn test_submit_answer_error_status_is_a_valid_reply() {
    let app = Router::new().route(
        "/questions",
        post(|| async {
            Json(serde_json::json!({
                "session_id": "s1",
                "status": "error",
                "message": "Session expired"
            }))
        }),
    );
    let client = serve_mock(app).await;

    let envelope = client
        .submit_answer("s1", "writes_rust", Answer::No)
        .await
        .expect("A well-formed error status should parse");
    assert_eq!(
        envelope.reply,
        TurnReply::Error {
            message: "Session expired".to_string(),
        }
    );
}

#[tokio::test]
async fn test_non_success_status_surfaces_detail() {
    let app = Router::new().route(
        "/questions",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"detail": "Session not found"})),
            )
        }),
    );
    let client = serve_mock(app).await;

    let err = client
        .submit_answer("s1", "writes_rust", Answer::Yes)
        .await
        .expect_err("404 should fail");
    assert!(!err.is_transport());
    assert!(err.to_string().contains("Session not found"));
}

#[tokio::test]
async fn test_non_success_status_without_detail_names_the_status() {
    let app = Router::new().route(
        "/questions",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = serve_mock(app).await;

    let err = client
        .submit_answer("s1", "writes_rust", Answer::Yes)
        .await
        .expect_err("500 should fail");
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_confirm_guess_sends_confirmation_body() {
    let captured: Arc<Mutex<Option<serde_json::Value>>> = Arc::new(Mutex::new(None));
    let capture = captured.clone();
    let app = Router::new().route(
        "/confirm_guess",
        post(move |Json(body): Json<serde_json::Value>| {
            let capture = capture.clone();
            async move {
                *capture.lock().unwrap() = Some(body);
                Json(serde_json::json!({
                    "session_id": "s1",
                    "status": "finished_won",
                    "message": "Great! I knew it!",
                    "top_candidates": [["Grace Hopper", 0.97]]
                }))
            }
        }),
    );
    let client = serve_mock(app).await;

    let envelope = client
        .confirm_guess("s1", "Grace Hopper", true)
        .await
        .expect("Confirm failed");
    match envelope.reply {
        ConfirmReply::FinishedWon {
            message,
            top_candidates,
        } => {
            assert_eq!(message, "Great! I knew it!");
            assert_eq!(top_candidates, vec![("Grace Hopper".to_string(), 0.97)]);
        }
        other => panic!("expected finished_won, got {other:?}"),
    }

    let body = captured.lock().unwrap().clone().expect("Body not captured");
    assert_eq!(body["session_id"], "s1");
    assert_eq!(body["guessed_character_name"], "Grace Hopper");
    assert_eq!(body["user_confirms_correct"], true);
}

#[tokio::test]
async fn test_confirm_guess_unrecognized_status_is_protocol_error() {
    let app = Router::new().route(
        "/confirm_guess",
        post(|| async { Json(serde_json::json!({"session_id": "s1", "status": "meditating"})) }),
    );
    let client = serve_mock(app).await;

    let err = client
        .confirm_guess("s1", "Grace Hopper", false)
        .await
        .expect_err("Unknown status should fail");
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let client = GameClient::new("http://127.0.0.1:1", Duration::from_millis(500))
        .expect("Failed to create client");

    let err = client.start_game().await.expect_err("Call should fail");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_ping_returns_welcome_message() {
    let app = Router::new().route(
        "/",
        get(|| async { Json(serde_json::json!({"message": "Welcome to Who Dat Dev!"})) }),
    );
    let client = serve_mock(app).await;

    let message = client.ping().await.expect("Ping failed");
    assert_eq!(message.as_deref(), Some("Welcome to Who Dat Dev!"));
}
