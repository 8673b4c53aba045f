use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use skillsync_shared::protocol::HttpMethod;
use skillsync_shared::{HEADER_AUTHORIZATION, TOKEN_STORAGE_KEY};

use super::*;
use crate::config::{AI_TIMEOUT_MESSAGE, AppConfig};
use crate::session::{DurableStore, MemoryStore, TokenStore, TokenVault};

const BASE: &str = "http://localhost:5050/api";

// =========================================================
// 辅助函数
// =========================================================

struct Fixture {
    api: CareerApi<Rc<MockTransport>>,
    transport: Rc<MockTransport>,
    tokens: TokenStore,
    cookie: Arc<MemoryStore>,
    local: Arc<MemoryStore>,
}

fn fixture() -> Fixture {
    let transport = Rc::new(MockTransport::new());
    let cookie = MemoryStore::new();
    let local = MemoryStore::new();
    let tokens = TokenStore::new(TokenVault::new(cookie.clone(), local.clone()));
    let api = CareerApi::new(&AppConfig::default(), Rc::clone(&transport), tokens.clone());
    Fixture {
        api,
        transport,
        tokens,
        cookie,
        local,
    }
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn me_body() -> serde_json::Value {
    json!({
        "user": {
            "id": "u1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "profileCompleteness": 60
        }
    })
}

// =========================================================
// prepare 测试
// =========================================================

#[tokio::test]
async fn test_bearer_attached_when_token_present() {
    let f = fixture();
    f.tokens.persist("tok-123".to_string());
    f.transport
        .mock_response(HttpMethod::Get, &url("/auth/me"), 200, me_body());

    f.api.me().await.unwrap();

    let req = f.transport.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer tok-123"));
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let f = fixture();
    f.transport
        .mock_response(HttpMethod::Get, &url("/analysis/history"), 200, json!({}));

    f.api.history().await.unwrap();

    let req = f.transport.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), None);
}

#[tokio::test]
async fn test_token_read_from_durable_store_when_memory_empty() {
    let f = fixture();
    f.local.write(TOKEN_STORAGE_KEY, "persisted");
    f.transport
        .mock_response(HttpMethod::Get, &url("/analysis/history"), 200, json!({}));

    f.api.history().await.unwrap();

    let req = f.transport.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer persisted"));
}

#[test]
fn test_prepare_keeps_explicit_authorization_and_sets_limits() {
    let f = fixture();
    f.tokens.persist("session-token".to_string());

    let req = HttpRequest::new("/profile", HttpMethod::Get).with_header("authorization", "Basic xyz");
    let prepared = f.api.general().prepare(req);

    assert_eq!(prepared.url, url("/profile"));
    assert_eq!(prepared.header(HEADER_AUTHORIZATION), Some("Basic xyz"));
    assert_eq!(prepared.headers.len(), 1);
    assert_eq!(prepared.timeout, Some(Duration::from_secs(30)));
    assert!(prepared.with_credentials);

    let prepared = f
        .api
        .ai()
        .prepare(HttpRequest::new("/ai/chat", HttpMethod::Post));
    assert_eq!(prepared.timeout, Some(Duration::from_secs(60)));
    assert_eq!(
        prepared.header(HEADER_AUTHORIZATION),
        Some("Bearer session-token")
    );
}

#[tokio::test]
async fn test_json_body_sent_for_post_only() {
    let f = fixture();
    f.transport.mock_response(
        HttpMethod::Post,
        &url("/analysis/linkedin"),
        200,
        json!({ "profile": { "skills": [] } }),
    );
    f.transport
        .mock_response(HttpMethod::Get, &url("/analysis/history"), 200, json!({}));

    f.api
        .analyze_linkedin(" https://linkedin.com/in/ada ")
        .await
        .unwrap();
    let req = f.transport.last_request().unwrap();
    assert_eq!(
        req.body,
        HttpBody::Json(r#"{"url":"https://linkedin.com/in/ada"}"#.to_string())
    );
    assert_eq!(req.header("content-type"), Some("application/json"));

    f.api.history().await.unwrap();
    assert_eq!(f.transport.last_request().unwrap().body, HttpBody::Empty);
}

// =========================================================
// interpret 测试
// =========================================================

#[tokio::test]
async fn test_upload_timeout_is_rewritten() {
    let f = fixture();
    f.tokens.persist("tok".to_string());
    f.transport.mock_failure(
        HttpMethod::Post,
        &url("/analysis/upload-resume"),
        TransportError::Timeout,
    );

    let err = f
        .api
        .upload_resume("cv.pdf", "application/pdf", vec![1, 2, 3])
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    let message = err.user_message();
    assert!(message.contains("taking longer than expected"));
    assert!(!message.contains("aborted"));

    let req = f.transport.last_request().unwrap();
    match &req.body {
        HttpBody::Multipart(parts) => {
            assert_eq!(parts.len(), 1);
            assert_eq!(parts[0].field, "resume");
            assert_eq!(parts[0].file_name, "cv.pdf");
        }
        other => panic!("expected multipart body, got {:?}", other),
    }
    assert_eq!(req.header("content-type"), None);
}

#[tokio::test]
async fn test_ai_timeout_uses_ai_message() {
    let f = fixture();
    f.transport
        .mock_failure(HttpMethod::Post, &url("/ai/chat"), TransportError::Timeout);

    let err = f.api.chat("hello", None).await.unwrap_err();

    assert_eq!(err.user_message(), AI_TIMEOUT_MESSAGE);
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_next_request_is_anonymous() {
    let f = fixture();
    f.tokens.persist("expired".to_string());
    f.transport.mock_response(
        HttpMethod::Get,
        &url("/profile"),
        401,
        json!({ "message": "Token expired" }),
    );
    f.transport
        .mock_response(HttpMethod::Get, &url("/analysis/history"), 200, json!({}));

    let err = f.api.profile().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message().as_deref(), Some("Token expired"));

    assert_eq!(f.tokens.current(), None);
    assert_eq!(f.cookie.get(TOKEN_STORAGE_KEY), None);
    assert_eq!(f.local.get(TOKEN_STORAGE_KEY), None);

    f.api.history().await.unwrap();
    let req = f.transport.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), None);
}

#[tokio::test]
async fn test_other_failures_pass_through() {
    let f = fixture();
    f.tokens.persist("tok".to_string());
    f.transport.mock_response(
        HttpMethod::Put,
        &url("/profile"),
        422,
        json!({ "message": "Bio is too long" }),
    );
    f.transport.mock_response(
        HttpMethod::Get,
        &url("/analysis/history"),
        500,
        json!({ "message": "boom" }),
    );

    let err = f
        .api
        .update_profile(&ProfileData::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message(), "Bio is too long");

    let err = f.api.history().await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error {:?}", other),
    }

    // 非 401 错误不影响令牌
    assert_eq!(f.tokens.current().as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_network_and_decode_errors() {
    let f = fixture();
    f.transport.mock_failure(
        HttpMethod::Get,
        &url("/profile"),
        TransportError::Network("connection refused".to_string()),
    );
    f.transport.mock_response(
        HttpMethod::Get,
        &url("/auth/me"),
        200,
        json!({ "unexpected": true }),
    );

    let err = f.api.profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));

    let err = f.api.me().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_me_and_history_requires_both() {
    let f = fixture();
    f.transport
        .mock_response(HttpMethod::Get, &url("/auth/me"), 200, me_body());
    f.transport.mock_response(
        HttpMethod::Get,
        &url("/analysis/history"),
        200,
        json!({ "careerMatches": [{ "role": "Data Engineer", "matchPercentage": 71 }] }),
    );

    let (me, history) = f.api.me_and_history().await.unwrap();
    assert_eq!(me.user.user.first_name, "Ada");
    assert_eq!(history.career_matches[0].role, "Data Engineer");
    assert_eq!(f.transport.request_count(), 2);

    f.transport.mock_response(
        HttpMethod::Get,
        &url("/analysis/history"),
        503,
        json!({}),
    );
    let err = f.api.me_and_history().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}
