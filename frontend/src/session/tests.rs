use std::rc::Rc;
use std::sync::Arc;

use serde_json::json;
use skillsync_shared::protocol::HttpMethod;
use skillsync_shared::{HEADER_AUTHORIZATION, TOKEN_STORAGE_KEY, UserPatch};

use super::*;
use crate::api::MockTransport;
use crate::config::AppConfig;

const BASE: &str = "http://localhost:5050/api";

// =========================================================
// 辅助函数
// =========================================================

struct Fixture {
    store: SessionStore<Rc<MockTransport>>,
    transport: Rc<MockTransport>,
    cookie: Arc<MemoryStore>,
    local: Arc<MemoryStore>,
}

fn fixture_with(transport: MockTransport) -> Fixture {
    let transport = Rc::new(transport);
    let cookie = MemoryStore::new();
    let local = MemoryStore::new();
    let vault = TokenVault::new(cookie.clone(), local.clone());
    let store = SessionStore::new(&AppConfig::default(), Rc::clone(&transport), vault);
    Fixture {
        store,
        transport,
        cookie,
        local,
    }
}

fn fixture() -> Fixture {
    fixture_with(MockTransport::new())
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn user_json(email: &str) -> serde_json::Value {
    json!({
        "id": "u1",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "profileCompleteness": 35
    })
}

fn mock_login(transport: &MockTransport, email: &str) {
    transport.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({ "token": "tok-login", "user": user_json(email) }),
    );
}

impl Fixture {
    fn durable_tokens(&self) -> (Option<String>, Option<String>) {
        (
            self.cookie.get(TOKEN_STORAGE_KEY),
            self.local.get(TOKEN_STORAGE_KEY),
        )
    }
}

// =========================================================
// initialize 测试
// =========================================================

#[tokio::test]
async fn test_initialize_without_token_finishes_loading() {
    let f = fixture();
    assert!(f.store.session().loading);

    f.store.initialize().await.unwrap();

    let session = f.store.session();
    assert!(!session.loading);
    assert_eq!(session.user, None);
    assert_eq!(session.token, None);
    assert_eq!(f.transport.request_count(), 0);
}

#[tokio::test]
async fn test_initialize_restores_valid_token() {
    let f = fixture();
    f.cookie.write(TOKEN_STORAGE_KEY, "saved");
    f.local.write(TOKEN_STORAGE_KEY, "saved");
    f.transport.mock_response(
        HttpMethod::Get,
        &url("/auth/me"),
        200,
        json!({ "user": user_json("ada@example.com") }),
    );

    f.store.initialize().await.unwrap();

    let session = f.store.session();
    assert!(!session.loading);
    assert!(session.is_authenticated());
    assert_eq!(session.token.as_deref(), Some("saved"));
    assert_eq!(session.user.unwrap().email, "ada@example.com");

    let req = f.transport.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer saved"));
}

#[tokio::test]
async fn test_initialize_keeps_token_when_account_has_null_fields() {
    let f = fixture();
    f.cookie.write(TOKEN_STORAGE_KEY, "good");
    f.local.write(TOKEN_STORAGE_KEY, "good");
    f.transport.mock_response(
        HttpMethod::Get,
        &url("/auth/me"),
        200,
        json!({
            "user": {
                "_id": "u1",
                "id": "u1",
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": null,
                "skills": null,
                "experience": null
            }
        }),
    );

    f.store.initialize().await.unwrap();

    let session = f.store.session();
    assert!(session.is_authenticated());
    assert_eq!(session.user.unwrap().last_name, "");
    assert_eq!(
        f.durable_tokens(),
        (Some("good".to_string()), Some("good".to_string()))
    );
}

#[tokio::test]
async fn test_login_accepts_user_with_both_ids() {
    let f = fixture();
    f.transport.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({
            "token": "tok-login",
            "user": { "_id": "u1", "id": "u1", "email": "ada@example.com", "currentRole": null }
        }),
    );

    f.store.login("ada@example.com", "secret1").await.unwrap();

    let session = f.store.session();
    assert_eq!(session.token.as_deref(), Some("tok-login"));
    assert_eq!(session.user.unwrap().id, "u1");
}

#[tokio::test]
async fn test_initialize_with_rejected_token_clears_both_stores() {
    let f = fixture();
    f.local.write(TOKEN_STORAGE_KEY, "stale");
    f.cookie.write(TOKEN_STORAGE_KEY, "stale");
    f.transport
        .mock_response(HttpMethod::Get, &url("/auth/me"), 500, json!({}));

    f.store.initialize().await.unwrap();

    let session = f.store.session();
    assert!(!session.loading);
    assert_eq!(session.token, None);
    assert_eq!(session.user, None);
    assert_eq!(f.durable_tokens(), (None, None));
}

#[tokio::test]
async fn test_initialize_finishes_loading_only_once() {
    let f = fixture();
    f.store.initialize().await.unwrap();
    mock_login(&f.transport, "ada@example.com");
    f.store.login("ada@example.com", "pw").await.unwrap();

    // 第二次初始化不会重新校验或改变状态
    let before = f.transport.request_count();
    f.store.initialize().await.unwrap();
    assert_eq!(f.transport.request_count(), before);
    assert!(f.store.session().is_authenticated());
}

// =========================================================
// login / register 测试
// =========================================================

#[tokio::test]
async fn test_login_logout_round_trip() {
    let f = fixture();
    f.store.initialize().await.unwrap();
    mock_login(&f.transport, "ada@example.com");

    let user = f.store.login("ada@example.com", "secret1").await.unwrap();
    assert_eq!(user.email, "ada@example.com");

    let session = f.store.session();
    assert_eq!(session.user.unwrap().email, "ada@example.com");
    assert_eq!(session.token.as_deref(), Some("tok-login"));
    assert_eq!(
        f.durable_tokens(),
        (Some("tok-login".to_string()), Some("tok-login".to_string()))
    );

    f.store.logout();
    let session = f.store.session();
    assert_eq!(session.user, None);
    assert_eq!(session.token, None);
    assert_eq!(f.durable_tokens(), (None, None));

    // 模拟刷新：新的存储实例，没有持久化令牌
    let reloaded = SessionStore::new(
        &AppConfig::default(),
        Rc::clone(&f.transport),
        TokenVault::new(f.cookie.clone(), f.local.clone()),
    );
    reloaded.initialize().await.unwrap();
    let session = reloaded.session();
    assert!(!session.loading);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_login_failure_carries_server_message() {
    let f = fixture();
    f.transport.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        400,
        json!({ "message": "Invalid email or password" }),
    );

    let err = f.store.login("ada@example.com", "nope").await.unwrap_err();

    assert_eq!(
        err,
        SessionError::Rejected("Invalid email or password".to_string())
    );
    assert_eq!(f.store.session().user, None);
    assert_eq!(f.durable_tokens(), (None, None));
}

#[tokio::test]
async fn test_login_failure_without_message_uses_fallback() {
    let f = fixture();
    f.transport.mock_failure(
        HttpMethod::Post,
        &url("/auth/login"),
        crate::api::TransportError::Network("offline".to_string()),
    );

    let err = f.store.login("ada@example.com", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), LOGIN_FALLBACK);
}

#[tokio::test]
async fn test_register_sets_session_and_sends_camel_case() {
    let f = fixture();
    f.transport.mock_response(
        HttpMethod::Post,
        &url("/auth/register"),
        201,
        json!({ "token": "tok-new", "user": user_json("new@example.com") }),
    );

    let user = f
        .store
        .register(" Ada ", "Lovelace", "new@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(user.email, "new@example.com");
    assert_eq!(
        f.durable_tokens(),
        (Some("tok-new".to_string()), Some("tok-new".to_string()))
    );

    let req = f.transport.last_request().unwrap();
    match req.body {
        crate::api::HttpBody::Json(body) => {
            let body: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(body["firstName"], "Ada");
            assert_eq!(body["lastName"], "Lovelace");
        }
        other => panic!("expected json body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_failure_uses_fallback() {
    let f = fixture();
    f.transport
        .mock_response(HttpMethod::Post, &url("/auth/register"), 500, json!({}));

    let err = f
        .store
        .register("Ada", "Lovelace", "ada@example.com", "secret1")
        .await
        .unwrap_err();
    assert_eq!(err, SessionError::Rejected(REGISTER_FALLBACK.to_string()));
}

#[tokio::test]
async fn test_concurrent_sign_in_is_rejected() {
    let mut transport = MockTransport::new();
    transport.yield_first = true;
    let f = fixture_with(transport);
    mock_login(&f.transport, "ada@example.com");

    let (first, second) = futures::join!(
        f.store.login("ada@example.com", "pw"),
        f.store.login("ada@example.com", "pw")
    );

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), SessionError::Busy);
    assert_eq!(f.transport.request_count(), 1);

    // 守卫在完成后释放
    assert!(f.store.login("ada@example.com", "pw").await.is_ok());
}

// =========================================================
// logout / update_user / 401 测试
// =========================================================

#[tokio::test]
async fn test_logout_is_idempotent() {
    let f = fixture();
    f.store.logout();
    f.store.logout();
    assert_eq!(f.store.session().user, None);
    assert_eq!(f.durable_tokens(), (None, None));
}

#[tokio::test]
async fn test_update_user_merges_only_when_signed_in() {
    let f = fixture();
    let patch = UserPatch {
        current_role: Some("Staff Engineer".to_string()),
        ..Default::default()
    };
    assert!(!f.store.update_user(patch.clone()));
    assert_eq!(f.store.session().user, None);

    mock_login(&f.transport, "ada@example.com");
    f.store.login("ada@example.com", "pw").await.unwrap();
    let requests = f.transport.request_count();

    assert!(f.store.update_user(patch));
    let user = f.store.session().user.unwrap();
    assert_eq!(user.current_role.as_deref(), Some("Staff Engineer"));
    assert_eq!(user.first_name, "Ada");

    // 不触发请求，也不改动持久化令牌
    assert_eq!(f.transport.request_count(), requests);
    assert_eq!(
        f.durable_tokens(),
        (Some("tok-login".to_string()), Some("tok-login".to_string()))
    );
}

#[tokio::test]
async fn test_unauthorized_response_drops_stale_user() {
    let f = fixture();
    f.store.initialize().await.unwrap();
    mock_login(&f.transport, "ada@example.com");
    f.store.login("ada@example.com", "pw").await.unwrap();
    f.transport
        .mock_response(HttpMethod::Get, &url("/analysis/history"), 401, json!({}));
    f.transport
        .mock_response(HttpMethod::Get, &url("/profile"), 200, json!({}));

    let err = f.store.api().history().await.unwrap_err();
    assert!(err.is_unauthorized());

    let session = f.store.session();
    assert_eq!(session.token, None);
    assert_eq!(session.user, None);
    assert!(!session.is_authenticated());
    assert_eq!(f.durable_tokens(), (None, None));

    f.store.api().profile().await.unwrap();
    let req = f.transport.last_request().unwrap();
    assert_eq!(req.header(HEADER_AUTHORIZATION), None);
}
