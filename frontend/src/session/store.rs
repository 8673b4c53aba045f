use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use skillsync_shared::protocol::RegisterRequest;
use skillsync_shared::{User, UserPatch};
use thiserror::Error;

use super::token::{TokenStore, TokenVault};
use crate::api::{ApiError, CareerApi, Transport};
use crate::config::AppConfig;

pub const LOGIN_FALLBACK: &str = "Login failed";
pub const REGISTER_FALLBACK: &str = "Registration failed";

/// 会话快照
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    /// 启动时的令牌校验尚未完成
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            loading: true,
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 服务端拒绝，携带服务端消息或通用提示
    #[error("{0}")]
    Rejected(String),
    /// 已有登录/注册/初始化请求在进行中
    #[error("another sign-in request is already in progress")]
    Busy,
}

impl SessionError {
    fn rejected(err: &ApiError, fallback: &str) -> Self {
        SessionError::Rejected(err.server_message().unwrap_or_else(|| fallback.to_string()))
    }
}

#[derive(Debug, Clone)]
struct SessionState {
    user: Option<User>,
    loading: bool,
}

/// 单飞保护：同一时刻只允许一个会话变更请求
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SessionError> {
        if flag.swap(true, Ordering::AcqRel) {
            return Err(SessionError::Busy);
        }
        Ok(Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 会话存储
///
/// 当前用户与令牌的唯一来源。令牌与请求管线共享，401 时由管线清除；
/// 读取快照时若令牌已不存在，用户记录随之丢弃。
pub struct SessionStore<T> {
    api: CareerApi<T>,
    tokens: TokenStore,
    state: Arc<ArcSwap<SessionState>>,
    in_flight: Arc<AtomicBool>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            tokens: self.tokens.clone(),
            state: Arc::clone(&self.state),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<T: Transport> SessionStore<T> {
    pub fn new(config: &AppConfig, transport: T, vault: TokenVault) -> Self {
        let tokens = TokenStore::new(vault);
        Self {
            api: CareerApi::new(config, transport, tokens.clone()),
            tokens,
            state: Arc::new(ArcSwap::from_pointee(SessionState {
                user: None,
                loading: true,
            })),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn api(&self) -> &CareerApi<T> {
        &self.api
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn session(&self) -> Session {
        let state = self.state.load_full();
        let token = self.tokens.in_memory();
        let user = match (&token, &state.user) {
            (Some(_), user) => user.clone(),
            (None, Some(_)) => {
                log::info!("[Session] Token was cleared, dropping stale user");
                self.state.store(Arc::new(SessionState {
                    user: None,
                    loading: state.loading,
                }));
                None
            }
            (None, None) => None,
        };
        Session {
            token,
            user,
            loading: state.loading,
        }
    }

    fn set_user(&self, user: Option<User>, loading: bool) {
        self.state.store(Arc::new(SessionState { user, loading }));
    }

    /// 启动时恢复会话
    ///
    /// 无论走哪个分支，`loading` 都在这里且只在这里被置为 `false`。
    pub async fn initialize(&self) -> Result<(), SessionError> {
        let _guard = FlightGuard::acquire(&self.in_flight)?;
        if !self.state.load().loading {
            return Ok(());
        }

        let Some(token) = self.tokens.persisted() else {
            log::info!("[Session] No persisted token");
            self.set_user(None, false);
            return Ok(());
        };

        self.tokens.adopt(token);
        match self.api.me().await {
            Ok(me) => {
                log::info!("[Session] Restored session for {}", me.user.user.email);
                self.set_user(Some(me.user.user), false);
            }
            Err(e) => {
                log::warn!("[Session] Token validation failed: {}", e);
                self.tokens.clear();
                self.set_user(None, false);
            }
        }
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let _guard = FlightGuard::acquire(&self.in_flight)?;
        match self.api.login(email, password).await {
            Ok(auth) => Ok(self.establish(auth.token, auth.user)),
            Err(e) => {
                log::warn!("[Session] Login failed: {}", e);
                Err(SessionError::rejected(&e, LOGIN_FALLBACK))
            }
        }
    }

    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        let _guard = FlightGuard::acquire(&self.in_flight)?;
        let request = RegisterRequest {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.register(&request).await {
            Ok(auth) => Ok(self.establish(auth.token, auth.user)),
            Err(e) => {
                log::warn!("[Session] Registration failed: {}", e);
                Err(SessionError::rejected(&e, REGISTER_FALLBACK))
            }
        }
    }

    fn establish(&self, token: String, user: User) -> User {
        log::info!("[Session] Signed in as {}", user.email);
        self.tokens.persist(token);
        let loading = self.state.load().loading;
        self.set_user(Some(user.clone()), loading);
        user
    }

    /// 清除内存与持久化状态，可重复调用
    pub fn logout(&self) {
        self.tokens.clear();
        let loading = self.state.load().loading;
        self.set_user(None, loading);
        log::info!("[Session] Signed out");
    }

    /// 合并部分字段到当前用户，不写入持久化存储
    ///
    /// 没有用户时不做任何事，返回 `false`。
    pub fn update_user(&self, patch: UserPatch) -> bool {
        let state = self.state.load_full();
        let Some(mut user) = state.user.clone() else {
            return false;
        };
        user.apply(patch);
        self.set_user(Some(user), state.loading);
        true
    }
}
