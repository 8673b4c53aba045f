//! 认证模块
//!
//! 把 [`SessionStore`] 桥接到响应式信号，与路由系统解耦。
//! 路由服务通过注入的会话信号来检查认证状态。

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use skillsync_shared::{User, UserPatch};

use crate::api::CareerApi;
use crate::config::AppConfig;
use crate::session::{Session, SessionError, SessionStore, TokenVault};
use crate::web::{CookieJar, FetchTransport, LocalStorage};

type BrowserSession = SessionStore<FetchTransport>;

/// 认证上下文
///
/// 会话存储本身与其快照信号，通过 Context 在组件间共享。
/// 每次会话变更后调用 `refresh` 同步快照。
#[derive(Clone, Copy)]
pub struct AuthContext {
    store: StoredValue<BrowserSession>,
    /// 会话快照（只读）
    pub state: ReadSignal<Session>,
    set_state: WriteSignal<Session>,
}

impl AuthContext {
    pub fn new(config: &AppConfig) -> Self {
        let vault = TokenVault::new(
            Arc::new(CookieJar::new(config.token_cookie_days)),
            Arc::new(LocalStorage),
        );
        let store = SessionStore::new(config, FetchTransport, vault);
        let (state, set_state) = signal(store.session());
        Self {
            store: StoredValue::new(store),
            state,
            set_state,
        }
    }

    fn store(&self) -> BrowserSession {
        self.store.get_value()
    }

    pub fn api(&self) -> CareerApi<FetchTransport> {
        self.store().api().clone()
    }

    fn refresh(&self) {
        self.set_state.set(self.store.with_value(|s| s.session()));
    }

    /// 获取会话是否存在的信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(Session::is_authenticated))
    }

    pub fn is_loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.loading))
    }

    pub fn user_signal(&self) -> Signal<Option<User>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.clone()))
    }

    pub async fn login(&self, email: String, password: String) -> Result<(), SessionError> {
        let result = self.store().login(&email, &password).await;
        self.refresh();
        result.map(|_| ())
    }

    pub async fn register(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
    ) -> Result<(), SessionError> {
        let result = self
            .store()
            .register(&first_name, &last_name, &email, &password)
            .await;
        self.refresh();
        result.map(|_| ())
    }

    /// 注销并清除状态
    ///
    /// 导航由路由服务的会话监听自动处理。
    pub fn logout(&self) {
        self.store.with_value(|s| s.logout());
        self.refresh();
    }

    pub fn update_user(&self, patch: UserPatch) {
        if !self.store.with_value(|s| s.update_user(patch)) {
            log::debug!("[Auth] No signed-in user to update");
        }
        self.refresh();
    }

    /// 受保护视图收到 401 时调用
    pub fn session_expired(&self) {
        log::warn!("[Auth] Session expired");
        self.logout();
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 校验持久化的令牌，完成后 `loading` 变为 `false`。
pub fn init_auth(ctx: AuthContext) {
    spawn_local(async move {
        if let Err(e) = ctx.store().initialize().await {
            log::warn!("[Auth] Session initialization skipped: {}", e);
        }
        ctx.refresh();
    });
}
