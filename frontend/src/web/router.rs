//! 路由服务模块 - 核心引擎
//!
//! 将 [`ViewState`] 的转换表包装为 Signal，所有视图切换都经过这里。
//! 实现了"请求 -> 验证 -> 处理 -> 渲染"的导航流程。

use leptos::prelude::*;

use super::route::{AuthMode, Overlay, View, ViewState};

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    state: ReadSignal<ViewState>,
    set_state: WriteSignal<ViewState>,
    /// 会话是否存在（注入的信号，实现解耦）
    has_session: Signal<bool>,
}

impl RouterService {
    fn new(has_session: Signal<bool>) -> Self {
        let (state, set_state) = signal(ViewState::default());
        Self {
            state,
            set_state,
            has_session,
        }
    }

    pub fn current_view(&self) -> Signal<View> {
        let state = self.state;
        Signal::derive(move || state.get().view)
    }

    pub fn overlay(&self) -> Signal<Overlay> {
        let state = self.state;
        Signal::derive(move || state.get().overlay)
    }

    fn apply(&self, step: impl FnOnce(ViewState) -> ViewState) {
        let before = self.state.get_untracked();
        let after = step(before);
        if before.view != after.view {
            log::debug!("[Router] {} -> {}", before.view, after.view);
        }
        self.set_state.set(after);
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, view: View) {
        let has_session = self.has_session.get_untracked();
        if view.requires_auth() && !has_session {
            log::info!("[Router] Access to {} denied, asking for sign in", view);
        }
        self.apply(|s| s.request(view, has_session));
    }

    pub fn prompt(&self, mode: AuthMode) {
        self.apply(|s| s.prompt(mode));
    }

    pub fn close_overlay(&self) {
        self.apply(ViewState::close_overlay);
    }

    pub fn get_started(&self) {
        let has_session = self.has_session.get_untracked();
        self.apply(|s| s.get_started(has_session));
    }

    pub fn auth_required(&self) {
        self.apply(ViewState::auth_required);
    }

    pub fn upload_succeeded(&self) {
        let has_session = self.has_session.get_untracked();
        self.apply(|s| s.upload_succeeded(has_session));
    }

    /// 设置会话变化时的自动处理
    ///
    /// 会话消失时回到首页；会话出现时关闭浮层。
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |previous: Option<bool>| {
            let has_session = router.has_session.get();
            match (previous, has_session) {
                (Some(true), false) => {
                    log::info!("[Router] Session ended, returning home");
                    router.apply(ViewState::session_ended);
                }
                (Some(false), true) => router.close_overlay(),
                _ => {}
            }
            has_session
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(has_session: Signal<bool>) -> RouterService {
    let router = RouterService::new(has_session);
    router.setup_auth_redirect();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话状态信号
    has_session: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(has_session);

    children()
}

/// 路由出口组件
///
/// 根据当前视图渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前视图，返回对应组件
    matcher: fn(View) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let view = router.current_view();

    move || matcher(view.get())
}
