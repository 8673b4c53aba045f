//! 路由定义模块 - 领域模型
//!
//! 纯粹的状态转换表，不依赖于 DOM 或 web_sys。
//! 视图只存在于内存中，不映射到 URL。

use std::fmt::Display;

/// 应用视图枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// 首页 (默认视图)
    #[default]
    Home,
    /// 分析面板 (需要认证)
    Dashboard,
    Upload,
    /// AI 助手 (需要认证)
    Assistant,
    /// 个人资料 (需要认证)
    Profile,
    Features,
    About,
    Contact,
}

impl View {
    /// 导航栏中出现的视图，按显示顺序排列
    pub const NAVIGATION: [View; 7] = [
        View::Home,
        View::Dashboard,
        View::Upload,
        View::Assistant,
        View::Features,
        View::About,
        View::Contact,
    ];

    /// **核心守卫逻辑：定义该视图是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Profile | Self::Assistant)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Dashboard => "Dashboard",
            Self::Upload => "Upload",
            Self::Assistant => "AI Assistant",
            Self::Profile => "Profile",
            Self::Features => "Features",
            Self::About => "About",
            Self::Contact => "Contact",
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// 登录/注册浮层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Open(AuthMode),
}

/// 路由状态：当前视图与浮层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub view: View,
    pub overlay: Overlay,
}

impl ViewState {
    /// 请求切换视图
    ///
    /// 受保护视图在无会话时保持当前视图不变，并以登录模式打开浮层。
    pub fn request(self, target: View, has_session: bool) -> Self {
        if target.requires_auth() && !has_session {
            return Self {
                view: self.view,
                overlay: Overlay::Open(AuthMode::Login),
            };
        }
        Self {
            view: target,
            overlay: Overlay::Closed,
        }
    }

    pub fn prompt(self, mode: AuthMode) -> Self {
        Self {
            overlay: Overlay::Open(mode),
            ..self
        }
    }

    pub fn close_overlay(self) -> Self {
        Self {
            overlay: Overlay::Closed,
            ..self
        }
    }

    /// 首页的 "Get started" 按钮
    pub fn get_started(self, has_session: bool) -> Self {
        if has_session {
            self.request(View::Upload, true)
        } else {
            self.prompt(AuthMode::Register)
        }
    }

    /// 受保护视图收到 401 后返回首页并提示登录
    pub fn auth_required(self) -> Self {
        Self {
            view: View::Home,
            overlay: Overlay::Open(AuthMode::Login),
        }
    }

    /// 上传成功后进入分析面板
    pub fn upload_succeeded(self, has_session: bool) -> Self {
        self.request(View::Dashboard, has_session)
    }

    pub fn logout(self) -> Self {
        Self::default()
    }

    /// 会话消失后回到首页，已打开的登录提示保留
    pub fn session_ended(self) -> Self {
        Self {
            overlay: self.overlay,
            ..self.logout()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [View; 8] = [
        View::Home,
        View::Dashboard,
        View::Upload,
        View::Assistant,
        View::Profile,
        View::Features,
        View::About,
        View::Contact,
    ];

    fn at(view: View) -> ViewState {
        ViewState {
            view,
            overlay: Overlay::Closed,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = ViewState::default();
        assert_eq!(state.view, View::Home);
        assert_eq!(state.overlay, Overlay::Closed);
    }

    #[test]
    fn test_gated_views() {
        let gated: Vec<View> = ALL.into_iter().filter(View::requires_auth).collect();
        assert_eq!(gated, vec![View::Dashboard, View::Assistant, View::Profile]);
    }

    #[test]
    fn test_request_transition_table() {
        for from in ALL {
            for target in ALL {
                let signed_in = at(from).request(target, true);
                assert_eq!(signed_in, at(target), "{from} -> {target} with session");

                let anonymous = at(from).request(target, false);
                if target.requires_auth() {
                    assert_eq!(
                        anonymous,
                        ViewState {
                            view: from,
                            overlay: Overlay::Open(AuthMode::Login),
                        },
                        "{from} -> {target} without session"
                    );
                } else {
                    assert_eq!(anonymous, at(target), "{from} -> {target} without session");
                }
            }
        }
    }

    #[test]
    fn test_request_closes_open_overlay() {
        let state = at(View::About).prompt(AuthMode::Register);
        assert_eq!(state.request(View::Features, false), at(View::Features));
    }

    #[test]
    fn test_prompt_and_close_keep_view() {
        let state = at(View::Contact).prompt(AuthMode::Register);
        assert_eq!(state.view, View::Contact);
        assert_eq!(state.overlay, Overlay::Open(AuthMode::Register));
        assert_eq!(state.close_overlay(), at(View::Contact));
    }

    #[test]
    fn test_get_started() {
        assert_eq!(at(View::Home).get_started(true), at(View::Upload));
        assert_eq!(
            at(View::Home).get_started(false),
            ViewState {
                view: View::Home,
                overlay: Overlay::Open(AuthMode::Register),
            }
        );
    }

    #[test]
    fn test_auth_required_returns_home_with_login() {
        let state = at(View::Dashboard).auth_required();
        assert_eq!(state.view, View::Home);
        assert_eq!(state.overlay, Overlay::Open(AuthMode::Login));
    }

    #[test]
    fn test_upload_succeeded() {
        assert_eq!(at(View::Upload).upload_succeeded(true), at(View::Dashboard));
        assert_eq!(at(View::Upload).upload_succeeded(false).view, View::Upload);
    }

    #[test]
    fn test_session_ended_keeps_login_prompt() {
        let expired = at(View::Profile).auth_required().session_ended();
        assert_eq!(expired, at(View::Home).prompt(AuthMode::Login));

        assert_eq!(at(View::Dashboard).session_ended(), at(View::Home));
    }

    #[test]
    fn test_logout_resets_from_anywhere() {
        for view in ALL {
            let state = at(view).prompt(AuthMode::Login).logout();
            assert_eq!(state, ViewState::default());
        }
    }
}
