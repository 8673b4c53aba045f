//! SkillSync 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `api`: 与传输层无关的请求管线
//! - `session`: 会话与令牌（不依赖 DOM，可原生测试）
//! - `web::route`: 视图定义与转换表（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态到信号的桥接
//! - `components`: UI 组件层

pub mod api;
mod auth;
pub mod config;
pub mod session;
mod components {
    pub mod assistant;
    pub mod auth_modal;
    pub mod dashboard;
    pub mod header;
    pub mod pages;
    pub mod profile;
    pub mod upload;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::assistant::AssistantPage;
use crate::components::auth_modal::AuthModal;
use crate::components::dashboard::DashboardPage;
use crate::components::header::Header;
use crate::components::pages::{AboutPage, ContactPage, FeaturesPage, Footer, HomePage};
use crate::components::profile::ProfilePage;
use crate::components::upload::UploadPage;
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod cookie;
    mod http;
    pub mod logger;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use cookie::CookieJar;
    pub use http::{FetchTransport, read_file};
    pub use storage::LocalStorage;
}

pub use web::logger::init as init_logger;

use web::route::View;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 View 枚举返回对应的视图组件。
fn route_matcher(view: View) -> AnyView {
    match view {
        View::Home => view! { <HomePage /> }.into_any(),
        View::Dashboard => view! { <DashboardPage /> }.into_any(),
        View::Upload => view! { <UploadPage /> }.into_any(),
        View::Assistant => view! { <AssistantPage /> }.into_any(),
        View::Profile => view! { <ProfilePage /> }.into_any(),
        View::Features => view! { <FeaturesPage /> }.into_any(),
        View::About => view! { <AboutPage /> }.into_any(),
        View::Contact => view! { <ContactPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let config = AppConfig::from_build_env();
    log::info!("[App] API base URL: {}", config.api_url);
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);

    // 2. 校验持久化的令牌
    init_auth(auth_ctx);

    // 3. 获取会话信号，用于注入路由服务（解耦！）
    let has_session = auth_ctx.is_authenticated_signal();
    let is_loading = auth_ctx.is_loading_signal();

    view! {
        <Router has_session=has_session>
            <Show
                when=move || !is_loading.get()
                fallback=|| view! {
                    <div class="flex items-center justify-center min-h-screen">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <div class="min-h-screen flex flex-col bg-base-200">
                    <Header />
                    <main class="flex-1">
                        <RouterOutlet matcher=route_matcher />
                    </main>
                    <Footer />
                </div>
                <AuthModal />
            </Show>
        </Router>
    }
}
