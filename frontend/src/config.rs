//! 客户端配置
//!
//! 默认值写死在常量中，API 地址可在构建时通过 `SKILLSYNC_API_URL` 覆盖。

use std::time::Duration;

// =========================================================
// 默认配置 (Defaults)
// =========================================================

const DEFAULT_API_URL: &str = "http://localhost:5050/api";
const BUILD_API_URL: Option<&str> = option_env!("SKILLSYNC_API_URL");

const GENERAL_TIMEOUT: Duration = Duration::from_secs(30);
const AI_TIMEOUT: Duration = Duration::from_secs(60);

/// Cookie 中令牌的有效期（天）
pub const TOKEN_COOKIE_DAYS: u32 = 7;

pub const GENERAL_TIMEOUT_MESSAGE: &str = "Request timed out. The server is taking longer than \
expected to respond. Please try again with a smaller file.";
pub const AI_TIMEOUT_MESSAGE: &str = "AI processing is taking longer than expected. Please try \
again with a shorter question.";

/// 单个 HTTP 客户端的配置
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// 日志前缀，用于区分普通请求与 AI 请求
    pub label: &'static str,
    pub base_url: String,
    pub timeout: Duration,
    pub with_credentials: bool,
    /// 超时后展示给用户的提示
    pub timeout_message: &'static str,
}

impl ClientConfig {
    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub token_cookie_days: u32,
}

impl AppConfig {
    /// 读取构建时环境变量，未设置或为空时使用默认地址
    pub fn from_build_env() -> Self {
        let api_url = BUILD_API_URL
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self::with_api_url(api_url)
    }

    pub fn with_api_url(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token_cookie_days: TOKEN_COOKIE_DAYS,
        }
    }

    /// 普通请求：30 秒超时
    pub fn general(&self) -> ClientConfig {
        ClientConfig {
            label: "api",
            base_url: self.api_url.clone(),
            timeout: GENERAL_TIMEOUT,
            with_credentials: true,
            timeout_message: GENERAL_TIMEOUT_MESSAGE,
        }
    }

    /// AI 对话请求：60 秒超时
    pub fn ai(&self) -> ClientConfig {
        ClientConfig {
            label: "ai",
            base_url: self.api_url.clone(),
            timeout: AI_TIMEOUT,
            with_credentials: true,
            timeout_message: AI_TIMEOUT_MESSAGE,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_api_url(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_api() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, "http://localhost:5050/api");
        assert_eq!(config.token_cookie_days, 7);
    }

    #[test]
    fn test_ai_client_has_longer_timeout() {
        let config = AppConfig::with_api_url("https://api.skillsync.dev/api/");
        let general = config.general();
        let ai = config.ai();
        assert_eq!(general.timeout, Duration::from_secs(30));
        assert_eq!(ai.timeout, Duration::from_secs(60));
        assert!(general.with_credentials && ai.with_credentials);
        assert_ne!(general.timeout_message, ai.timeout_message);
    }

    #[test]
    fn test_url_join() {
        let general = AppConfig::with_api_url("https://api.skillsync.dev/api/").general();
        assert_eq!(
            general.url("/auth/me"),
            "https://api.skillsync.dev/api/auth/me"
        );
        assert_eq!(general.url("profile"), "https://api.skillsync.dev/api/profile");
    }
}
