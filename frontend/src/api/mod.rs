//! SkillSync API 客户端
//!
//! 普通请求与 AI 对话请求使用两个独立配置的客户端，共享同一个传输层与令牌。

mod client;
mod error;
mod transport;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use skillsync_shared::protocol::{
    CurrentUserRequest, GetProfileRequest, HistoryRequest, LinkedInRequest, LoginRequest,
    RESUME_FIELD, RegisterRequest, UPLOAD_RESUME_PATH,
};
use skillsync_shared::{
    AuthResponse, ChatContext, History, MeResponse, ProfileData, UploadResponse,
    chat::ChatRequest,
};

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{FilePart, HttpBody, HttpRequest, HttpResponse, Transport, TransportError};

#[cfg(test)]
pub use transport::MockTransport;

use crate::config::AppConfig;
use crate::session::TokenStore;

pub struct CareerApi<T> {
    general: ApiClient<T>,
    ai: ApiClient<T>,
}

impl<T> Clone for CareerApi<T> {
    fn clone(&self) -> Self {
        Self {
            general: self.general.clone(),
            ai: self.ai.clone(),
        }
    }
}

impl<T: Transport> CareerApi<T> {
    pub fn new(config: &AppConfig, transport: T, tokens: TokenStore) -> Self {
        let transport = Arc::new(transport);
        Self {
            general: ApiClient::new(config.general(), Arc::clone(&transport), tokens.clone()),
            ai: ApiClient::new(config.ai(), transport, tokens),
        }
    }

    pub fn general(&self) -> &ApiClient<T> {
        &self.general
    }

    pub fn ai(&self) -> &ApiClient<T> {
        &self.ai
    }

    // --- 认证 ---

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.general.call(&request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.general.call(request).await
    }

    pub async fn me(&self) -> Result<MeResponse, ApiError> {
        self.general.call(&CurrentUserRequest).await
    }

    // --- 分析 ---

    pub async fn upload_resume(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let part = FilePart {
            field: RESUME_FIELD.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        };
        self.general.upload(UPLOAD_RESUME_PATH, vec![part]).await
    }

    pub async fn analyze_linkedin(&self, url: &str) -> Result<UploadResponse, ApiError> {
        let request = LinkedInRequest {
            url: url.trim().to_string(),
        };
        self.general.call(&request).await
    }

    pub async fn history(&self) -> Result<History, ApiError> {
        self.general.call(&HistoryRequest).await
    }

    // --- 个人资料 ---

    pub async fn profile(&self) -> Result<Option<ProfileData>, ApiError> {
        Ok(self.general.call(&GetProfileRequest).await?.profile)
    }

    pub async fn update_profile(
        &self,
        profile: &ProfileData,
    ) -> Result<Option<ProfileData>, ApiError> {
        Ok(self.general.call(profile).await?.profile)
    }

    // --- AI 助手 ---

    pub async fn chat(
        &self,
        message: &str,
        context: Option<ChatContext>,
    ) -> Result<String, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
            user_profile: context,
        };
        Ok(self.ai.call(&request).await?.response)
    }

    /// 并发获取账户详情与分析历史，两者都成功才返回
    pub async fn me_and_history(&self) -> Result<(MeResponse, History), ApiError> {
        futures::try_join!(self.me(), self.history())
    }
}
