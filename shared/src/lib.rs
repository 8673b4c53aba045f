//! SkillSync 共享领域模型
//!
//! 前端与 API 约定的数据结构，不依赖任何 Web API，可在原生目标上直接测试。

use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod chat;
pub mod profile;
pub mod protocol;
pub mod serde_helper;
pub mod user;

pub use analysis::{
    CandidateProfile, CareerMatch, DashboardProfile, Experience, ExperienceField, History,
    RoadmapStep, Skill, SkillGap, UploadResponse,
};
pub use chat::{ChatContext, ChatMessage, ConnectionStatus, Conversation, Sender};
pub use profile::{Education, ProfileData, ProfileEnvelope, ProfileExperience, ProfileSkill};
pub use user::{AccountDetails, AuthResponse, MeResponse, User, UserPatch};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// Cookie 与 LocalStorage 共用的令牌键名
pub const TOKEN_STORAGE_KEY: &str = "token";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 生成 `Authorization` 头的值
pub fn bearer(token: &str) -> String {
    format!("{}{}", BEARER_PREFIX, token)
}

// =========================================================
// 错误响应 (Error Envelope)
// =========================================================

/// 服务端错误响应体，只关心 `message` 字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// 从原始响应体中提取非空的 `message`
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}
