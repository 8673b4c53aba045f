//! AI 助手对话模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    CareerMatch, ExperienceField, FALLBACK_NAME, FALLBACK_ROLE, History, RoadmapStep, Skill,
    SkillGap,
};
use crate::serde_helper::null_default;
use crate::user::MeResponse;

pub const GREETING: &str = "Hi! I'm your AI Career Assistant.\n\nI can help you with:\n\
- Career guidance and path recommendations\n\
- Skill development strategies\n\
- Interview preparation\n\
- Resume optimization\n\
- Learning roadmaps\n\
- Industry insights\n\n\
I have access to your profile data and can provide personalized advice. \
What would you like to explore today?";

pub const TYPING_TEXT: &str = "AI is thinking...";

/// 随消息一起发送给 `/ai/chat` 的用户画像
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub name: String,
    pub current_role: String,
    pub skills: Vec<Skill>,
    pub experience: ExperienceField,
    pub target_roles: Vec<String>,
    pub skill_gaps: Vec<SkillGap>,
    pub career_matches: Vec<CareerMatch>,
    pub learning_roadmap: Vec<RoadmapStep>,
}

impl ChatContext {
    pub fn from_parts(me: MeResponse, history: History) -> Self {
        let details = me.user;
        let name = if details.user.first_name.trim().is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            details.user.first_name
        };
        let current_role = details
            .user
            .current_role
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_ROLE.to_string());

        Self {
            name,
            current_role,
            skills: details.skills,
            experience: details.experience,
            target_roles: details.target_roles,
            skill_gaps: history.skill_gaps,
            career_matches: history.career_matches,
            learning_roadmap: history.learning_roadmap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub is_typing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connected,
    Connecting,
    Error,
}

/// 对话记录
///
/// 同一时刻至多存在一条"正在输入"占位消息。
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// 新建对话，包含欢迎语
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        conversation.push(Sender::Ai, GREETING.to_string(), false);
        conversation
    }

    fn push(&mut self, sender: Sender, text: String, is_typing: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text,
            sender,
            timestamp: Utc::now(),
            is_typing,
        });
        id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_waiting(&self) -> bool {
        self.messages.iter().any(|m| m.is_typing)
    }

    /// 追加用户消息并显示输入占位
    ///
    /// 空消息或仍在等待回复时返回 `None`。
    pub fn ask(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || self.is_waiting() {
            return None;
        }
        self.push(Sender::User, text.to_string(), false);
        self.push(Sender::Ai, TYPING_TEXT.to_string(), true);
        Some(text.to_string())
    }

    /// 以 AI 回复（或错误提示）替换输入占位
    pub fn answer(&mut self, text: String) {
        self.messages.retain(|m| !m.is_typing);
        self.push(Sender::Ai, text, false);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// 快捷问题 (类别, 问题)
pub const QUICK_QUESTIONS: [(&str, &str); 8] = [
    (
        "Career Path",
        "What career paths are best suited for my background?",
    ),
    ("Learning Plan", "Create a personalized learning roadmap for me"),
    (
        "Resume Tips",
        "How can I improve my resume based on my target roles?",
    ),
    ("Industry Trends", "What are the trending skills in my industry?"),
    ("Interview Prep", "Help me prepare for interviews in my field"),
    ("Skill Gaps", "What skills should I focus on developing next?"),
    (
        "Salary Insights",
        "What salary range can I expect in my target roles?",
    ),
    ("Strengths", "What are my key strengths based on my profile?"),
];

/// `POST /ai/chat` 请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub user_profile: Option<ChatContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "null_default")]
    pub response: String,
}
