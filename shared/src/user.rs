//! 用户与认证相关的数据结构

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::{CareerMatch, ExperienceField, Skill};
use crate::serde_helper::null_default;

/// 当前登录用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "UserRecord")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    pub profile_completeness: f64,
}

/// 服务端返回的用户记录，`_id` 与 `id` 可能同时出现
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(rename = "_id", default, deserialize_with = "null_default")]
    mongo_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    first_name: String,
    #[serde(default, deserialize_with = "null_default")]
    last_name: String,
    #[serde(default, deserialize_with = "null_default")]
    email: String,
    #[serde(default, deserialize_with = "null_default")]
    current_role: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    profile_completeness: f64,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.or(record.mongo_id).unwrap_or_default(),
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            current_role: record.current_role,
            profile_completeness: record.profile_completeness,
        }
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// 合并部分更新，`None` 字段保持原值
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(current_role) = patch.current_role {
            self.current_role = Some(current_role);
        }
        if let Some(completeness) = patch.profile_completeness {
            self.profile_completeness = completeness;
        }
    }
}

/// `User` 的部分字段更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub current_role: Option<String>,
    pub profile_completeness: Option<f64>,
}

/// `/auth/login` 与 `/auth/register` 的成功响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// `/auth/me` 返回的账户详情
///
/// 在 `User` 之外还可能携带分析结果，缺失字段均回退为空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, deserialize_with = "null_default")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "null_default")]
    pub experience: ExperienceField,
    #[serde(default, deserialize_with = "null_default")]
    pub career_matches: Vec<CareerMatch>,
    #[serde(default, deserialize_with = "null_default")]
    pub target_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: AccountDetails,
}

// =========================================================
// 表单校验 (Form Validation)
// =========================================================

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email pattern")
});

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

/// 表单字段错误 (字段名, 提示)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// 登录表单
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        errors
    }
}

/// 注册表单
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            errors.push(FieldError::new("firstName", "First name is required"));
        } else if first_name.chars().count() < MIN_NAME_LEN {
            errors.push(FieldError::new(
                "firstName",
                "First name must be at least 2 characters",
            ));
        }

        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            errors.push(FieldError::new("lastName", "Last name is required"));
        } else if last_name.chars().count() < MIN_NAME_LEN {
            errors.push(FieldError::new(
                "lastName",
                "Last name must be at least 2 characters",
            ));
        }

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }

        if self.confirm_password != self.password {
            errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
        }

        errors
    }
}
