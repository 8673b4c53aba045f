//! 可编辑的个人资料

use serde::{Deserialize, Serialize};

use crate::serde_helper::null_default;
use crate::user::UserPatch;

pub const NEW_SKILL_LEVEL: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSkill {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub level: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
}

impl Default for ProfileSkill {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            level: NEW_SKILL_LEVEL,
            category: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileExperience {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_default")]
    pub position: String,
    #[serde(default, deserialize_with = "null_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_default")]
    pub field: String,
    #[serde(default, deserialize_with = "null_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_default")]
    pub end_date: String,
    #[serde(default, deserialize_with = "null_default")]
    pub current: bool,
}

/// `GET /profile` / `PUT /profile` 的资料主体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    #[serde(default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_default")]
    pub current_role: String,
    #[serde(default, deserialize_with = "null_default")]
    pub years_of_experience: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_default")]
    pub linkedin_url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub github_url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub portfolio_url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub skills: Vec<ProfileSkill>,
    #[serde(default, deserialize_with = "null_default")]
    pub experience: Vec<ProfileExperience>,
    #[serde(default, deserialize_with = "null_default")]
    pub education: Vec<Education>,
}

impl ProfileData {
    pub fn add_skill(&mut self) {
        self.skills.push(ProfileSkill::default());
    }

    pub fn remove_skill(&mut self, index: usize) {
        if index < self.skills.len() {
            self.skills.remove(index);
        }
    }

    pub fn add_experience(&mut self) {
        self.experience.push(ProfileExperience::default());
    }

    pub fn remove_experience(&mut self, index: usize) {
        if index < self.experience.len() {
            self.experience.remove(index);
        }
    }

    /// 保存后同步到会话用户的字段
    pub fn user_patch(&self) -> UserPatch {
        UserPatch {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            current_role: Some(self.current_role.clone()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    #[serde(default, deserialize_with = "null_default")]
    pub profile: Option<ProfileData>,
}
