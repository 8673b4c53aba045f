//! 简历分析与职业规划数据

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::serde_helper::null_default;

use crate::user::{MeResponse, User};

pub const FALLBACK_NAME: &str = "User";
pub const FALLBACK_ROLE: &str = "Professional";
pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub level: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "null_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_default")]
    pub position: String,
    #[serde(default, deserialize_with = "null_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
}

/// 工作经历：可能是条目列表，也可能是一段文字摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceField {
    Entries(Vec<Experience>),
    Summary(String),
}

impl Default for ExperienceField {
    fn default() -> Self {
        ExperienceField::Entries(Vec::new())
    }
}

impl ExperienceField {
    pub fn is_empty(&self) -> bool {
        match self {
            ExperienceField::Entries(entries) => entries.is_empty(),
            ExperienceField::Summary(text) => text.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    #[serde(default, deserialize_with = "null_default")]
    pub skill: String,
    #[serde(default, deserialize_with = "null_default")]
    pub importance: String,
    #[serde(default, deserialize_with = "null_default")]
    pub time_to_learn: String,
    #[serde(default, deserialize_with = "null_default")]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub phase: String,
    #[serde(default, deserialize_with = "null_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub resources: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub timeframe: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerMatch {
    #[serde(default, deserialize_with = "null_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_default")]
    pub match_percentage: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub missing_skills: Vec<String>,
}

/// `/analysis/history` 响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    #[serde(default, deserialize_with = "null_default")]
    pub skill_gaps: Vec<SkillGap>,
    #[serde(default, deserialize_with = "null_default")]
    pub learning_roadmap: Vec<RoadmapStep>,
    #[serde(default, deserialize_with = "null_default")]
    pub career_matches: Vec<CareerMatch>,
}

/// 简历/LinkedIn 分析得到的候选人画像
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "null_default")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub current_role: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "null_default")]
    pub experience: ExperienceField,
}

/// `/analysis/upload-resume` 与 `/analysis/linkedin` 的响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub profile: Option<CandidateProfile>,
}

// =========================================================
// 仪表盘视图模型 (Dashboard)
// =========================================================

/// 仪表盘展示的合并数据
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardProfile {
    pub name: String,
    pub current_role: String,
    pub experience: ExperienceField,
    pub skills: Vec<Skill>,
    pub target_roles: Vec<String>,
    pub skill_gaps: Vec<SkillGap>,
    pub roadmap: Vec<RoadmapStep>,
    pub career_matches: Vec<CareerMatch>,
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

impl DashboardProfile {
    /// 合并 `/auth/me` 与 `/analysis/history`
    ///
    /// 名字依次回退到会话用户的名字和 `User`，职位回退到 `Professional`，
    /// 目标职位取自历史记录中的职业匹配。
    pub fn combine(me: MeResponse, history: History, session_user: Option<&User>) -> Self {
        let details = me.user;
        let name = non_empty(&details.user.first_name)
            .or_else(|| session_user.and_then(|u| non_empty(&u.first_name)))
            .unwrap_or(FALLBACK_NAME)
            .to_string();
        let current_role = details
            .user
            .current_role
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(FALLBACK_ROLE)
            .to_string();

        Self {
            name,
            current_role,
            experience: details.experience,
            skills: details.skills,
            target_roles: history
                .career_matches
                .iter()
                .map(|m| m.role.clone())
                .collect(),
            skill_gaps: history.skill_gaps,
            roadmap: history.learning_roadmap,
            career_matches: details.career_matches,
        }
    }

    /// 按类别分组技能，未分类的归入 `Other`
    pub fn skills_by_category(&self) -> BTreeMap<String, Vec<Skill>> {
        let mut groups: BTreeMap<String, Vec<Skill>> = BTreeMap::new();
        for skill in &self.skills {
            let category = non_empty(&skill.category).unwrap_or(FALLBACK_CATEGORY);
            groups
                .entry(category.to_string())
                .or_default()
                .push(skill.clone());
        }
        groups
    }

    pub fn average_skill_level(&self) -> Option<f64> {
        if self.skills.is_empty() {
            return None;
        }
        let total: f64 = self.skills.iter().map(|s| s.level).sum();
        Some(total / self.skills.len() as f64)
    }
}

// =========================================================
// 上传校验 (Upload Validation)
// =========================================================

const RESUME_MIME_MARKERS: [&str; 3] = ["pdf", "msword", "wordprocessingml"];

/// 仅接受 PDF 与 Word 文档
pub fn is_supported_resume_type(mime: &str) -> bool {
    RESUME_MIME_MARKERS.iter().any(|m| mime.contains(m))
}

pub fn is_linkedin_url(url: &str) -> bool {
    url.contains("linkedin.com")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::AccountDetails;

    fn me(first_name: &str, role: Option<&str>) -> MeResponse {
        MeResponse {
            user: AccountDetails {
                user: User {
                    id: "u1".to_string(),
                    first_name: first_name.to_string(),
                    last_name: "L".to_string(),
                    email: "a@b.io".to_string(),
                    current_role: role.map(str::to_string),
                    profile_completeness: 0.0,
                },
                skills: vec![
                    Skill {
                        name: "Rust".to_string(),
                        level: 90.0,
                        category: "Languages".to_string(),
                    },
                    Skill {
                        name: "Teamwork".to_string(),
                        level: 70.0,
                        category: String::new(),
                    },
                ],
                experience: ExperienceField::default(),
                career_matches: Vec::new(),
                target_roles: Vec::new(),
            },
        }
    }

    #[test]
    fn test_history_defaults_missing_sections() {
        let history: History =
            serde_json::from_str(r#"{"skillGaps":[{"skill":"Kubernetes"}]}"#).unwrap();
        assert_eq!(history.skill_gaps[0].skill, "Kubernetes");
        assert!(history.skill_gaps[0].resources.is_empty());
        assert!(history.learning_roadmap.is_empty());
        assert!(history.career_matches.is_empty());
    }

    #[test]
    fn test_history_null_sections_are_empty() {
        let body = r#"{
            "skillGaps": null,
            "learningRoadmap": [{"title": "Learn Go", "skills": null, "status": null}],
            "careerMatches": [{"role": "SRE", "matchPercentage": null, "missingSkills": null}]
        }"#;
        let history: History = serde_json::from_str(body).unwrap();
        assert!(history.skill_gaps.is_empty());
        assert!(history.learning_roadmap[0].skills.is_empty());
        assert_eq!(history.learning_roadmap[0].status, "");
        assert_eq!(history.career_matches[0].match_percentage, 0.0);
        assert!(history.career_matches[0].missing_skills.is_empty());
    }

    #[test]
    fn test_upload_profile_with_null_fields() {
        let body = r#"{"profile": {"name": null, "skills": null, "experience": null}}"#;
        let response: UploadResponse = serde_json::from_str(body).unwrap();
        let profile = response.profile.unwrap();
        assert_eq!(profile.name, None);
        assert!(profile.skills.is_empty());
        assert!(profile.experience.is_empty());
    }

    #[test]
    fn test_combine_uses_history_roles_and_fallbacks() {
        let history = History {
            career_matches: vec![CareerMatch {
                role: "Platform Engineer".to_string(),
                match_percentage: 82.0,
                requirements: Vec::new(),
                missing_skills: Vec::new(),
            }],
            ..Default::default()
        };
        let profile = DashboardProfile::combine(me("", None), history, None);
        assert_eq!(profile.name, FALLBACK_NAME);
        assert_eq!(profile.current_role, FALLBACK_ROLE);
        assert_eq!(profile.target_roles, vec!["Platform Engineer".to_string()]);
    }

    #[test]
    fn test_combine_prefers_fetched_name_then_session_user() {
        let session_user = me("Session", None).user.user;

        let profile =
            DashboardProfile::combine(me("Ada", Some("Analyst")), History::default(), None);
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.current_role, "Analyst");

        let profile =
            DashboardProfile::combine(me(" ", None), History::default(), Some(&session_user));
        assert_eq!(profile.name, "Session");
    }

    #[test]
    fn test_skills_grouped_by_category() {
        let profile = DashboardProfile::combine(me("Ada", None), History::default(), None);
        let groups = profile.skills_by_category();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Languages"][0].name, "Rust");
        assert_eq!(groups[FALLBACK_CATEGORY][0].name, "Teamwork");
        assert_eq!(profile.average_skill_level(), Some(80.0));
    }

    #[test]
    fn test_resume_type_and_linkedin_checks() {
        assert!(is_supported_resume_type("application/pdf"));
        assert!(is_supported_resume_type("application/msword"));
        assert!(is_supported_resume_type(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert!(!is_supported_resume_type("image/png"));

        assert!(is_linkedin_url("https://www.linkedin.com/in/ada"));
        assert!(!is_linkedin_url("https://example.com/ada"));
    }
}
