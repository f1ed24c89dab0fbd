//! 测评记录与用户摘要
//!
//! 均由外部子系统写入，本服务只读

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AttemptStatus;

/// 测评提交记录
///
/// 一次测评提交，带分数和状态。skill_id 来自所属测评定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAttempt {
    pub id: i64,
    /// 提交人；授予时以调用方传入的 user_id 为准
    #[sqlx(default)]
    pub user_id: Option<String>,
    pub assessment_id: i64,
    pub skill_id: i64,
    pub score: i32,
    pub status: AttemptStatus,
    #[sqlx(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl AssessmentAttempt {
    pub fn is_badge_eligible(&self) -> bool {
        self.status.is_badge_eligible()
    }
}

/// 用户摘要
///
/// 身份体系在外部，用户行可能不存在
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[sqlx(default)]
    pub username: Option<String>,
    #[sqlx(default)]
    pub first_name: Option<String>,
    #[sqlx(default)]
    pub last_name: Option<String>,
    #[sqlx(default)]
    pub email: Option<String>,
}

impl UserSummary {
    /// 通知展示用的名称
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone().unwrap_or_else(|| self.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = UserSummary {
            id: "user-1".to_string(),
            username: None,
            first_name: None,
            last_name: None,
            email: None,
        };
        assert_eq!(user.display_name(), "user-1");

        user.username = Some("ada".to_string());
        assert_eq!(user.display_name(), "ada");

        user.first_name = Some("Ada".to_string());
        user.last_name = Some("Lovelace".to_string());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }
}
