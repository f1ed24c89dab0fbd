//! 领域枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化，存储统一使用小写

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SkillBadgeError;

/// 徽章等级名称
///
/// 封闭枚举，输入大小写不敏感，存储与输出统一为小写
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum TierName {
    Beginner,
    Intermediate,
    Expert,
}

impl TierName {
    pub const ALL: [TierName; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierName {
    type Err = SkillBadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == folded)
            .ok_or_else(|| {
                SkillBadgeError::Validation(format!(
                    "invalid tier name '{}', expected one of: beginner, intermediate, expert",
                    s.trim()
                ))
            })
    }
}

/// 测评提交状态
///
/// 由外部测评子系统维护，只有 Complete 状态可以参与徽章评定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum AttemptStatus {
    /// 评审中
    Pending,
    /// 已完成，可评定徽章
    Complete,
    /// 未通过
    Failed,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// 是否可以参与徽章评定
    pub fn is_badge_eligible(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_name_parse_is_case_insensitive() {
        assert_eq!("beginner".parse::<TierName>().unwrap(), TierName::Beginner);
        assert_eq!("Intermediate".parse::<TierName>().unwrap(), TierName::Intermediate);
        assert_eq!("  EXPERT ".parse::<TierName>().unwrap(), TierName::Expert);
    }

    #[test]
    fn test_tier_name_rejects_unknown() {
        let err = "novice".parse::<TierName>().unwrap_err();
        assert!(matches!(err, SkillBadgeError::Validation(_)));
        assert!(err.to_string().contains("novice"));

        assert!("".parse::<TierName>().is_err());
    }

    #[test]
    fn test_tier_name_serialization() {
        assert_eq!(serde_json::to_value(TierName::Beginner).unwrap(), "beginner");
        let parsed: TierName = serde_json::from_str("\"expert\"").unwrap();
        assert_eq!(parsed, TierName::Expert);
        assert_eq!(TierName::Intermediate.to_string(), "intermediate");
    }

    #[test]
    fn test_attempt_status_eligibility() {
        assert!(AttemptStatus::Complete.is_badge_eligible());
        assert!(!AttemptStatus::Pending.is_badge_eligible());
        assert!(!AttemptStatus::Failed.is_badge_eligible());
        assert_eq!(serde_json::to_value(AttemptStatus::Failed).unwrap(), "failed");
    }
}
