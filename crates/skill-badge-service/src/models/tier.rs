//! 徽章等级（分数区间）
//!
//! 每个技能下按等级名称划分分数区间，分数落入区间即获得对应徽章

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::TierName;

/// 徽章等级
///
/// 同一技能下等级名称唯一，区间为闭区间 [min_score, max_score]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BadgeTier {
    pub id: i64,
    pub skill_id: i64,
    pub name: TierName,
    pub min_score: i32,
    pub max_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BadgeTier {
    /// 分数是否落在区间内（两端都包含）
    pub fn contains(&self, score: i32) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// 待创建的徽章等级（已通过校验）
#[derive(Debug, Clone, PartialEq)]
pub struct NewBadgeTier {
    pub skill_id: i64,
    pub name: TierName,
    pub min_score: i32,
    pub max_score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min: i32, max: i32) -> BadgeTier {
        BadgeTier {
            id: 1,
            skill_id: 1,
            name: TierName::Beginner,
            min_score: min,
            max_score: max,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_contains_is_inclusive() {
        let t = tier(0, 50);
        assert!(t.contains(0));
        assert!(t.contains(30));
        assert!(t.contains(50));
        assert!(!t.contains(51));
        assert!(!t.contains(-1));
    }
}
