//! 徽章授予记录
//!
//! 记录“用户 U 因测评 A 获得等级 T”，创建后不可修改

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attempt::{AssessmentAttempt, UserSummary};
use super::skill::Skill;
use super::tier::BadgeTier;

/// 徽章授予
///
/// 每条测评记录最多产生一条授予（attempt_id 唯一）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BadgeGrant {
    pub id: i64,
    pub user_id: String,
    pub tier_id: i64,
    pub attempt_id: i64,
    pub created_at: DateTime<Utc>,
}

/// 待写入的授予
#[derive(Debug, Clone, PartialEq)]
pub struct NewBadgeGrant {
    pub user_id: String,
    pub tier_id: i64,
    pub attempt_id: i64,
}

/// 按 attempt_id 幂等写入的结果
#[derive(Debug, Clone, PartialEq)]
pub enum GrantWrite {
    /// 本次写入新建
    Created(BadgeGrant),
    /// 该测评已有授予，未写入
    Existing(BadgeGrant),
}

impl GrantWrite {
    pub fn grant(&self) -> &BadgeGrant {
        match self {
            Self::Created(grant) | Self::Existing(grant) => grant,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// 授予详情
///
/// 一次组合读取得到的授予及其等级、技能、测评、用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeGrantDetail {
    #[serde(flatten)]
    pub grant: BadgeGrant,
    pub tier: BadgeTier,
    pub skill: Skill,
    pub attempt: AssessmentAttempt,
    pub user: Option<UserSummary>,
}

impl BadgeGrantDetail {
    pub fn id(&self) -> i64 {
        self.grant.id
    }
}
