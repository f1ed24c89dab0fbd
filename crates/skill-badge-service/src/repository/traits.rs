//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试与内存实现

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AssessmentAttempt, BadgeGrant, BadgeGrantDetail, BadgeTier, GrantWrite, NewBadgeGrant,
    NewBadgeTier, Skill, TierName,
};

/// 授予列表查询条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrantFilter {
    pub tier_name: Option<TierName>,
    pub skill_id: Option<i64>,
}

impl GrantFilter {
    pub fn by_tier(tier_name: TierName) -> Self {
        Self {
            tier_name: Some(tier_name),
            ..Default::default()
        }
    }

    pub fn by_skill(skill_id: i64) -> Self {
        Self {
            skill_id: Some(skill_id),
            ..Default::default()
        }
    }

    /// 内存实现与测试使用的匹配逻辑，SQL 实现中对应 WHERE 条件
    pub fn matches(&self, detail: &BadgeGrantDetail) -> bool {
        self.tier_name.is_none_or(|name| detail.tier.name == name)
            && self.skill_id.is_none_or(|id| detail.skill.id == id)
    }
}

/// 技能仓储接口（只读）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepositoryTrait: Send + Sync {
    async fn skill_exists(&self, skill_id: i64) -> Result<bool>;
    async fn get_skill(&self, skill_id: i64) -> Result<Option<Skill>>;
}

/// 徽章等级仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TierRepositoryTrait: Send + Sync {
    /// 写入新等级；(skill_id, name) 冲突时返回 `TierAlreadyExists`
    async fn create_tier(&self, tier: &NewBadgeTier) -> Result<BadgeTier>;
    async fn get_tier(&self, id: i64) -> Result<Option<BadgeTier>>;
    async fn tier_exists(&self, id: i64) -> Result<bool>;
    async fn find_tier_by_name(&self, skill_id: i64, name: TierName) -> Result<Option<BadgeTier>>;
    /// 按 id 升序返回技能下所有等级
    async fn list_tiers_by_skill(&self, skill_id: i64) -> Result<Vec<BadgeTier>>;
}

/// 测评记录读取接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptReaderTrait: Send + Sync {
    async fn get_attempt(&self, attempt_id: i64) -> Result<Option<AssessmentAttempt>>;
}

/// 徽章授予仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrantStoreTrait: Send + Sync {
    async fn get_grant_by_attempt(&self, attempt_id: i64) -> Result<Option<BadgeGrant>>;

    /// 按 attempt_id 幂等写入
    ///
    /// 唯一性由存储层原子保证，并发写入同一测评时只有一个返回 `Created`
    async fn insert_grant(&self, grant: &NewBadgeGrant) -> Result<GrantWrite>;

    /// 组合读取授予详情（等级、技能、测评、用户）
    async fn get_grant_detail(&self, grant_id: i64) -> Result<Option<BadgeGrantDetail>>;

    /// 按创建时间升序（同时间按 id 升序）列出用户的授予详情
    async fn list_grant_details(
        &self,
        user_id: &str,
        filter: &GrantFilter,
    ) -> Result<Vec<BadgeGrantDetail>>;
}
