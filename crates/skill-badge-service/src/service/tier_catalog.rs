//! 徽章等级目录服务
//!
//! 负责等级定义的校验写入，以及把分数解析到唯一的等级。
//!
//! ## 定义校验顺序
//!
//! 1. 等级名称 -> 2. min_score 非负 -> 3. min_score < max_score
//!    -> 4. 技能存在 -> 5. 同技能下名称唯一 -> 6. 写入
//!
//! 全部校验在写入前完成；写入时的唯一约束冲突同样报告为重复定义。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{Result, SkillBadgeError};
use crate::models::{BadgeTier, NewBadgeTier, TierName};
use crate::repository::{SkillRepositoryTrait, TierRepositoryTrait};

/// 分数解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum TierResolution {
    /// 没有区间包含该分数
    Unmatched,
    /// 恰好一个区间包含该分数
    Unique(BadgeTier),
    /// 多个区间重叠，取 id 最小者
    Overlapping {
        chosen: BadgeTier,
        matching_ids: Vec<i64>,
    },
}

impl TierResolution {
    pub fn tier(&self) -> Option<&BadgeTier> {
        match self {
            Self::Unmatched => None,
            Self::Unique(tier) | Self::Overlapping { chosen: tier, .. } => Some(tier),
        }
    }
}

/// 在给定等级中解析分数
///
/// 区间两端都包含；多个等级匹配时取 id 最小的，保证结果确定
pub fn resolve_tier(tiers: &[BadgeTier], score: i32) -> TierResolution {
    let mut matching: Vec<&BadgeTier> = tiers.iter().filter(|t| t.contains(score)).collect();
    matching.sort_by_key(|t| t.id);

    match matching.as_slice() {
        [] => TierResolution::Unmatched,
        [only] => TierResolution::Unique((*only).clone()),
        [first, ..] => TierResolution::Overlapping {
            chosen: (*first).clone(),
            matching_ids: matching.iter().map(|t| t.id).collect(),
        },
    }
}

/// 徽章等级目录服务
pub struct TierCatalogService<S: ?Sized, T: ?Sized> {
    skill_repo: Arc<S>,
    tier_repo: Arc<T>,
}

impl<S, T> TierCatalogService<S, T>
where
    S: SkillRepositoryTrait + ?Sized,
    T: TierRepositoryTrait + ?Sized,
{
    pub fn new(skill_repo: Arc<S>, tier_repo: Arc<T>) -> Self {
        Self {
            skill_repo,
            tier_repo,
        }
    }

    /// 定义等级
    #[instrument(skip(self))]
    pub async fn define_tier(
        &self,
        skill_id: i64,
        name: &str,
        min_score: i32,
        max_score: i32,
    ) -> Result<BadgeTier> {
        let name: TierName = name.parse()?;

        if min_score < 0 {
            return Err(SkillBadgeError::Validation(
                "min_score must be non-negative".to_string(),
            ));
        }
        if min_score >= max_score {
            return Err(SkillBadgeError::Validation(
                "max_score must exceed min_score".to_string(),
            ));
        }

        if !self.skill_repo.skill_exists(skill_id).await? {
            return Err(SkillBadgeError::SkillNotFound(skill_id));
        }

        if self
            .tier_repo
            .find_tier_by_name(skill_id, name)
            .await?
            .is_some()
        {
            return Err(SkillBadgeError::TierAlreadyExists {
                skill_id,
                name: name.to_string(),
            });
        }

        let tier = self
            .tier_repo
            .create_tier(&NewBadgeTier {
                skill_id,
                name,
                min_score,
                max_score,
            })
            .await?;

        metrics::counter!("badge_tiers_defined_total", "tier" => name.as_str()).increment(1);
        info!(tier_id = tier.id, min_score, max_score, "徽章等级已定义");

        Ok(tier)
    }

    pub async fn tier_exists(&self, tier_id: i64) -> Result<bool> {
        self.tier_repo.tier_exists(tier_id).await
    }

    pub async fn get_tier(&self, tier_id: i64) -> Result<BadgeTier> {
        self.tier_repo
            .get_tier(tier_id)
            .await?
            .ok_or(SkillBadgeError::TierNotFound(tier_id))
    }

    /// 列出技能下的等级，按 min_score 升序（相同时按 id）
    pub async fn list_tiers_for_skill(&self, skill_id: i64) -> Result<Vec<BadgeTier>> {
        if !self.skill_repo.skill_exists(skill_id).await? {
            return Err(SkillBadgeError::SkillNotFound(skill_id));
        }

        let mut tiers = self.tier_repo.list_tiers_by_skill(skill_id).await?;
        tiers.sort_by_key(|t| (t.min_score, t.id));
        Ok(tiers)
    }

    /// 把分数解析为该技能下的等级
    #[instrument(skip(self))]
    pub async fn resolve_tier_for_score(&self, skill_id: i64, score: i32) -> Result<BadgeTier> {
        let tiers = self.tier_repo.list_tiers_by_skill(skill_id).await?;

        match resolve_tier(&tiers, score) {
            TierResolution::Unmatched => Err(SkillBadgeError::NoMatchingTier { skill_id, score }),
            TierResolution::Unique(tier) => Ok(tier),
            TierResolution::Overlapping {
                chosen,
                matching_ids,
            } => {
                metrics::counter!("badge_tier_overlaps_total").increment(1);
                warn!(
                    chosen_tier_id = chosen.id,
                    matching_tier_ids = ?matching_ids,
                    "等级分数区间重叠，按最小 id 选择"
                );
                Ok(chosen)
            }
        }
    }
}
