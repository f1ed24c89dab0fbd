//! 徽章等级仓储
//!
//! 提供等级的创建与查询，(skill_id, name) 唯一约束在数据库侧

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::TierRepositoryTrait;
use crate::error::{Result, SkillBadgeError};
use crate::models::{BadgeTier, NewBadgeTier, TierName};

/// 徽章等级仓储
pub struct TierRepository {
    pool: PgPool,
}

impl TierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建等级
    ///
    /// 并发创建同名等级时，后到者在唯一约束上失败并转为 `TierAlreadyExists`
    pub async fn create_tier(&self, tier: &NewBadgeTier) -> Result<BadgeTier> {
        let created = sqlx::query_as::<_, BadgeTier>(
            r#"
            INSERT INTO badge_tiers (skill_id, name, min_score, max_score, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, skill_id, name, min_score, max_score, created_at, updated_at
            "#,
        )
        .bind(tier.skill_id)
        .bind(tier.name)
        .bind(tier.min_score)
        .bind(tier.max_score)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = SkillBadgeError::from(e);
            if err.is_unique_violation() {
                SkillBadgeError::TierAlreadyExists {
                    skill_id: tier.skill_id,
                    name: tier.name.to_string(),
                }
            } else {
                err
            }
        })?;

        Ok(created)
    }

    pub async fn get_tier(&self, id: i64) -> Result<Option<BadgeTier>> {
        let tier = sqlx::query_as::<_, BadgeTier>(
            r#"
            SELECT id, skill_id, name, min_score, max_score, created_at, updated_at
            FROM badge_tiers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tier)
    }

    pub async fn tier_exists(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM badge_tiers WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn find_tier_by_name(
        &self,
        skill_id: i64,
        name: TierName,
    ) -> Result<Option<BadgeTier>> {
        let tier = sqlx::query_as::<_, BadgeTier>(
            r#"
            SELECT id, skill_id, name, min_score, max_score, created_at, updated_at
            FROM badge_tiers
            WHERE skill_id = $1 AND name = $2
            "#,
        )
        .bind(skill_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tier)
    }

    pub async fn list_tiers_by_skill(&self, skill_id: i64) -> Result<Vec<BadgeTier>> {
        let tiers = sqlx::query_as::<_, BadgeTier>(
            r#"
            SELECT id, skill_id, name, min_score, max_score, created_at, updated_at
            FROM badge_tiers
            WHERE skill_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(skill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tiers)
    }
}

#[async_trait]
impl TierRepositoryTrait for TierRepository {
    async fn create_tier(&self, tier: &NewBadgeTier) -> Result<BadgeTier> {
        self.create_tier(tier).await
    }

    async fn get_tier(&self, id: i64) -> Result<Option<BadgeTier>> {
        self.get_tier(id).await
    }

    async fn tier_exists(&self, id: i64) -> Result<bool> {
        self.tier_exists(id).await
    }

    async fn find_tier_by_name(&self, skill_id: i64, name: TierName) -> Result<Option<BadgeTier>> {
        self.find_tier_by_name(skill_id, name).await
    }

    async fn list_tiers_by_skill(&self, skill_id: i64) -> Result<Vec<BadgeTier>> {
        self.list_tiers_by_skill(skill_id).await
    }
}
