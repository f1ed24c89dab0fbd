//! 技能仓储
//!
//! 技能由外部系统维护，这里只提供存在性检查和读取

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::SkillRepositoryTrait;
use crate::error::Result;
use crate::models::Skill;

/// 技能仓储
pub struct SkillRepository {
    pool: PgPool,
}

impl SkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn skill_exists(&self, skill_id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM skills WHERE id = $1)",
        )
        .bind(skill_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn get_skill(&self, skill_id: i64) -> Result<Option<Skill>> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, description, parent_skill_id, created_at, updated_at
            FROM skills
            WHERE id = $1
            "#,
        )
        .bind(skill_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(skill)
    }
}

#[async_trait]
impl SkillRepositoryTrait for SkillRepository {
    async fn skill_exists(&self, skill_id: i64) -> Result<bool> {
        self.skill_exists(skill_id).await
    }

    async fn get_skill(&self, skill_id: i64) -> Result<Option<Skill>> {
        self.get_skill(skill_id).await
    }
}
