//! 徽章授予仓储
//!
//! 写入以 attempt_id 为幂等键，读取通过一次 JOIN 组合出授予详情

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::traits::{GrantFilter, GrantStoreTrait};
use crate::error::{Result, SkillBadgeError};
use crate::models::{
    AssessmentAttempt, AttemptStatus, BadgeGrant, BadgeGrantDetail, BadgeTier, GrantWrite,
    NewBadgeGrant, Skill, TierName, UserSummary,
};

/// 授予详情的组合查询，调用方追加 WHERE / ORDER BY
const GRANT_DETAIL_SELECT: &str = r#"
    SELECT g.id, g.user_id, g.tier_id, g.attempt_id, g.created_at,
           t.skill_id AS tier_skill_id, t.name AS tier_name,
           t.min_score AS tier_min_score, t.max_score AS tier_max_score,
           t.created_at AS tier_created_at, t.updated_at AS tier_updated_at,
           s.name AS skill_name, s.description AS skill_description,
           s.parent_skill_id AS skill_parent_skill_id,
           s.created_at AS skill_created_at, s.updated_at AS skill_updated_at,
           ua.user_id AS attempt_user_id, ua.assessment_id AS attempt_assessment_id,
           a.skill_id AS attempt_skill_id, ua.score AS attempt_score,
           ua.status AS attempt_status, ua.submission_date AS attempt_submitted_at,
           u.id AS profile_id, u.username AS profile_username,
           u.first_name AS profile_first_name, u.last_name AS profile_last_name,
           u.email AS profile_email
    FROM badge_grants g
    JOIN badge_tiers t ON t.id = g.tier_id
    JOIN skills s ON s.id = t.skill_id
    JOIN user_assessments ua ON ua.id = g.attempt_id
    JOIN assessments a ON a.id = ua.assessment_id
    LEFT JOIN users u ON u.id = g.user_id
"#;

/// 组合查询的扁平行
#[derive(sqlx::FromRow)]
struct GrantDetailRow {
    id: i64,
    user_id: String,
    tier_id: i64,
    attempt_id: i64,
    created_at: DateTime<Utc>,
    tier_skill_id: i64,
    tier_name: TierName,
    tier_min_score: i32,
    tier_max_score: i32,
    tier_created_at: DateTime<Utc>,
    tier_updated_at: DateTime<Utc>,
    skill_name: String,
    skill_description: Option<String>,
    skill_parent_skill_id: Option<i64>,
    skill_created_at: DateTime<Utc>,
    skill_updated_at: DateTime<Utc>,
    attempt_user_id: Option<String>,
    attempt_assessment_id: i64,
    attempt_skill_id: i64,
    attempt_score: i32,
    attempt_status: AttemptStatus,
    attempt_submitted_at: Option<DateTime<Utc>>,
    profile_id: Option<String>,
    profile_username: Option<String>,
    profile_first_name: Option<String>,
    profile_last_name: Option<String>,
    profile_email: Option<String>,
}

impl From<GrantDetailRow> for BadgeGrantDetail {
    fn from(row: GrantDetailRow) -> Self {
        let user = row.profile_id.map(|id| UserSummary {
            id,
            username: row.profile_username,
            first_name: row.profile_first_name,
            last_name: row.profile_last_name,
            email: row.profile_email,
        });

        Self {
            grant: BadgeGrant {
                id: row.id,
                user_id: row.user_id,
                tier_id: row.tier_id,
                attempt_id: row.attempt_id,
                created_at: row.created_at,
            },
            tier: BadgeTier {
                id: row.tier_id,
                skill_id: row.tier_skill_id,
                name: row.tier_name,
                min_score: row.tier_min_score,
                max_score: row.tier_max_score,
                created_at: row.tier_created_at,
                updated_at: row.tier_updated_at,
            },
            skill: Skill {
                id: row.tier_skill_id,
                name: row.skill_name,
                description: row.skill_description,
                parent_skill_id: row.skill_parent_skill_id,
                created_at: row.skill_created_at,
                updated_at: row.skill_updated_at,
            },
            attempt: AssessmentAttempt {
                id: row.attempt_id,
                user_id: row.attempt_user_id,
                assessment_id: row.attempt_assessment_id,
                skill_id: row.attempt_skill_id,
                score: row.attempt_score,
                status: row.attempt_status,
                submitted_at: row.attempt_submitted_at,
            },
            user,
        }
    }
}

/// 徽章授予仓储
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_grant_by_attempt(&self, attempt_id: i64) -> Result<Option<BadgeGrant>> {
        let grant = sqlx::query_as::<_, BadgeGrant>(
            r#"
            SELECT id, user_id, tier_id, attempt_id, created_at
            FROM badge_grants
            WHERE attempt_id = $1
            "#,
        )
        .bind(attempt_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(grant)
    }

    /// 幂等写入
    ///
    /// `ON CONFLICT DO NOTHING` 时不返回行，此时读回已存在的授予
    pub async fn insert_grant(&self, grant: &NewBadgeGrant) -> Result<GrantWrite> {
        let inserted = sqlx::query_as::<_, BadgeGrant>(
            r#"
            INSERT INTO badge_grants (user_id, tier_id, attempt_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (attempt_id) DO NOTHING
            RETURNING id, user_id, tier_id, attempt_id, created_at
            "#,
        )
        .bind(&grant.user_id)
        .bind(grant.tier_id)
        .bind(grant.attempt_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(created) = inserted {
            return Ok(GrantWrite::Created(created));
        }

        self.get_grant_by_attempt(grant.attempt_id)
            .await?
            .map(GrantWrite::Existing)
            .ok_or_else(|| {
                SkillBadgeError::Internal(format!(
                    "授予写入冲突但未读到已有记录: attempt_id={}",
                    grant.attempt_id
                ))
            })
    }

    pub async fn get_grant_detail(&self, grant_id: i64) -> Result<Option<BadgeGrantDetail>> {
        let sql = format!("{} WHERE g.id = $1", GRANT_DETAIL_SELECT);
        let row = sqlx::query_as::<_, GrantDetailRow>(&sql)
            .bind(grant_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BadgeGrantDetail::from))
    }

    pub async fn list_grant_details(
        &self,
        user_id: &str,
        filter: &GrantFilter,
    ) -> Result<Vec<BadgeGrantDetail>> {
        let sql = format!(
            r#"{}
            WHERE g.user_id = $1
              AND ($2::varchar IS NULL OR t.name = $2)
              AND ($3::bigint IS NULL OR t.skill_id = $3)
            ORDER BY g.created_at ASC, g.id ASC
            "#,
            GRANT_DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, GrantDetailRow>(&sql)
            .bind(user_id)
            .bind(filter.tier_name)
            .bind(filter.skill_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BadgeGrantDetail::from).collect())
    }
}

#[async_trait]
impl GrantStoreTrait for GrantRepository {
    async fn get_grant_by_attempt(&self, attempt_id: i64) -> Result<Option<BadgeGrant>> {
        self.get_grant_by_attempt(attempt_id).await
    }

    async fn insert_grant(&self, grant: &NewBadgeGrant) -> Result<GrantWrite> {
        self.insert_grant(grant).await
    }

    async fn get_grant_detail(&self, grant_id: i64) -> Result<Option<BadgeGrantDetail>> {
        self.get_grant_detail(grant_id).await
    }

    async fn list_grant_details(
        &self,
        user_id: &str,
        filter: &GrantFilter,
    ) -> Result<Vec<BadgeGrantDetail>> {
        self.list_grant_details(user_id, filter).await
    }
}
