//! 测评记录仓储（只读）
//!
//! 测评提交由外部测评子系统写入，skill_id 通过测评定义关联得到

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::AttemptReaderTrait;
use crate::error::Result;
use crate::models::AssessmentAttempt;

pub struct AttemptRepository {
    pool: PgPool,
}

impl AttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_attempt(&self, attempt_id: i64) -> Result<Option<AssessmentAttempt>> {
        let attempt = sqlx::query_as::<_, AssessmentAttempt>(
            r#"
            SELECT ua.id, ua.user_id, ua.assessment_id, a.skill_id, ua.score,
                   ua.status, ua.submission_date AS submitted_at
            FROM user_assessments ua
            JOIN assessments a ON a.id = ua.assessment_id
            WHERE ua.id = $1
            "#,
        )
        .bind(attempt_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }
}

#[async_trait]
impl AttemptReaderTrait for AttemptRepository {
    async fn get_attempt(&self, attempt_id: i64) -> Result<Option<AssessmentAttempt>> {
        self.get_attempt(attempt_id).await
    }
}
