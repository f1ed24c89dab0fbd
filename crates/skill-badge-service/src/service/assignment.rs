//! 徽章授予服务
//!
//! 按测评记录授予徽章，以 attempt_id 为幂等键。
//!
//! ## 授予流程
//!
//! 1. 用户校验 -> 2. 读取测评 -> 3. 状态检查 -> 4. 分数解析等级
//!    -> 5. 幂等检查 -> 6. 写入（存储层保证唯一） -> 7. 组合读取详情
//!    -> 8. 通知交接（仅新建，失败不影响授予）

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{Result, SkillBadgeError};
use crate::models::{BadgeGrant, BadgeGrantDetail, GrantWrite, NewBadgeGrant};
use crate::notification::{BadgeNotification, NotificationDispatcher};
use crate::repository::{
    AttemptReaderTrait, GrantStoreTrait, SkillRepositoryTrait, TierRepositoryTrait,
};
use crate::service::dto::{AssignBadgeResponse, NotificationOutcome};
use crate::service::tier_catalog::TierCatalogService;

/// 徽章授予服务
pub struct AssignmentService<A: ?Sized, S: ?Sized, T: ?Sized, G: ?Sized> {
    attempt_repo: Arc<A>,
    catalog: Arc<TierCatalogService<S, T>>,
    grant_store: Arc<G>,
    /// 未配置时不发通知
    dispatcher: Option<Arc<dyn NotificationDispatcher>>,
}

impl<A, S, T, G> AssignmentService<A, S, T, G>
where
    A: AttemptReaderTrait + ?Sized,
    S: SkillRepositoryTrait + ?Sized,
    T: TierRepositoryTrait + ?Sized,
    G: GrantStoreTrait + ?Sized,
{
    pub fn new(
        attempt_repo: Arc<A>,
        catalog: Arc<TierCatalogService<S, T>>,
        grant_store: Arc<G>,
    ) -> Self {
        Self {
            attempt_repo,
            catalog,
            grant_store,
            dispatcher: None,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// 为用户授予测评对应的徽章
    ///
    /// 同一测评重复调用返回已有授予（`created = false`），不会重复写入
    #[instrument(skip(self))]
    pub async fn assign_badge(&self, user_id: &str, attempt_id: i64) -> Result<AssignBadgeResponse> {
        let result = self.assign_inner(user_id, attempt_id).await;
        if let Err(e) = &result {
            metrics::counter!("badge_assignment_rejections_total", "code" => e.error_code())
                .increment(1);
        }
        result
    }

    async fn assign_inner(&self, user_id: &str, attempt_id: i64) -> Result<AssignBadgeResponse> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(SkillBadgeError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }

        let attempt = self
            .attempt_repo
            .get_attempt(attempt_id)
            .await?
            .ok_or(SkillBadgeError::AttemptNotFound(attempt_id))?;

        if !attempt.is_badge_eligible() {
            return Err(SkillBadgeError::AttemptNotEligible {
                attempt_id,
                status: attempt.status.to_string(),
            });
        }

        let tier = self
            .catalog
            .resolve_tier_for_score(attempt.skill_id, attempt.score)
            .await?;
        if tier.skill_id != attempt.skill_id {
            return Err(SkillBadgeError::Internal(format!(
                "解析到的等级不属于测评技能: tier_id={}, skill_id={}",
                tier.id, attempt.skill_id
            )));
        }

        if let Some(existing) = self.grant_store.get_grant_by_attempt(attempt_id).await? {
            let grant = Self::ensure_owner(existing, user_id)?;
            info!(grant_id = grant.id, "测评已授予，返回已有记录");
            return self.respond(grant.id, false, NotificationOutcome::Skipped).await;
        }

        let write = self
            .grant_store
            .insert_grant(&NewBadgeGrant {
                user_id: user_id.to_string(),
                tier_id: tier.id,
                attempt_id,
            })
            .await?;

        let (grant, created) = match write {
            GrantWrite::Created(grant) => (grant, true),
            // 并发请求先写入
            GrantWrite::Existing(grant) => (Self::ensure_owner(grant, user_id)?, false),
        };

        let detail = self.load_detail(grant.id).await?;
        let notification = if created {
            self.notify(&detail).await
        } else {
            NotificationOutcome::Skipped
        };

        let outcome = if created { "created" } else { "existing" };
        metrics::counter!("badge_assignments_total", "outcome" => outcome).increment(1);
        info!(
            grant_id = grant.id,
            tier_id = tier.id,
            tier = %tier.name,
            created,
            "徽章授予完成"
        );

        Ok(AssignBadgeResponse {
            grant: detail,
            created,
            notification,
        })
    }

    fn ensure_owner(grant: BadgeGrant, user_id: &str) -> Result<BadgeGrant> {
        if grant.user_id == user_id {
            Ok(grant)
        } else {
            Err(SkillBadgeError::GrantConflict {
                attempt_id: grant.attempt_id,
                grant_id: grant.id,
            })
        }
    }

    async fn respond(
        &self,
        grant_id: i64,
        created: bool,
        notification: NotificationOutcome,
    ) -> Result<AssignBadgeResponse> {
        let detail = self.load_detail(grant_id).await?;
        metrics::counter!("badge_assignments_total", "outcome" => "existing").increment(1);
        Ok(AssignBadgeResponse {
            grant: detail,
            created,
            notification,
        })
    }

    async fn load_detail(&self, grant_id: i64) -> Result<BadgeGrantDetail> {
        self.grant_store
            .get_grant_detail(grant_id)
            .await?
            .ok_or_else(|| SkillBadgeError::Internal(format!("授予写入后读取失败: {}", grant_id)))
    }

    async fn notify(&self, detail: &BadgeGrantDetail) -> NotificationOutcome {
        let Some(dispatcher) = &self.dispatcher else {
            return NotificationOutcome::Skipped;
        };

        match dispatcher
            .dispatch(BadgeNotification::from_detail(detail))
            .await
        {
            Ok(()) => {
                metrics::counter!("badge_notifications_total", "result" => "queued").increment(1);
                NotificationOutcome::Sent
            }
            Err(e) => {
                metrics::counter!("badge_notifications_total", "result" => "dropped").increment(1);
                warn!(grant_id = detail.id(), error = %e, "徽章已授予，通知未发出");
                NotificationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
