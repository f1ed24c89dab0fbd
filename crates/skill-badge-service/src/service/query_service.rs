//! 徽章查询服务
//!
//! 所有查询都经由一次组合读取返回授予详情；跨用户访问按不存在处理

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{Result, SkillBadgeError};
use crate::models::{BadgeGrantDetail, TierName};
use crate::repository::{GrantFilter, GrantStoreTrait, SkillRepositoryTrait};
use crate::service::dto::ShareLink;

/// 徽章查询服务
pub struct BadgeQueryService<S: ?Sized, G: ?Sized> {
    skill_repo: Arc<S>,
    grant_store: Arc<G>,
    share_base_url: String,
}

impl<S, G> BadgeQueryService<S, G>
where
    S: SkillRepositoryTrait + ?Sized,
    G: GrantStoreTrait + ?Sized,
{
    pub fn new(skill_repo: Arc<S>, grant_store: Arc<G>, share_base_url: &str) -> Self {
        Self {
            skill_repo,
            grant_store,
            share_base_url: share_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 按 id 获取授予详情
    ///
    /// 指定 user_id 且不是授予所有者时，返回与不存在相同的错误
    #[instrument(skip(self))]
    pub async fn get_grant_by_id(
        &self,
        grant_id: i64,
        user_id: Option<&str>,
    ) -> Result<BadgeGrantDetail> {
        let detail = self
            .grant_store
            .get_grant_detail(grant_id)
            .await?
            .ok_or(SkillBadgeError::GrantNotFound(grant_id))?;

        match user_id {
            Some(user_id) if detail.grant.user_id != user_id.trim() => {
                debug!(grant_id, "授予不属于请求用户");
                Err(SkillBadgeError::GrantNotFound(grant_id))
            }
            _ => Ok(detail),
        }
    }

    /// 列出用户的授予，可按等级名称过滤
    #[instrument(skip(self))]
    pub async fn list_grants_for_user(
        &self,
        user_id: &str,
        tier_filter: Option<&str>,
    ) -> Result<Vec<BadgeGrantDetail>> {
        let user_id = Self::require_user(user_id)?;
        let filter = match tier_filter {
            Some(raw) => GrantFilter::by_tier(raw.parse::<TierName>()?),
            None => GrantFilter::default(),
        };

        self.grant_store.list_grant_details(user_id, &filter).await
    }

    /// 列出用户在某技能下的授予
    #[instrument(skip(self))]
    pub async fn list_grants_for_user_by_skill(
        &self,
        user_id: &str,
        skill_id: i64,
    ) -> Result<Vec<BadgeGrantDetail>> {
        let user_id = Self::require_user(user_id)?;
        if !self.skill_repo.skill_exists(skill_id).await? {
            return Err(SkillBadgeError::SkillNotFound(skill_id));
        }

        self.grant_store
            .list_grant_details(user_id, &GrantFilter::by_skill(skill_id))
            .await
    }

    /// 生成分享链接，只有授予所有者可以分享
    #[instrument(skip(self))]
    pub async fn share_grant(&self, grant_id: i64, user_id: &str) -> Result<ShareLink> {
        let user_id = Self::require_user(user_id)?;
        if !user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
        {
            return Err(SkillBadgeError::Validation(format!(
                "user_id contains characters that are not URL-safe: {}",
                user_id
            )));
        }

        let detail = self.get_grant_by_id(grant_id, Some(user_id)).await?;

        Ok(ShareLink {
            grant_id: detail.id(),
            user_id: user_id.to_string(),
            url: format!(
                "{}/api/share-badge/{}?user={}",
                self.share_base_url,
                detail.id(),
                user_id
            ),
        })
    }

    fn require_user(user_id: &str) -> Result<&str> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(SkillBadgeError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }
        Ok(user_id)
    }
}
