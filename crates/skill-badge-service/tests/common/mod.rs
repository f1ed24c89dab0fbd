//! 集成测试公共辅助
//!
//! 基于内存存储构建与生产相同的服务组合

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use skill_badge::http::{AppState, Repositories};
use skill_badge::notification::NotificationDispatcher;
use skill_badge::repository::GrantStoreTrait;
use skill_badge::{
    AssessmentAttempt, AttemptStatus, BadgeGrant, BadgeGrantDetail, GrantFilter, GrantWrite,
    MemoryStore, NewBadgeGrant, Result, Skill, UserSummary,
};

pub const SHARE_BASE_URL: &str = "https://badges.example.com";

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_dispatcher(dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self::build(Some(dispatcher))
    }

    /// 授予查询后让出执行权，使并发授予在写入前交错
    pub fn with_interleaved_grants() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mut repos = Repositories::memory(store.clone());
        repos.grants = Arc::new(YieldingGrantStore {
            inner: store.clone(),
        });
        let state = AppState::new(repos, None, SHARE_BASE_URL);
        Self { store, state }
    }

    fn build(dispatcher: Option<Arc<dyn NotificationDispatcher>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            Repositories::memory(store.clone()),
            dispatcher,
            SHARE_BASE_URL,
        );
        Self { store, state }
    }

    pub fn skill(&self, name: &str) -> Skill {
        self.store.insert_skill(name)
    }

    pub fn completed_attempt(&self, user_id: &str, skill_id: i64, score: i32) -> AssessmentAttempt {
        self.store
            .insert_attempt(user_id, skill_id, score, AttemptStatus::Complete)
    }

    /// 指定 id 的测评记录
    pub fn attempt_with_id(
        &self,
        id: i64,
        user_id: &str,
        skill_id: i64,
        score: i32,
        status: AttemptStatus,
    ) -> AssessmentAttempt {
        let attempt = AssessmentAttempt {
            id,
            user_id: Some(user_id.to_string()),
            assessment_id: 1000 + id,
            skill_id,
            score,
            status,
            submitted_at: Some(Utc::now()),
        };
        self.store.insert_attempt_record(attempt.clone());
        attempt
    }

    pub fn user(&self, id: &str, first_name: &str, last_name: &str) {
        self.store.insert_user(UserSummary {
            id: id.to_string(),
            username: Some(id.to_string()),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            email: Some(format!("{}@example.com", id)),
        });
    }

    /// 定义三档标准等级：0-50 / 51-80 / 81-100
    pub async fn standard_tiers(&self, skill_id: i64) {
        let catalog = &self.state.catalog;
        catalog
            .define_tier(skill_id, "beginner", 0, 50)
            .await
            .unwrap();
        catalog
            .define_tier(skill_id, "intermediate", 51, 80)
            .await
            .unwrap();
        catalog
            .define_tier(skill_id, "expert", 81, 100)
            .await
            .unwrap();
    }
}

/// 在 `get_grant_by_attempt` 之后让出执行权的授予存储
struct YieldingGrantStore {
    inner: Arc<MemoryStore>,
}

#[async_trait]
impl GrantStoreTrait for YieldingGrantStore {
    async fn get_grant_by_attempt(&self, attempt_id: i64) -> Result<Option<BadgeGrant>> {
        let found = GrantStoreTrait::get_grant_by_attempt(self.inner.as_ref(), attempt_id).await;
        tokio::task::yield_now().await;
        found
    }

    async fn insert_grant(&self, grant: &NewBadgeGrant) -> Result<GrantWrite> {
        GrantStoreTrait::insert_grant(self.inner.as_ref(), grant).await
    }

    async fn get_grant_detail(&self, grant_id: i64) -> Result<Option<BadgeGrantDetail>> {
        GrantStoreTrait::get_grant_detail(self.inner.as_ref(), grant_id).await
    }

    async fn list_grant_details(
        &self,
        user_id: &str,
        filter: &GrantFilter,
    ) -> Result<Vec<BadgeGrantDetail>> {
        GrantStoreTrait::list_grant_details(self.inner.as_ref(), user_id, filter).await
    }
}
