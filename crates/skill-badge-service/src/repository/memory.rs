//! 内存存储
//!
//! 在一把锁下实现全部仓储接口，保证与数据库相同的唯一性约束，
//! 用于集成测试和无数据库的本地开发。

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use super::traits::{
    AttemptReaderTrait, GrantFilter, GrantStoreTrait, SkillRepositoryTrait, TierRepositoryTrait,
};
use crate::error::{Result, SkillBadgeError};
use crate::models::{
    AssessmentAttempt, AttemptStatus, BadgeGrant, BadgeGrantDetail, BadgeTier, GrantWrite,
    NewBadgeGrant, NewBadgeTier, Skill, TierName, UserSummary,
};

#[derive(Default)]
struct MemoryState {
    skills: BTreeMap<i64, Skill>,
    tiers: BTreeMap<i64, BadgeTier>,
    attempts: BTreeMap<i64, AssessmentAttempt>,
    users: HashMap<String, UserSummary>,
    grants: BTreeMap<i64, BadgeGrant>,
    next_id: i64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// 严格递增的时间戳，同一微秒内的写入也能区分先后
    fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp.filter(|last| now <= *last) {
            now = last + Duration::microseconds(1);
        }
        self.last_timestamp = Some(now);
        now
    }

    fn detail(&self, grant: &BadgeGrant) -> Result<BadgeGrantDetail> {
        let tier = self.tiers.get(&grant.tier_id).ok_or_else(|| {
            SkillBadgeError::Internal(format!("授予引用的等级不存在: tier_id={}", grant.tier_id))
        })?;
        let skill = self.skills.get(&tier.skill_id).ok_or_else(|| {
            SkillBadgeError::Internal(format!("等级引用的技能不存在: skill_id={}", tier.skill_id))
        })?;
        let attempt = self.attempts.get(&grant.attempt_id).ok_or_else(|| {
            SkillBadgeError::Internal(format!(
                "授予引用的测评不存在: attempt_id={}",
                grant.attempt_id
            ))
        })?;

        Ok(BadgeGrantDetail {
            grant: grant.clone(),
            tier: tier.clone(),
            skill: skill.clone(),
            attempt: attempt.clone(),
            user: self.users.get(&grant.user_id).cloned(),
        })
    }
}

/// 内存仓储
///
/// 同时实现技能、等级、测评、授予四个仓储接口
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_grant_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === 测试数据准备 ===

    /// 写入技能
    pub fn insert_skill(&self, name: &str) -> Skill {
        let mut state = self.state.lock();
        let id = state.next_id();
        let now = state.now();
        let skill = Skill {
            id,
            name: name.to_string(),
            description: None,
            parent_skill_id: None,
            created_at: now,
            updated_at: now,
        };
        state.skills.insert(id, skill.clone());
        skill
    }

    /// 写入测评提交记录
    pub fn insert_attempt(
        &self,
        user_id: &str,
        skill_id: i64,
        score: i32,
        status: AttemptStatus,
    ) -> AssessmentAttempt {
        let mut state = self.state.lock();
        let assessment_id = state.next_id();
        let id = state.next_id();
        let submitted_at = state.now();
        let attempt = AssessmentAttempt {
            id,
            user_id: Some(user_id.to_string()),
            assessment_id,
            skill_id,
            score,
            status,
            submitted_at: Some(submitted_at),
        };
        state.attempts.insert(id, attempt.clone());
        attempt
    }

    /// 按给定 id 写入测评记录，后续自动分配的 id 从更大的值开始
    pub fn insert_attempt_record(&self, attempt: AssessmentAttempt) {
        let mut state = self.state.lock();
        state.next_id = state.next_id.max(attempt.id);
        state.attempts.insert(attempt.id, attempt);
    }

    /// 写入用户资料
    pub fn insert_user(&self, user: UserSummary) {
        self.state.lock().users.insert(user.id.clone(), user);
    }

    /// 打开后所有授予写入返回数据库错误
    pub fn set_fail_grant_writes(&self, fail: bool) {
        self.fail_grant_writes.store(fail, Ordering::SeqCst);
    }

    pub fn grant_count(&self) -> usize {
        self.state.lock().grants.len()
    }

    pub fn tier_count(&self) -> usize {
        self.state.lock().tiers.len()
    }

    // === 仓储操作 ===

    pub fn skill_exists(&self, skill_id: i64) -> bool {
        self.state.lock().skills.contains_key(&skill_id)
    }

    pub fn get_skill(&self, skill_id: i64) -> Option<Skill> {
        self.state.lock().skills.get(&skill_id).cloned()
    }

    pub fn create_tier(&self, tier: &NewBadgeTier) -> Result<BadgeTier> {
        let mut state = self.state.lock();
        let duplicate = state
            .tiers
            .values()
            .any(|t| t.skill_id == tier.skill_id && t.name == tier.name);
        if duplicate {
            return Err(SkillBadgeError::TierAlreadyExists {
                skill_id: tier.skill_id,
                name: tier.name.to_string(),
            });
        }

        let id = state.next_id();
        let now = state.now();
        let created = BadgeTier {
            id,
            skill_id: tier.skill_id,
            name: tier.name,
            min_score: tier.min_score,
            max_score: tier.max_score,
            created_at: now,
            updated_at: now,
        };
        state.tiers.insert(id, created.clone());
        Ok(created)
    }

    pub fn get_tier(&self, id: i64) -> Option<BadgeTier> {
        self.state.lock().tiers.get(&id).cloned()
    }

    pub fn find_tier_by_name(&self, skill_id: i64, name: TierName) -> Option<BadgeTier> {
        self.state
            .lock()
            .tiers
            .values()
            .find(|t| t.skill_id == skill_id && t.name == name)
            .cloned()
    }

    pub fn list_tiers_by_skill(&self, skill_id: i64) -> Vec<BadgeTier> {
        self.state
            .lock()
            .tiers
            .values()
            .filter(|t| t.skill_id == skill_id)
            .cloned()
            .collect()
    }

    pub fn get_attempt(&self, attempt_id: i64) -> Option<AssessmentAttempt> {
        self.state.lock().attempts.get(&attempt_id).cloned()
    }

    pub fn get_grant_by_attempt(&self, attempt_id: i64) -> Option<BadgeGrant> {
        self.state
            .lock()
            .grants
            .values()
            .find(|g| g.attempt_id == attempt_id)
            .cloned()
    }

    /// 检查和写入在同一把锁内完成
    pub fn insert_grant(&self, grant: &NewBadgeGrant) -> Result<GrantWrite> {
        if self.fail_grant_writes.load(Ordering::SeqCst) {
            return Err(SkillBadgeError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.state.lock();
        if let Some(existing) = state
            .grants
            .values()
            .find(|g| g.attempt_id == grant.attempt_id)
        {
            return Ok(GrantWrite::Existing(existing.clone()));
        }

        let id = state.next_id();
        let created_at = state.now();
        let created = BadgeGrant {
            id,
            user_id: grant.user_id.clone(),
            tier_id: grant.tier_id,
            attempt_id: grant.attempt_id,
            created_at,
        };
        state.grants.insert(id, created.clone());
        Ok(GrantWrite::Created(created))
    }

    pub fn get_grant_detail(&self, grant_id: i64) -> Result<Option<BadgeGrantDetail>> {
        let state = self.state.lock();
        state
            .grants
            .get(&grant_id)
            .map(|grant| state.detail(grant))
            .transpose()
    }

    pub fn list_grant_details(
        &self,
        user_id: &str,
        filter: &GrantFilter,
    ) -> Result<Vec<BadgeGrantDetail>> {
        let state = self.state.lock();
        let mut details = Vec::new();
        for grant in state.grants.values().filter(|g| g.user_id == user_id) {
            let detail = state.detail(grant)?;
            if filter.matches(&detail) {
                details.push(detail);
            }
        }
        details.sort_by(|a, b| {
            a.grant
                .created_at
                .cmp(&b.grant.created_at)
                .then(a.grant.id.cmp(&b.grant.id))
        });
        Ok(details)
    }
}

#[async_trait]
impl SkillRepositoryTrait for MemoryStore {
    async fn skill_exists(&self, skill_id: i64) -> Result<bool> {
        Ok(MemoryStore::skill_exists(self, skill_id))
    }

    async fn get_skill(&self, skill_id: i64) -> Result<Option<Skill>> {
        Ok(MemoryStore::get_skill(self, skill_id))
    }
}

#[async_trait]
impl TierRepositoryTrait for MemoryStore {
    async fn create_tier(&self, tier: &NewBadgeTier) -> Result<BadgeTier> {
        MemoryStore::create_tier(self, tier)
    }

    async fn get_tier(&self, id: i64) -> Result<Option<BadgeTier>> {
        Ok(MemoryStore::get_tier(self, id))
    }

    async fn tier_exists(&self, id: i64) -> Result<bool> {
        Ok(MemoryStore::get_tier(self, id).is_some())
    }

    async fn find_tier_by_name(&self, skill_id: i64, name: TierName) -> Result<Option<BadgeTier>> {
        Ok(MemoryStore::find_tier_by_name(self, skill_id, name))
    }

    async fn list_tiers_by_skill(&self, skill_id: i64) -> Result<Vec<BadgeTier>> {
        Ok(MemoryStore::list_tiers_by_skill(self, skill_id))
    }
}

#[async_trait]
impl AttemptReaderTrait for MemoryStore {
    async fn get_attempt(&self, attempt_id: i64) -> Result<Option<AssessmentAttempt>> {
        Ok(MemoryStore::get_attempt(self, attempt_id))
    }
}

#[async_trait]
impl GrantStoreTrait for MemoryStore {
    async fn get_grant_by_attempt(&self, attempt_id: i64) -> Result<Option<BadgeGrant>> {
        Ok(MemoryStore::get_grant_by_attempt(self, attempt_id))
    }

    async fn insert_grant(&self, grant: &NewBadgeGrant) -> Result<GrantWrite> {
        MemoryStore::insert_grant(self, grant)
    }

    async fn get_grant_detail(&self, grant_id: i64) -> Result<Option<BadgeGrantDetail>> {
        MemoryStore::get_grant_detail(self, grant_id)
    }

    async fn list_grant_details(
        &self,
        user_id: &str,
        filter: &GrantFilter,
    ) -> Result<Vec<BadgeGrantDetail>> {
        MemoryStore::list_grant_details(self, user_id, filter)
    }
}
