//! 应用状态定义
//!
//! 服务以 trait 对象实例化，PostgreSQL 与内存存储共用同一套路由

use std::sync::Arc;

use skill_badge_shared::database::Database;
use sqlx::PgPool;

use crate::notification::NotificationDispatcher;
use crate::repository::{
    AttemptReaderTrait, AttemptRepository, GrantRepository, GrantStoreTrait, MemoryStore,
    SkillRepository, SkillRepositoryTrait, TierRepository, TierRepositoryTrait,
};
use crate::service::{AssignmentService, BadgeQueryService, TierCatalogService};

pub type CatalogService = TierCatalogService<dyn SkillRepositoryTrait, dyn TierRepositoryTrait>;
pub type GrantAssignmentService = AssignmentService<
    dyn AttemptReaderTrait,
    dyn SkillRepositoryTrait,
    dyn TierRepositoryTrait,
    dyn GrantStoreTrait,
>;
pub type QueryService = BadgeQueryService<dyn SkillRepositoryTrait, dyn GrantStoreTrait>;

/// 服务依赖的全部仓储
#[derive(Clone)]
pub struct Repositories {
    pub skills: Arc<dyn SkillRepositoryTrait>,
    pub tiers: Arc<dyn TierRepositoryTrait>,
    pub attempts: Arc<dyn AttemptReaderTrait>,
    pub grants: Arc<dyn GrantStoreTrait>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            skills: Arc::new(SkillRepository::new(pool.clone())),
            tiers: Arc::new(TierRepository::new(pool.clone())),
            attempts: Arc::new(AttemptRepository::new(pool.clone())),
            grants: Arc::new(GrantRepository::new(pool)),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            skills: store.clone(),
            tiers: store.clone(),
            attempts: store.clone(),
            grants: store,
        }
    }
}

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub assignment: Arc<GrantAssignmentService>,
    pub query: Arc<QueryService>,
    /// 内存存储运行时为 None，`/health` 只做存活检查
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        dispatcher: Option<Arc<dyn NotificationDispatcher>>,
        share_base_url: &str,
    ) -> Self {
        let catalog = Arc::new(TierCatalogService::new(
            repos.skills.clone(),
            repos.tiers.clone(),
        ));

        let mut assignment =
            AssignmentService::new(repos.attempts.clone(), catalog.clone(), repos.grants.clone());
        if let Some(dispatcher) = dispatcher {
            assignment = assignment.with_dispatcher(dispatcher);
        }

        let query = BadgeQueryService::new(repos.skills, repos.grants, share_base_url);

        Self {
            catalog,
            assignment: Arc::new(assignment),
            query: Arc::new(query),
            database: None,
        }
    }

    /// `/health` 同时探测数据库
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }
}
