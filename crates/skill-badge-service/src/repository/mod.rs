//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 唯一性约束（等级名称、测评授予）由数据库保证
//! - 定义 trait 接口以支持 mock 测试，`MemoryStore` 提供进程内实现

mod attempt_repo;
mod grant_repo;
mod memory;
mod skill_repo;
mod tier_repo;
mod traits;

pub use attempt_repo::AttemptRepository;
pub use grant_repo::GrantRepository;
pub use memory::MemoryStore;
pub use skill_repo::SkillRepository;
pub use tier_repo::TierRepository;
pub use traits::*;
