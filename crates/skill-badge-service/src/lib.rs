//! 技能徽章服务
//!
//! 按技能定义分数区间等级，用户测评完成后按分数授予对应徽章。
//!
//! ## 核心功能
//!
//! - **等级目录**：定义 beginner / intermediate / expert 分数区间，解析分数到等级
//! - **徽章授予**：按测评记录幂等授予，同一测评最多一条授予
//! - **徽章查询**：按用户、等级、技能查询授予详情，生成分享链接
//! - **通知交接**：新授予交给后台队列投递，失败不影响授予
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: PostgreSQL 仓储与内存存储
//! - `service`: 业务服务层
//! - `notification`: 通知交接与投递渠道
//! - `http`: axum 接口层

pub mod error;
pub mod http;
pub mod models;
pub mod notification;
pub mod repository;
pub mod service;

pub use error::{ErrorKind, Result, SkillBadgeError};
pub use models::*;
pub use notification::{BadgeNotification, NotificationDispatcher, QueuedDispatcher};
pub use repository::{
    AttemptRepository, GrantFilter, GrantRepository, MemoryStore, SkillRepository, TierRepository,
};
pub use service::{
    AssignBadgeResponse, AssignmentService, BadgeQueryService, NotificationOutcome, ShareLink,
    TierCatalogService, TierResolution, resolve_tier,
};
