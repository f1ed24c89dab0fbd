//! 业务服务层
//!
//! - `TierCatalogService`: 等级定义与分数解析
//! - `AssignmentService`: 按测评幂等授予徽章
//! - `BadgeQueryService`: 授予查询与分享

mod assignment;
pub mod dto;
mod query_service;
mod tier_catalog;

pub use assignment::AssignmentService;
pub use dto::{AssignBadgeResponse, NotificationOutcome, ShareLink};
pub use query_service::BadgeQueryService;
pub use tier_catalog::{TierCatalogService, TierResolution, resolve_tier};
