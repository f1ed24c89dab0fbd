//! 共享库
//!
//! 包含技能徽章服务使用的配置、基础设施错误、数据库连接、可观测性等基础代码。

pub mod config;
pub mod database;
pub mod error;
pub mod observability;
