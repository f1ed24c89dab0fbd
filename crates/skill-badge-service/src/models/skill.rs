//! 技能实体
//!
//! 技能由外部系统维护，本服务只读

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 技能
///
/// 通过 parent_skill_id 形成树形结构，这里不做成环校验，也不假设存在环
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    /// 技能名称
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 父技能 ID，顶层技能为 None
    #[sqlx(default)]
    pub parent_skill_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
