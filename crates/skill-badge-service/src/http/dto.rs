//! HTTP 请求体定义
//!
//! 字段使用 camelCase，同时兼容旧客户端的 snake_case

use serde::Deserialize;
use validator::Validate;

/// 定义徽章等级
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DefineTierRequest {
    #[serde(alias = "skill_id")]
    #[validate(range(min = 1, message = "skillId 必须为正数"))]
    pub skill_id: i64,
    #[validate(length(min = 1, max = 32, message = "name 长度必须在 1-32 之间"))]
    pub name: String,
    #[serde(alias = "min_score")]
    pub min_score: i32,
    #[serde(alias = "max_score")]
    pub max_score: i32,
}

/// 为调用方授予徽章
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignBadgeRequest {
    #[serde(alias = "attempt_id", alias = "assessment_id")]
    #[validate(range(min = 1, message = "attemptId 必须为正数"))]
    pub attempt_id: i64,
}

/// 列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct GrantListQuery {
    /// 等级名称过滤，大小写不敏感
    pub tier: Option<String>,
}
