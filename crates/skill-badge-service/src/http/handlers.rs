//! HTTP 处理器
//!
//! 每个处理器只做解析与响应封装，对应服务层的一个操作

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::{info, warn};
use validator::Validate;

use super::dto::{AssignBadgeRequest, DefineTierRequest, GrantListQuery};
use super::error::{ApiError, ApiResponse};
use super::extract::CallerId;
use super::state::AppState;
use crate::models::{BadgeGrantDetail, BadgeTier};
use crate::service::{AssignBadgeResponse, ShareLink};

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 健康检查
///
/// GET /health
///
/// 连接了数据库时执行一次探测，失败返回 503
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    let Some(db) = &state.database else {
        return (StatusCode::OK, "OK");
    };

    match db.health_check().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!(error = %e, code = e.code(), "健康检查失败");
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}

/// 定义徽章等级
///
/// POST /api/badges
pub async fn define_tier(
    State(state): State<AppState>,
    body: Result<Json<DefineTierRequest>, JsonRejection>,
) -> ApiResult<BadgeTier> {
    let Json(req) = body?;
    req.validate()?;

    let tier = state
        .catalog
        .define_tier(req.skill_id, &req.name, req.min_score, req.max_score)
        .await?;

    info!(tier_id = tier.id, skill_id = tier.skill_id, "创建徽章等级");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tier))))
}

/// 列出技能下的等级
///
/// GET /api/skills/{skill_id}/badges
pub async fn list_skill_tiers(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<BadgeTier>> {
    let Path(skill_id) = path?;
    ok(state.catalog.list_tiers_for_skill(skill_id).await?)
}

/// 为调用方授予徽章
///
/// POST /api/user/badges
///
/// 新建返回 201，该测评已授予过返回 200
pub async fn assign_badge(
    State(state): State<AppState>,
    caller: CallerId,
    body: Result<Json<AssignBadgeRequest>, JsonRejection>,
) -> ApiResult<AssignBadgeResponse> {
    let Json(req) = body?;
    req.validate()?;

    let resp = state
        .assignment
        .assign_badge(caller.as_str(), req.attempt_id)
        .await?;

    let status = if resp.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::success(resp))))
}

/// 列出调用方的授予
///
/// GET /api/user/badges?tier=expert
pub async fn list_my_grants(
    State(state): State<AppState>,
    caller: CallerId,
    query: Result<Query<GrantListQuery>, QueryRejection>,
) -> ApiResult<Vec<BadgeGrantDetail>> {
    let Query(query) = query?;
    ok(state
        .query
        .list_grants_for_user(caller.as_str(), query.tier.as_deref())
        .await?)
}

/// 获取调用方的单个授予
///
/// GET /api/user/badges/{grant_id}
pub async fn get_my_grant(
    State(state): State<AppState>,
    caller: CallerId,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<BadgeGrantDetail> {
    let Path(grant_id) = path?;
    ok(state
        .query
        .get_grant_by_id(grant_id, Some(caller.as_str()))
        .await?)
}

/// 列出调用方在某技能下的授予
///
/// GET /api/user/badges/skill/{skill_id}
pub async fn list_my_grants_by_skill(
    State(state): State<AppState>,
    caller: CallerId,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<BadgeGrantDetail>> {
    let Path(skill_id) = path?;
    ok(state
        .query
        .list_grants_for_user_by_skill(caller.as_str(), skill_id)
        .await?)
}

/// 生成分享链接
///
/// POST /api/user/badges/{grant_id}/share
pub async fn share_grant(
    State(state): State<AppState>,
    caller: CallerId,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<ShareLink> {
    let Path(grant_id) = path?;
    ok(state.query.share_grant(grant_id, caller.as_str()).await?)
}
