//! 调用方识别
//!
//! 身份认证在网关完成，这里只读取透传的用户 id

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;

/// 调用方用户 id 请求头
pub const CALLER_HEADER: &str = "x-user-id";

/// 调用方用户 id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

impl CallerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CallerId(v.to_string()))
            .ok_or_else(|| ApiError::Unauthorized("缺少 X-User-Id 请求头".to_string()))
    }
}
