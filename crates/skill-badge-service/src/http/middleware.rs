//! HTTP 请求追踪和指标中间件

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, info_span};

/// 为每个请求创建追踪 span 并记录请求计数
pub async fn http_tracing(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // 使用路由模板，避免 id 造成指标基数膨胀
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let span = info_span!(
        "http_request",
        method = %method,
        route = %route,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();

    span.record("status", status);
    span.record("latency_ms", start.elapsed().as_millis() as i64);

    metrics::counter!(
        "http_requests_total",
        "method" => method,
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);

    response
}
