//! HTTP 接口层
//!
//! 只做请求解析、调用方识别和错误映射，业务逻辑全部在服务层

pub mod dto;
pub mod error;
mod extract;
pub mod handlers;
mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use extract::{CALLER_HEADER, CallerId};
pub use routes::create_router;
pub use state::{AppState, Repositories};
