//! 技能徽章服务错误类型
//!
//! 定义服务层的业务错误和系统错误，并归入五类错误种类

use thiserror::Error;

/// 错误种类
///
/// 对外只暴露种类和可读原因，具体变体留给日志和错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 请求数据格式错误或越界，调用方可修正
    InvalidInput,
    /// 引用的技能、等级、测评或授予不存在
    NotFound,
    /// 重复定义或与已有授予冲突
    Conflict,
    /// 测评状态不允许评定徽章
    InvalidState,
    /// 持久化或基础设施故障
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::NotFound => "NotFound",
            Self::Conflict => "Conflict",
            Self::InvalidState => "InvalidState",
            Self::Internal => "Internal",
        }
    }
}

/// 技能徽章服务错误类型
#[derive(Debug, Error)]
pub enum SkillBadgeError {
    // === 资源不存在 ===
    #[error("技能不存在: {0}")]
    SkillNotFound(i64),

    #[error("徽章等级不存在: {0}")]
    TierNotFound(i64),

    #[error("测评记录不存在: {0}")]
    AttemptNotFound(i64),

    #[error("徽章授予不存在: {0}")]
    GrantNotFound(i64),

    #[error("no badge threshold matches this score: skill_id={skill_id}, score={score}")]
    NoMatchingTier { skill_id: i64, score: i32 },

    // === 校验与冲突 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("tier already exists for this skill: skill_id={skill_id}, name={name}")]
    TierAlreadyExists { skill_id: i64, name: String },

    #[error("测评已为其他用户授予徽章: attempt_id={attempt_id}, grant_id={grant_id}")]
    GrantConflict { attempt_id: i64, grant_id: i64 },

    // === 状态错误 ===
    #[error(
        "assessment is not eligible for badge assignment: attempt_id={attempt_id}, status={status}"
    )]
    AttemptNotEligible { attempt_id: i64, status: String },

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 技能徽章服务 Result 类型别名
pub type Result<T> = std::result::Result<T, SkillBadgeError>;

impl SkillBadgeError {
    /// 归入错误种类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::InvalidInput,
            Self::SkillNotFound(_)
            | Self::TierNotFound(_)
            | Self::AttemptNotFound(_)
            | Self::GrantNotFound(_)
            | Self::NoMatchingTier { .. } => ErrorKind::NotFound,
            Self::TierAlreadyExists { .. } | Self::GrantConflict { .. } => ErrorKind::Conflict,
            Self::AttemptNotEligible { .. } => ErrorKind::InvalidState,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// 检查是否为可重试的错误
    ///
    /// 服务层本身不重试，由调用方决定
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut) | Self::Database(sqlx::Error::Io(_))
        )
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SkillNotFound(_) => "SKILL_NOT_FOUND",
            Self::TierNotFound(_) => "TIER_NOT_FOUND",
            Self::AttemptNotFound(_) => "ATTEMPT_NOT_FOUND",
            Self::GrantNotFound(_) => "GRANT_NOT_FOUND",
            Self::NoMatchingTier { .. } => "NO_MATCHING_TIER",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::TierAlreadyExists { .. } => "TIER_ALREADY_EXISTS",
            Self::GrantConflict { .. } => "GRANT_CONFLICT",
            Self::AttemptNotEligible { .. } => "ATTEMPT_NOT_ELIGIBLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 数据库唯一约束冲突（PostgreSQL 23505）
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}
