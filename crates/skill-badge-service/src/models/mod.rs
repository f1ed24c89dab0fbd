//! 技能徽章领域模型
//!
//! 包含技能、徽章等级、测评记录、徽章授予等核心实体定义

pub mod attempt;
pub mod enums;
pub mod grant;
pub mod skill;
pub mod tier;

pub use attempt::{AssessmentAttempt, UserSummary};
pub use enums::{AttemptStatus, TierName};
pub use grant::{BadgeGrant, BadgeGrantDetail, GrantWrite, NewBadgeGrant};
pub use skill::Skill;
pub use tier::{BadgeTier, NewBadgeTier};
