//! 服务层数据传输对象

use serde::{Deserialize, Serialize};

use crate::models::BadgeGrantDetail;

/// 通知交接结果
///
/// 交接失败不影响授予，只在响应里作为软告警返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NotificationOutcome {
    /// 已交给投递队列
    Sent,
    /// 未发送（非新建授予或未配置通知）
    Skipped,
    /// 授予成功但通知未发出
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// 授予结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignBadgeResponse {
    pub grant: BadgeGrantDetail,
    /// false 表示该测评此前已授予，本次未写入
    pub created: bool,
    pub notification: NotificationOutcome,
}

/// 徽章分享链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub grant_id: i64,
    pub user_id: String,
    pub url: String,
}
