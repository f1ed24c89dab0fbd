//! 徽章通知
//!
//! 授予成功后把通知交给投递队列，由后台任务通过渠道投递。
//! 投递是尽力而为的：入队失败只作为软告警返回，投递失败只记日志。

mod channels;
mod queue;

pub use channels::{LogChannel, NotificationChannel, WebhookChannel};
pub use queue::{NotificationWorker, QueuedDispatcher};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skill_badge_shared::config::NotificationConfig;

use crate::error::Result;
use crate::models::{BadgeGrantDetail, TierName};

/// 徽章获得通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeNotification {
    /// 收件人展示名
    pub recipient: String,
    pub user_id: String,
    pub grant_id: i64,
    pub tier_name: TierName,
    pub skill_name: String,
}

impl BadgeNotification {
    pub fn from_detail(detail: &BadgeGrantDetail) -> Self {
        let recipient = detail
            .user
            .as_ref()
            .map(|user| user.display_name())
            .unwrap_or_else(|| detail.grant.user_id.clone());

        Self {
            recipient,
            user_id: detail.grant.user_id.clone(),
            grant_id: detail.grant.id,
            tier_name: detail.tier.name,
            skill_name: detail.skill.name.clone(),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "恭喜 {} 获得「{}」{} 徽章",
            self.recipient, self.skill_name, self.tier_name
        )
    }
}

/// 通知交接接口
///
/// 只负责交接，不等待投递结果
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, notification: BadgeNotification) -> Result<()>;
}

/// 按配置创建投递队列
///
/// 配置了 webhook_url 时走 Webhook，否则只写日志；通知关闭时返回 None
pub fn build_dispatcher(
    config: &NotificationConfig,
) -> Result<Option<(QueuedDispatcher, NotificationWorker)>> {
    if !config.enabled {
        return Ok(None);
    }

    let channel: Arc<dyn NotificationChannel> = match &config.webhook_url {
        Some(url) if !url.trim().is_empty() => Arc::new(WebhookChannel::new(
            url.trim(),
            Duration::from_millis(config.timeout_ms),
        )?),
        _ => Arc::new(LogChannel),
    };

    Ok(Some(QueuedDispatcher::new(config.queue_capacity, channel)))
}
