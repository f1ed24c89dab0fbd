//! 通知投递渠道

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::BadgeNotification;
use crate::error::{Result, SkillBadgeError};

/// 通知渠道 trait
///
/// 渠道实现应当是无状态的，便于后台任务重复调用
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志和指标）
    fn name(&self) -> &str;

    async fn deliver(&self, notification: &BadgeNotification) -> Result<()>;
}

/// 日志渠道
///
/// 未配置外部投递时使用，只输出结构化日志
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, notification: &BadgeNotification) -> Result<()> {
        info!(
            user_id = %notification.user_id,
            grant_id = notification.grant_id,
            tier = %notification.tier_name,
            skill = %notification.skill_name,
            "{}",
            notification.message()
        );
        Ok(())
    }
}

/// Webhook 渠道
///
/// 以 JSON POST 通知到配置的地址，非 2xx 视为失败
pub struct WebhookChannel {
    client: reqwest::Client,
    url: String,
}

impl WebhookChannel {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SkillBadgeError::Internal(format!("创建 Webhook 客户端失败: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, notification: &BadgeNotification) -> Result<()> {
        self.client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| SkillBadgeError::Internal(format!("Webhook 投递失败: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TierName;

    fn notification() -> BadgeNotification {
        BadgeNotification {
            recipient: "Ada".to_string(),
            user_id: "u1".to_string(),
            grant_id: 1,
            tier_name: TierName::Beginner,
            skill_name: "Rust".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_channel_always_succeeds() {
        assert!(LogChannel.deliver(&notification()).await.is_ok());
    }

    #[tokio::test]
    async fn test_webhook_unreachable_is_error() {
        let channel =
            WebhookChannel::new("http://127.0.0.1:9/hooks", Duration::from_millis(200)).unwrap();
        assert_eq!(channel.url(), "http://127.0.0.1:9/hooks");

        let err = channel.deliver(&notification()).await.unwrap_err();
        assert!(err.to_string().contains("Webhook"));
    }
}
