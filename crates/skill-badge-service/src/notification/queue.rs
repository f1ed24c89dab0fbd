//! 通知投递队列
//!
//! 有界 mpsc 队列把请求路径和投递解耦：入队使用 try_send，不阻塞授予流程

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BadgeNotification, NotificationChannel, NotificationDispatcher};
use crate::error::{Result, SkillBadgeError};

/// 队列式通知交接
#[derive(Clone)]
pub struct QueuedDispatcher {
    sender: mpsc::Sender<BadgeNotification>,
    channel_name: String,
}

/// 后台投递任务
///
/// 逐条取出通知交给渠道，所有发送端关闭后退出
pub struct NotificationWorker {
    receiver: mpsc::Receiver<BadgeNotification>,
    channel: Arc<dyn NotificationChannel>,
}

impl QueuedDispatcher {
    /// 创建队列，返回交接端和尚未启动的投递任务
    pub fn new(
        capacity: usize,
        channel: Arc<dyn NotificationChannel>,
    ) -> (Self, NotificationWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let dispatcher = Self {
            sender,
            channel_name: channel.name().to_string(),
        };
        (dispatcher, NotificationWorker { receiver, channel })
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }
}

#[async_trait]
impl NotificationDispatcher for QueuedDispatcher {
    async fn dispatch(&self, notification: BadgeNotification) -> Result<()> {
        match self.sender.try_send(notification) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(n)) => Err(SkillBadgeError::Internal(format!(
                "通知队列已满: grant_id={}",
                n.grant_id
            ))),
            Err(TrySendError::Closed(n)) => Err(SkillBadgeError::Internal(format!(
                "通知队列已关闭: grant_id={}",
                n.grant_id
            ))),
        }
    }
}

impl NotificationWorker {
    pub async fn run(mut self) {
        info!(channel = self.channel.name(), "通知投递任务启动");

        while let Some(notification) = self.receiver.recv().await {
            match self.channel.deliver(&notification).await {
                Ok(()) => {
                    metrics::counter!("badge_notifications_total", "result" => "delivered")
                        .increment(1);
                    debug!(grant_id = notification.grant_id, "通知投递成功");
                }
                Err(e) => {
                    metrics::counter!("badge_notifications_total", "result" => "failed")
                        .increment(1);
                    warn!(
                        grant_id = notification.grant_id,
                        user_id = %notification.user_id,
                        error = %e,
                        "通知投递失败"
                    );
                }
            }
        }

        info!("通知投递任务退出");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
