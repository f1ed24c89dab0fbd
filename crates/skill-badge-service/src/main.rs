//! 技能徽章服务
//!
//! HTTP 服务入口：加载配置、初始化可观测性和数据库，启动 axum。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use skill_badge_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use skill_badge::http::{AppState, Repositories, create_router};
use skill_badge::notification::{self, NotificationDispatcher};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载配置，失败时使用默认值
    let config = AppConfig::load("skill-badge-service").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    // 2. 初始化可观测性
    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting skill-badge-service...");
    info!(environment = %config.environment, "Configuration loaded");

    // 3. 初始化数据库连接
    let db = Database::connect(&config.database).await?;
    info!("Database connection established");

    if config.database.run_migrations {
        db.run_migrations(&MIGRATOR).await?;
    }

    // 4. 通知投递队列
    let (dispatcher, worker_handle) = match notification::build_dispatcher(&config.notification)? {
        Some((dispatcher, worker)) => {
            info!(channel = dispatcher.channel_name(), "Notification worker started");
            let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(dispatcher);
            (Some(dispatcher), Some(worker.spawn()))
        }
        None => {
            warn!("Notifications disabled");
            (None, None)
        }
    };

    // 5. 仓储与服务
    let repos = Repositories::postgres(db.pool().clone());
    let state =
        AppState::new(repos, dispatcher, &config.share.base_url).with_database(db.clone());

    let app = create_router(
        state,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 路由释放后发送端全部关闭，等待队列中的通知投递完
    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
