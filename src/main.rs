//! StoryGen Backend
//!
//! 加载配置 → 初始化日志 → 装配流水线 → 启动 HTTP/WebSocket 服务

use storygen::config::{load_config, print_config, AppConfig};
use storygen::infrastructure::build_story_pipeline;
use storygen::infrastructure::http::{AppState, HttpServer, ServerConfig};
use std::sync::Arc;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},storygen={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：PORT > 环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("StoryGen Backend v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let pipeline = Arc::new(build_story_pipeline(&config));

    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    let static_files = &config.server.static_files;
    if static_files.enabled {
        if static_files.dir.is_dir() {
            server_config =
                server_config.with_static_files(static_files.dir.clone(), &static_files.path);
        } else {
            tracing::warn!(
                dir = %static_files.dir.display(),
                "Static files directory not found, frontend will not be served"
            );
        }
    }

    let server = HttpServer::new(server_config, AppState::new(pipeline));

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
