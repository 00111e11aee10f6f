pub mod handlers;

use crate::config::{DeployInfo, ProviderConfig};
use crate::templates::Templates;
use crate::Result;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// 服务器共享状态，启动时构建一次，处理器只读
pub struct AppState {
    pub config: ProviderConfig,
    pub deploy: DeployInfo,
    pub templates: Templates,
}

/// 启动 HTTP 服务器（带优雅关闭）
pub async fn start_server(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        "landing-zone-demo 服务器运行在 http://{}（提供商: {}）",
        addr,
        state.config.provider.name()
    );

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(());

    // 信号监听放到独立任务，接受循环同时服务请求
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    loop {
        tokio::select! {
            // 等待新连接
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let io = TokioIo::new(stream);
                        let state = Arc::clone(&state);

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let state = Arc::clone(&state);
                                handlers::handle_request(req, state)
                            });

                            if let Err(e) =
                                http1::Builder::new().serve_connection(io, service).await
                            {
                                error!("服务连接错误: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("接受连接失败: {}", e);
                    }
                }
            }
            // 等待关闭信号
            _ = shutdown_rx.changed() => {
                info!("收到关闭信号，停止接受新连接");
                break;
            }
        }
    }

    info!("服务器已优雅关闭");
    Ok(())
}

/// 等待 SIGTERM 或 Ctrl+C
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        let sigterm = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("设置 SIGTERM 信号处理失败")
                .recv()
                .await;
        };

        let sigint = async {
            signal::ctrl_c().await.expect("设置 Ctrl+C 信号处理失败");
        };

        tokio::select! {
            _ = sigterm => {
                warn!("收到 SIGTERM 信号，开始优雅关闭...");
            }
            _ = sigint => {
                warn!("收到 Ctrl+C 信号，开始优雅关闭...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.expect("设置 Ctrl+C 信号处理失败");
        warn!("收到 Ctrl+C 信号，开始优雅关闭...");
    }
}
