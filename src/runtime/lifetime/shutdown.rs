use std::sync::Arc;

use tokio::signal;
use tracing::{error, warn};

use crate::runtime::clock::ClockTicker;

pub async fn listen_for_shutdown(ticker: Arc<ClockTicker>) {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");

    // 停止时钟广播，SSE 订阅随之结束
    ticker.stop();
}
