use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::{DashboardApi, create_api_client};
use crate::config::AppConfig;
use crate::runtime::clock::{Clock, ClockTicker, SystemClock};

pub struct StartupContext {
    pub api: Arc<dyn DashboardApi>,
    pub clock: Arc<dyn Clock>,
    pub ticker: Arc<ClockTicker>,
}

/// 创建上游客户端
async fn create_api(config: &AppConfig) -> Arc<dyn DashboardApi> {
    warn!(
        "Attempting to create {} upstream client for {}",
        config.upstream.backend,
        config.upstream_base_url()
    );

    let api = create_api_client(config)
        .await
        .expect("Failed to create upstream API client");

    if api.backend_name() == "memory" {
        warn!("Using in-memory upstream, data will not survive a restart");
    }
    api
}

/// 准备服务器启动的上下文
/// 包括上游客户端、时钟和定时广播任务
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();

    let api = create_api(config).await;
    warn!("Upstream client initialized ({})", api.backend_name());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::from_config(config));
    let now = clock.now();
    debug!("Clock initialized at {} (offset {})", now, now.offset());

    let ticker = Arc::new(ClockTicker::spawn(
        clock.clone(),
        Duration::from_millis(config.clock.tick_interval_ms),
    ));
    warn!(
        "Clock ticker started, current phase: {}",
        ticker.latest().phase
    );

    StartupContext { api, clock, ticker }
}
