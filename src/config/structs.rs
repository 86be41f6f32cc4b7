use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub clock: ClockConfig,
    pub submissions: SubmissionConfig,
    pub snapshots: SnapshotConfig,
    pub cors: CorsConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// 上游 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    // http 或 memory
    pub backend: String,
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

/// 时钟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    pub tick_interval_ms: u64,
    // 为空时使用本机时区
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// 提交配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    pub default_file_size_limit_mb: u64,
}

/// 学生视图快照缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    // 秒
    pub ttl: u64,
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub max_age: usize,
}
