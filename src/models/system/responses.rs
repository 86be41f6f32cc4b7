use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub system_name: String,    // 系统名称
    pub version: String,        // 版本号
    pub environment: String,    // 运行环境
    pub upstream_backend: String, // 上游 API 实现
    pub uptime_seconds: i64,    // 运行时长
}
