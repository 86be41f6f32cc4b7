pub mod activities;
pub mod analytics;
pub mod common;
pub mod dashboard;
pub mod day_activities;
pub mod submissions;
pub mod system;

pub use common::{ApiResponse, ErrorCode};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
