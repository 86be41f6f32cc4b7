//! 上游 REST API 客户端
//!
//! 活动、提交与统计数据都由外部后端拥有，本服务只读取快照并转发提交。
//! - `http`: 基于 reqwest 的实现
//! - `memory`: 内存实现，用于开发和测试

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{DashboardError, Result};
use crate::models::activities::{entities::Activity, requests::ActivityListQuery};
use crate::models::analytics::responses::Analytics;
use crate::models::submissions::{
    entities::Submission,
    requests::{CreateSubmission, SubmissionListQuery},
};

pub mod http;
pub mod memory;

pub use http::HttpDashboardApi;
pub use memory::MemoryDashboardApi;

/// 发起请求的用户身份，由网关注入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub student_id: Option<String>,
    // 原样转发给上游
    pub bearer_token: Option<String>,
}

impl Caller {
    pub fn student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            bearer_token: None,
        }
    }

    pub fn require_student_id(&self) -> Result<&str> {
        self.student_id
            .as_deref()
            .ok_or_else(|| DashboardError::authentication("Missing student identity"))
    }
}

#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// 实现名称
    fn backend_name(&self) -> &'static str;

    // 列出活动
    async fn list_activities(
        &self,
        caller: &Caller,
        query: ActivityListQuery,
    ) -> Result<Vec<Activity>>;

    // 列出提交
    async fn list_submissions(
        &self,
        caller: &Caller,
        query: SubmissionListQuery,
    ) -> Result<Vec<Submission>>;

    // 创建提交
    async fn create_submission(
        &self,
        caller: &Caller,
        request: CreateSubmission,
    ) -> Result<Submission>;

    // 获取统计数据
    async fn get_analytics(
        &self,
        caller: &Caller,
        event_id: Option<String>,
        time_range_days: u32,
    ) -> Result<Analytics>;
}

pub async fn create_api_client(config: &AppConfig) -> Result<Arc<dyn DashboardApi>> {
    match config.upstream.backend.as_str() {
        "http" => Ok(Arc::new(HttpDashboardApi::from_config(config)?)),
        "memory" => Ok(Arc::new(MemoryDashboardApi::new())),
        other => Err(DashboardError::configuration(format!(
            "Unknown upstream backend '{other}', expected 'http' or 'memory'"
        ))),
    }
}
