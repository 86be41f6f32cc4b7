use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, multipart};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Caller, DashboardApi};
use crate::config::AppConfig;
use crate::errors::{DashboardError, Result};
use crate::models::activities::{entities::Activity, requests::ActivityListQuery};
use crate::models::analytics::responses::Analytics;
use crate::models::submissions::{
    entities::Submission,
    requests::{CreateSubmission, SubmissionListQuery, SubmissionPayload},
};

/// 基于 HTTP 的上游 API 客户端
#[derive(Clone)]
pub struct HttpDashboardApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDashboardApi {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.upstream_base_url(),
            Duration::from_millis(config.upstream.request_timeout_ms),
            Duration::from_millis(config.upstream.connect_timeout_ms),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder, caller: &Caller) -> RequestBuilder {
        match &caller.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 检查状态码并读取 JSON
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, &body));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// 从上游错误响应中取出可读信息
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// 将上游状态码映射为业务错误
pub(crate) fn map_error_status(status: StatusCode, body: &str) -> DashboardError {
    let message = extract_message(body)
        .unwrap_or_else(|| format!("Upstream responded with status {}", status.as_u16()));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DashboardError::authentication(message),
        StatusCode::NOT_FOUND => DashboardError::not_found(message),
        s if s.is_server_error() => DashboardError::transport(message),
        _ => DashboardError::upstream_rejected(message),
    }
}

fn decode_list<T>(values: Vec<Value>, decode: fn(Value) -> Result<T>) -> Result<Vec<T>> {
    values.into_iter().map(decode).collect()
}

#[async_trait::async_trait]
impl DashboardApi for HttpDashboardApi {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn list_activities(
        &self,
        caller: &Caller,
        query: ActivityListQuery,
    ) -> Result<Vec<Activity>> {
        debug!("Fetching activities: {:?}", query);
        let request = self
            .authorize(self.client.get(self.url("event-plans")), caller)
            .query(&query);
        let values: Vec<Value> = Self::read_json(request.send().await?).await?;
        decode_list(values, Activity::decode)
    }

    async fn list_submissions(
        &self,
        caller: &Caller,
        query: SubmissionListQuery,
    ) -> Result<Vec<Submission>> {
        debug!("Fetching submissions: {:?}", query);
        let request = self
            .authorize(self.client.get(self.url("submissions")), caller)
            .query(&query);
        let values: Vec<Value> = Self::read_json(request.send().await?).await?;
        decode_list(values, Submission::decode)
    }

    async fn create_submission(
        &self,
        caller: &Caller,
        request: CreateSubmission,
    ) -> Result<Submission> {
        let kind = request.payload.kind();
        let builder = self.authorize(self.client.post(self.url("submissions")), caller);

        let builder = match request.payload {
            SubmissionPayload::Text(content) | SubmissionPayload::Link(content) => {
                builder.json(&serde_json::json!({
                    "eventPlanId": request.event_plan_id,
                    "submissionType": kind,
                    "content": content,
                }))
            }
            SubmissionPayload::File {
                file_name,
                content_type,
                bytes,
            } => {
                let mut part = multipart::Part::bytes(bytes).file_name(file_name);
                if let Some(content_type) = content_type {
                    part = part.mime_str(&content_type)?;
                }
                let form = multipart::Form::new()
                    .text("eventPlanId", request.event_plan_id)
                    .text("submissionType", kind.to_string())
                    .part("file", part);
                builder.multipart(form)
            }
        };

        let response = builder.send().await.inspect_err(|e| {
            warn!("Submission request failed to reach upstream: {}", e);
        })?;
        let value: Value = Self::read_json(response).await?;
        Submission::decode(value)
    }

    async fn get_analytics(
        &self,
        caller: &Caller,
        event_id: Option<String>,
        time_range_days: u32,
    ) -> Result<Analytics> {
        let mut params = vec![("timeRange", time_range_days.to_string())];
        if let Some(event_id) = event_id {
            params.push(("eventId", event_id));
        }
        let request = self
            .authorize(self.client.get(self.url("analytics")), caller)
            .query(&params);
        Self::read_json(request.send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = HttpDashboardApi::new(
            "https://api.example.org/api/",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(api.url("/submissions"), "https://api.example.org/api/submissions");
        assert_eq!(api.url("event-plans"), "https://api.example.org/api/event-plans");
    }

    #[test]
    fn test_error_status_mapping() {
        let err = map_error_status(StatusCode::BAD_REQUEST, r#"{"message":"File too large"}"#);
        assert_eq!(err, DashboardError::upstream_rejected("File too large"));

        let err = map_error_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.code(), "E012");

        let err = map_error_status(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(
            err,
            DashboardError::transport("Upstream responded with status 502")
        );

        let err = map_error_status(StatusCode::NOT_FOUND, r#"{"error":"Plan not found"}"#);
        assert_eq!(err, DashboardError::not_found("Plan not found"));
    }
}
