use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{debug, warn};

use crate::client::{Caller, DashboardApi};
use crate::errors::{DashboardError, Result};
use crate::models::ApiResponse;
use crate::models::analytics::{requests::AnalyticsQuery, responses::Analytics};

pub struct AnalyticsService {
    api: Option<Arc<dyn DashboardApi>>,
}

impl AnalyticsService {
    pub fn new_lazy() -> Self {
        Self { api: None }
    }

    pub(crate) fn get_api(&self, request: &HttpRequest) -> Arc<dyn DashboardApi> {
        if let Some(api) = &self.api {
            api.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn DashboardApi>>>()
                .expect("DashboardApi not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 获取统计数据
    pub async fn get_analytics(
        &self,
        request: &HttpRequest,
        caller: Caller,
        query: AnalyticsQuery,
    ) -> ActixResult<HttpResponse> {
        let api = self.get_api(request);
        match fetch_analytics(api.as_ref(), &caller, &query).await {
            Ok(analytics) => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(analytics, "Query successful")))
            }
            Err(e) => {
                warn!("Failed to load analytics: {}", e);
                Ok(ApiResponse::<()>::from_error(&e))
            }
        }
    }
}

pub async fn fetch_analytics(
    api: &dyn DashboardApi,
    caller: &Caller,
    query: &AnalyticsQuery,
) -> Result<Analytics> {
    let (event_id, days) = query.normalized().map_err(DashboardError::validation)?;
    debug!("Fetching analytics for event {:?} over {} days", event_id, days);
    api.get_analytics(caller, event_id, days).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryDashboardApi;

    #[tokio::test]
    async fn test_rejects_unsupported_range_before_upstream() {
        let api = MemoryDashboardApi::new();
        let err = fetch_analytics(
            &api,
            &Caller::default(),
            &AnalyticsQuery {
                event_id: None,
                time_range: Some(60),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "E003");
    }

    #[tokio::test]
    async fn test_passes_normalized_range() {
        let api = MemoryDashboardApi::new();
        let analytics = fetch_analytics(
            &api,
            &Caller::default(),
            &AnalyticsQuery {
                event_id: Some("ALL".into()),
                time_range: Some(14),
            },
        )
        .await
        .unwrap();
        assert_eq!(analytics.daily_participation.len(), 14);
    }
}
