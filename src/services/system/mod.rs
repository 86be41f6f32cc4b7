use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::client::DashboardApi;
use crate::config::AppConfig;
use crate::models::system::responses::HealthResponse;
use crate::models::{ApiResponse, AppStartTime};

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    /// 存活检查，不探测上游
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let config = AppConfig::get();
        let backend = request
            .app_data::<web::Data<Arc<dyn DashboardApi>>>()
            .map(|api| api.backend_name())
            .unwrap_or("unconfigured");
        let uptime_seconds = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|start| {
                chrono::Utc::now()
                    .signed_duration_since(start.start_datetime)
                    .num_seconds()
            })
            .unwrap_or_default();

        let response = HealthResponse {
            system_name: config.app.system_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.app.environment.clone(),
            upstream_backend: backend.to_string(),
            uptime_seconds,
        };
        Ok(HttpResponse::Ok().json(ApiResponse::success(response, "OK")))
    }
}
