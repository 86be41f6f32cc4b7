use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::client::Caller;
use crate::models::analytics::requests::AnalyticsQuery;
use crate::services::AnalyticsService;

// 懒加载的全局 AnalyticsService 实例
static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

pub async fn get_analytics(
    req: HttpRequest,
    caller: Caller,
    query: web::Query<AnalyticsQuery>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .get_analytics(&req, caller, query.into_inner())
        .await
}

// 配置路由
pub fn configure_analytics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/analytics").route("", web::get().to(get_analytics)));
}
