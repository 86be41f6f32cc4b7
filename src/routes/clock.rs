use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::ClockService;

// 懒加载的全局 ClockService 实例
static CLOCK_SERVICE: Lazy<ClockService> = Lazy::new(ClockService::new_lazy);

pub async fn current_tick(request: HttpRequest) -> ActixResult<HttpResponse> {
    CLOCK_SERVICE.current(&request).await
}

pub async fn tick_stream(request: HttpRequest) -> ActixResult<HttpResponse> {
    CLOCK_SERVICE.stream(&request).await
}

// 配置路由
pub fn configure_clock_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/clock")
            .route("", web::get().to(current_tick))
            .route("/stream", web::get().to(tick_stream)),
    );
}
