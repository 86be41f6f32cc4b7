use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::client::Caller;
use crate::services::DashboardService;

// 懒加载的全局 DashboardService 实例
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn get_student_dashboard(req: HttpRequest, caller: Caller) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_student_dashboard(&req, caller).await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard").route("", web::get().to(get_student_dashboard)),
    );
}
