use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::client::Caller;
use crate::models::submissions::requests::SubmissionFilterQuery;
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出提交（管理端）
pub async fn list_submissions(
    req: HttpRequest,
    caller: Caller,
    query: web::Query<SubmissionFilterQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, caller, query.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/submissions").route("", web::get().to(list_submissions)));
}
