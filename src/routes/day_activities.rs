use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::client::Caller;
use crate::models::day_activities::requests::DayActivitiesQuery;
use crate::models::submissions::requests::SubmitContentRequest;
use crate::services::DayActivitiesService;

// 懒加载的全局 DayActivitiesService 实例
static DAY_ACTIVITIES_SERVICE: Lazy<DayActivitiesService> =
    Lazy::new(DayActivitiesService::new_lazy);

// 当日活动视图
pub async fn list_day_activities(
    req: HttpRequest,
    caller: Caller,
    query: web::Query<DayActivitiesQuery>,
) -> ActixResult<HttpResponse> {
    DAY_ACTIVITIES_SERVICE
        .list_day_activities(&req, caller, query.into_inner().date)
        .await
}

// 提交文本或链接
pub async fn submit_content(
    req: HttpRequest,
    caller: Caller,
    path: web::Path<String>,
    body: web::Json<SubmitContentRequest>,
) -> ActixResult<HttpResponse> {
    DAY_ACTIVITIES_SERVICE
        .submit_content(&req, caller, path.into_inner(), body.into_inner())
        .await
}

// 上传文件
pub async fn submit_file(
    req: HttpRequest,
    caller: Caller,
    path: web::Path<String>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    DAY_ACTIVITIES_SERVICE
        .submit_file(&req, caller, path.into_inner(), payload)
        .await
}

// 配置路由
pub fn configure_day_activities_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/day-activities")
            .route("", web::get().to(list_day_activities))
            .route("/{plan_id}/submissions", web::post().to(submit_content))
            .route("/{plan_id}/submissions/file", web::post().to(submit_file)),
    );
}
