pub mod stats;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::warn;

use crate::client::{Caller, DashboardApi};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::activities::requests::ActivityListQuery;
use crate::models::dashboard::responses::StudentDashboardResponse;
use crate::models::submissions::requests::SubmissionListQuery;
use crate::runtime::clock::Clock;

pub use stats::compute_dashboard;

pub struct DashboardService {
    api: Option<Arc<dyn DashboardApi>>,
}

impl DashboardService {
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

    /// 学生个人统计
    pub async fn get_student_dashboard(
        &self,
        request: &HttpRequest,
        caller: Caller,
    ) -> ActixResult<HttpResponse> {
        let api = self.get_api(request);
        let clock = request
            .app_data::<web::Data<Arc<dyn Clock>>>()
            .expect("Clock not found in app data")
            .get_ref()
            .clone();

        match load_student_dashboard(api.as_ref(), clock.as_ref(), &caller).await {
            Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "Query successful"))),
            Err(e) => {
                warn!("Failed to load dashboard statistics: {}", e);
                Ok(ApiResponse::<()>::from_error(&e))
            }
        }
    }
}

pub async fn load_student_dashboard(
    api: &dyn DashboardApi,
    clock: &dyn Clock,
    caller: &Caller,
) -> Result<StudentDashboardResponse> {
    let student_id = caller.require_student_id()?;
    let (activities, submissions) = tokio::try_join!(
        api.list_activities(caller, ActivityListQuery::default()),
        api.list_submissions(caller, SubmissionListQuery::for_student(student_id)),
    )?;
    Ok(compute_dashboard(
        &activities,
        &submissions,
        clock.local_now().date(),
    ))
}
