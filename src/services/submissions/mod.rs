pub mod list;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::client::{Caller, DashboardApi};
use crate::models::submissions::requests::SubmissionFilterQuery;

pub use list::SubmissionFilter;

pub struct SubmissionService {
    api: Option<Arc<dyn DashboardApi>>,
}

impl SubmissionService {
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

    /// 管理端提交列表（筛选）
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        caller: Caller,
        query: SubmissionFilterQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, caller, query).await
    }
}
