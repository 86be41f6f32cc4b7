pub mod list;
pub mod state;
pub mod submit;

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::NaiveDate;

use crate::client::{Caller, DashboardApi};
use crate::models::submissions::requests::SubmitContentRequest;
use crate::runtime::clock::Clock;

pub use state::{InFlightGuard, Snapshot, SnapshotStore};

pub struct DayActivitiesService {
    api: Option<Arc<dyn DashboardApi>>,
    clock: Option<Arc<dyn Clock>>,
}

impl DayActivitiesService {
    pub fn new_lazy() -> Self {
        Self {
            api: None,
            clock: None,
        }
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

    pub(crate) fn get_clock(&self, request: &HttpRequest) -> Arc<dyn Clock> {
        if let Some(clock) = &self.clock {
            clock.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Clock>>>()
                .expect("Clock not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_store(&self, request: &HttpRequest) -> web::Data<SnapshotStore> {
        request
            .app_data::<web::Data<SnapshotStore>>()
            .expect("SnapshotStore not found in app data")
            .clone()
    }

    /// 当日活动视图
    pub async fn list_day_activities(
        &self,
        request: &HttpRequest,
        caller: Caller,
        date: Option<NaiveDate>,
    ) -> ActixResult<HttpResponse> {
        list::list_day_activities(self, request, caller, date).await
    }

    /// 提交文本或链接
    pub async fn submit_content(
        &self,
        request: &HttpRequest,
        caller: Caller,
        plan_id: String,
        body: SubmitContentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_content(self, request, caller, plan_id, body).await
    }

    /// 上传文件提交
    pub async fn submit_file(
        &self,
        request: &HttpRequest,
        caller: Caller,
        plan_id: String,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        submit::submit_file(self, request, caller, plan_id, payload).await
    }
}
