use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use super::DayActivitiesService;
use super::state::{Snapshot, SnapshotStore};
use crate::client::{Caller, DashboardApi};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::activities::{entities::Activity, requests::ActivityListQuery};
use crate::models::day_activities::responses::{ActivityCard, DayActivitiesResponse, PhaseInfo};
use crate::models::submissions::{
    entities::Submission, requests::SubmissionListQuery, responses::SubmissionView,
};
use crate::runtime::clock::Clock;
use crate::schedule::{
    DayPhase, can_submit, classify_phase, find_submission, resolve_status, start_instant,
};

/// 同时拉取活动和提交，写入快照并生成当日视图
pub async fn load_day_view(
    api: &dyn DashboardApi,
    clock: &dyn Clock,
    store: &SnapshotStore,
    caller: &Caller,
    date: Option<NaiveDate>,
    default_file_size_limit_mb: u64,
) -> Result<DayActivitiesResponse> {
    let student_id = caller.require_student_id()?;
    let now = clock.local_now();
    let date = date.unwrap_or_else(|| now.date());

    let (activities, submissions) = tokio::try_join!(
        api.list_activities(caller, ActivityListQuery::for_date(date)),
        api.list_submissions(caller, SubmissionListQuery::for_student(student_id)),
    )?;

    let mut activities: Vec<Activity> = activities.into_iter().filter(|a| a.date == date).collect();
    activities.sort_by_key(start_instant);
    debug!(
        "Loaded {} activities and {} submissions for {} on {}",
        activities.len(),
        submissions.len(),
        student_id,
        date
    );

    let view = build_day_view(date, &activities, &submissions, now, default_file_size_limit_mb);
    store.replace(
        student_id,
        Snapshot {
            date,
            activities,
            submissions,
            fetched_at: now,
        },
    );
    Ok(view)
}

/// 根据快照和当前时刻生成视图
pub fn build_day_view(
    date: NaiveDate,
    activities: &[Activity],
    submissions: &[Submission],
    now: NaiveDateTime,
    default_file_size_limit_mb: u64,
) -> DayActivitiesResponse {
    let phase = classify_phase(&now);
    DayActivitiesResponse {
        date,
        phase: PhaseInfo::new(phase, now),
        activities: activities
            .iter()
            .map(|a| build_card(a, submissions, phase, now, default_file_size_limit_mb))
            .collect(),
    }
}

pub fn build_card(
    activity: &Activity,
    submissions: &[Submission],
    phase: DayPhase,
    now: NaiveDateTime,
    default_file_size_limit_mb: u64,
) -> ActivityCard {
    let status = resolve_status(activity, now);
    let existing = find_submission(&activity.id, submissions);
    let submitted = existing.is_some();
    let open = can_submit(activity, submissions, now);
    let requires = activity.requires_submission();

    let closed_notice = (requires && !submitted && !open).then(|| {
        format!(
            "Submissions were due by 11:59 PM on {}",
            activity.date.format("%Y-%m-%d")
        )
    });

    ActivityCard {
        id: activity.id.clone(),
        title: activity.title.clone(),
        description: phase
            .shows_description()
            .then(|| activity.description.clone()),
        date: activity.date,
        time: activity.time.to_string(),
        end_time: activity.end_time.map(|t| t.to_string()),
        plan_type: activity.requirement.plan_type(),
        submission_type: activity.requirement.kind(),
        file_size_limit_mb: activity.file_size_limit_mb(default_file_size_limit_mb),
        status,
        status_label: status.label().to_string(),
        submitted,
        can_submit: open,
        show_submission_form: phase.shows_inline_submission() && requires && open,
        show_details_dialog: phase.offers_details_dialog(),
        submission: existing.map(SubmissionView::from),
        closed_notice,
    }
}

pub async fn list_day_activities(
    service: &DayActivitiesService,
    request: &HttpRequest,
    caller: Caller,
    date: Option<NaiveDate>,
) -> ActixResult<HttpResponse> {
    let api = service.get_api(request);
    let clock = service.get_clock(request);
    let store = service.get_store(request);
    let default_limit = AppConfig::get().submissions.default_file_size_limit_mb;

    match load_day_view(
        api.as_ref(),
        clock.as_ref(),
        &store,
        &caller,
        date,
        default_limit,
    )
    .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Query successful"))),
        Err(e) => {
            warn!("Failed to load day activities: {}", e);
            Ok(ApiResponse::<()>::from_error(&e))
        }
    }
}
