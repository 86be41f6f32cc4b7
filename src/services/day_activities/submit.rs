use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{StreamExt, TryStreamExt};
use tracing::{info, warn};

use super::DayActivitiesService;
use super::state::{InFlightGuard, SnapshotStore};
use crate::client::{Caller, DashboardApi};
use crate::config::AppConfig;
use crate::errors::{DashboardError, Result};
use crate::models::ApiResponse;
use crate::models::activities::{
    entities::{Activity, SubmissionKind},
    requests::ActivityListQuery,
};
use crate::models::submissions::{
    entities::Submission,
    requests::{CreateSubmission, SubmissionListQuery, SubmissionPayload, SubmitContentRequest},
    responses::SubmissionView,
};
use crate::runtime::clock::Clock;
use crate::schedule::check_eligibility;
use crate::utils::validate::{validate_content, validate_file_size, validate_kind, validate_link};

/// 校验并规范化提交内容，不访问上游
pub fn normalize_payload(payload: SubmissionPayload) -> Result<SubmissionPayload> {
    match payload {
        SubmissionPayload::Text(text) => Ok(SubmissionPayload::Text(
            validate_content(&text)?.to_string(),
        )),
        SubmissionPayload::Link(link) => {
            let link = validate_content(&link)?;
            validate_link(link)?;
            Ok(SubmissionPayload::Link(link.to_string()))
        }
        file @ SubmissionPayload::File { .. } => Ok(file),
    }
}

/// 找到活动以及学生最新的提交列表
///
/// 活动可以取自快照，提交列表总是向上游重新拉取，并补上本地已并入的记录。
async fn resolve_plan(
    api: &dyn DashboardApi,
    store: &SnapshotStore,
    caller: &Caller,
    student_id: &str,
    plan_id: &str,
) -> Result<(Activity, Vec<Submission>)> {
    let cached = store
        .get(student_id)
        .and_then(|snapshot| snapshot.activity(plan_id).cloned());

    let (activity, mut submissions) = match cached {
        Some(activity) => {
            let submissions = api
                .list_submissions(caller, SubmissionListQuery::for_student(student_id))
                .await?;
            (activity, submissions)
        }
        None => {
            let (activities, submissions) = tokio::try_join!(
                api.list_activities(caller, ActivityListQuery::default()),
                api.list_submissions(caller, SubmissionListQuery::for_student(student_id)),
            )?;
            let activity = activities
                .into_iter()
                .find(|a| a.id == plan_id)
                .ok_or_else(|| DashboardError::not_found(format!("Plan '{plan_id}' not found")))?;
            (activity, submissions)
        }
    };

    for local in store.pending(student_id) {
        if !submissions.iter().any(|s| s.id == local.id) {
            submissions.push(local);
        }
    }
    Ok((activity, submissions))
}

/// 通过进行中检查、提交窗口检查和形式检查后的提交许可
///
/// 持有期间同一学生不能再提交同一活动。
pub struct Admission<'a> {
    pub activity: Activity,
    student_id: &'a str,
    _guard: InFlightGuard<'a>,
}

impl Admission<'_> {
    pub fn file_size_limit_mb(&self, default_file_size_limit_mb: u64) -> u64 {
        self.activity
            .file_size_limit_mb(default_file_size_limit_mb)
            .unwrap_or(default_file_size_limit_mb)
    }
}

/// 占用进行中标记并检查该活动当前能否以 `kind` 形式提交
pub async fn admit<'a>(
    api: &dyn DashboardApi,
    clock: &dyn Clock,
    store: &'a SnapshotStore,
    caller: &'a Caller,
    plan_id: &str,
    kind: SubmissionKind,
) -> Result<Admission<'a>> {
    let student_id = caller.require_student_id()?;
    let guard = store.begin_submission(student_id, plan_id)?;

    let (activity, submissions) = resolve_plan(api, store, caller, student_id, plan_id).await?;
    check_eligibility(&activity, &submissions, clock.local_now())?;
    validate_kind(&activity, kind)?;

    Ok(Admission {
        activity,
        student_id,
        _guard: guard,
    })
}

/// 向上游发送提交，成功后并入快照
async fn send(
    api: &dyn DashboardApi,
    store: &SnapshotStore,
    caller: &Caller,
    admission: Admission<'_>,
    payload: SubmissionPayload,
) -> Result<Submission> {
    let kind = payload.kind();
    let submission = api
        .create_submission(
            caller,
            CreateSubmission {
                event_plan_id: admission.activity.id.clone(),
                payload,
            },
        )
        .await?;

    info!(
        "Student {} submitted {} for plan {} ({})",
        admission.student_id, kind, admission.activity.id, submission.id
    );
    store.merge_submission(admission.student_id, &submission);
    Ok(submission)
}

/// 提交一份作业
///
/// 依次进行内容校验、进行中检查、提交窗口检查和形式检查，
/// 成功后把返回的记录并入快照。
pub async fn dispatch_submission(
    api: &dyn DashboardApi,
    clock: &dyn Clock,
    store: &SnapshotStore,
    caller: &Caller,
    plan_id: &str,
    payload: SubmissionPayload,
    default_file_size_limit_mb: u64,
) -> Result<Submission> {
    caller.require_student_id()?;
    let payload = normalize_payload(payload)?;

    let admission = admit(api, clock, store, caller, plan_id, payload.kind()).await?;
    if let SubmissionPayload::File { bytes, .. } = &payload {
        validate_file_size(
            bytes.len() as u64,
            admission.file_size_limit_mb(default_file_size_limit_mb),
        )?;
    }
    send(api, store, caller, admission, payload).await
}

/// 从 multipart 中读取唯一的 `file` 字段，超过 `limit_mb` 时立即返回错误
pub async fn read_file_field(
    mut payload: Multipart,
    limit_mb: u64,
) -> Result<(String, Option<String>, Vec<u8>)> {
    let max_bytes = limit_mb.saturating_mul(1024 * 1024);
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| DashboardError::validation(format!("Invalid multipart payload: {e}")))?
    {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }
        if file.is_some() {
            return Err(DashboardError::validation(
                "Only one file can be submitted at a time",
            ));
        }

        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "upload.bin".to_string());
        let content_type = field.content_type().map(|ct| ct.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk
                .map_err(|e| DashboardError::validation(format!("Failed to read upload: {e}")))?;
            bytes.extend_from_slice(&data);
            if bytes.len() as u64 > max_bytes {
                return Err(DashboardError::validation(format!(
                    "File exceeds the {limit_mb} MB size limit"
                )));
            }
        }
        file = Some((file_name, content_type, bytes));
    }

    file.ok_or_else(|| DashboardError::validation("No file found in upload payload"))
}

fn respond(result: Result<Submission>) -> HttpResponse {
    match result {
        Ok(submission) => HttpResponse::Created().json(ApiResponse::success(
            SubmissionView::from(&submission),
            "Submission received",
        )),
        Err(e) => {
            warn!("Submission rejected: {}", e);
            ApiResponse::<()>::from_error(&e)
        }
    }
}

pub async fn submit_content(
    service: &DayActivitiesService,
    request: &HttpRequest,
    caller: Caller,
    plan_id: String,
    body: SubmitContentRequest,
) -> ActixResult<HttpResponse> {
    let payload = match body.kind {
        SubmissionKind::Text => SubmissionPayload::Text(body.content),
        SubmissionKind::Link => SubmissionPayload::Link(body.content),
        SubmissionKind::File => {
            return Ok(ApiResponse::<()>::from_error(&DashboardError::validation(
                "File submissions must be uploaded as multipart form data",
            )));
        }
    };

    let api = service.get_api(request);
    let clock = service.get_clock(request);
    let store = service.get_store(request);
    let default_limit = AppConfig::get().submissions.default_file_size_limit_mb;

    let result = dispatch_submission(
        api.as_ref(),
        clock.as_ref(),
        &store,
        &caller,
        &plan_id,
        payload,
        default_limit,
    )
    .await;
    Ok(respond(result))
}

pub async fn submit_file(
    service: &DayActivitiesService,
    request: &HttpRequest,
    caller: Caller,
    plan_id: String,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let api = service.get_api(request);
    let clock = service.get_clock(request);
    let store = service.get_store(request);
    let default_limit = AppConfig::get().submissions.default_file_size_limit_mb;

    let result: Result<Submission> = async {
        // 先通过提交检查，再读取文件内容
        let admission = admit(
            api.as_ref(),
            clock.as_ref(),
            &store,
            &caller,
            &plan_id,
            SubmissionKind::File,
        )
        .await?;
        let limit_mb = admission.file_size_limit_mb(default_limit);

        let (file_name, content_type, bytes) = read_file_field(payload, limit_mb).await?;
        validate_file_size(bytes.len() as u64, limit_mb)?;
        send(
            api.as_ref(),
            &store,
            &caller,
            admission,
            SubmissionPayload::File {
                file_name,
                content_type,
                bytes,
            },
        )
        .await
    }
    .await;
    Ok(respond(result))
}
