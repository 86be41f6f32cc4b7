use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::models::activities::entities::SubmissionKind;
use crate::models::submissions::entities::{Submission, SubmissionContent, SubmissionStatus};

/// 提交信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionView {
    pub id: String,
    pub event_plan_id: String,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub plan_title: Option<String>,
    pub event_id: Option<String>,
    pub submission_type: SubmissionKind,
    pub content: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub summary: String,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}

impl From<&Submission> for SubmissionView {
    fn from(s: &Submission) -> Self {
        let (content, file_name, file_size) = match &s.content {
            SubmissionContent::Text(text) => (Some(text.clone()), None, None),
            SubmissionContent::Link(link) => (Some(link.clone()), None, None),
            SubmissionContent::File {
                file_name,
                file_size,
            } => (None, file_name.clone(), *file_size),
        };
        Self {
            id: s.id.clone(),
            event_plan_id: s.event_plan_id.clone(),
            student_id: s.student_id.clone(),
            student_name: s.student_name.clone(),
            plan_title: s.plan_title.clone(),
            event_id: s.event_id.clone(),
            submission_type: s.content.kind(),
            content,
            file_name,
            file_size,
            summary: s.content.summary(),
            status: s.status,
            submitted_at: s.submitted_at,
        }
    }
}

/// 管理端提交列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionView>,
    pub total: usize,
    pub matched: usize,
}
