use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::activities::entities::SubmissionKind;

/// 提交列表查询参数（上游 `GET /submissions`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl SubmissionListQuery {
    pub fn for_student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            event_id: None,
        }
    }
}

/// 待发送的提交内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPayload {
    Text(String),
    Link(String),
    File {
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl SubmissionPayload {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            SubmissionPayload::Text(_) => SubmissionKind::Text,
            SubmissionPayload::Link(_) => SubmissionKind::Link,
            SubmissionPayload::File { .. } => SubmissionKind::File,
        }
    }
}

/// 上游创建提交请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubmission {
    pub event_plan_id: String,
    pub payload: SubmissionPayload,
}

/// 文本 / 链接提交请求体
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitContentRequest {
    pub kind: SubmissionKind,
    pub content: String,
}

/// 管理端提交筛选参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionFilterQuery {
    pub search: Option<String>,
    // ALL 或具体状态
    pub status: Option<String>,
    // ALL 或具体活动 ID
    pub event_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
