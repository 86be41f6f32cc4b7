use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::DashboardError;
use crate::models::activities::entities::SubmissionKind;

// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted, // 已提交
    Pending,   // 待处理
    Late,      // 迟交
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const PENDING: &'static str = "pending";
    pub const LATE: &'static str = "late";
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "invalid submission status: '{s}'. supported: submitted, pending, late"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "{}", SubmissionStatus::SUBMITTED),
            SubmissionStatus::Pending => write!(f, "{}", SubmissionStatus::PENDING),
            SubmissionStatus::Late => write!(f, "{}", SubmissionStatus::LATE),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            SubmissionStatus::SUBMITTED => Ok(SubmissionStatus::Submitted),
            SubmissionStatus::PENDING => Ok(SubmissionStatus::Pending),
            SubmissionStatus::LATE => Ok(SubmissionStatus::Late),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 提交内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionContent {
    Text(String),
    Link(String),
    File {
        file_name: Option<String>,
        file_size: Option<u64>,
    },
}

impl SubmissionContent {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            SubmissionContent::Text(_) => SubmissionKind::Text,
            SubmissionContent::Link(_) => SubmissionKind::Link,
            SubmissionContent::File { .. } => SubmissionKind::File,
        }
    }

    /// 简短摘要，用于“已提交”卡片
    pub fn summary(&self) -> String {
        match self {
            SubmissionContent::File { file_name, .. } => format!(
                "File: {}",
                file_name.as_deref().unwrap_or("File uploaded")
            ),
            SubmissionContent::Text(text) => {
                let preview: String = text.chars().take(50).collect();
                format!("Text: {preview}...")
            }
            SubmissionContent::Link(link) => format!("Link: {link}"),
        }
    }
}

/// 学生提交记录，由上游 API 拥有
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SubmissionWire", into = "SubmissionWire")]
pub struct Submission {
    pub id: String,
    pub event_plan_id: String,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub plan_title: Option<String>,
    pub event_id: Option<String>,
    pub content: SubmissionContent,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// 从上游 JSON 解码
    pub fn decode(value: serde_json::Value) -> Result<Self, DashboardError> {
        let wire: SubmissionWire = serde_json::from_value(value)?;
        Submission::try_from(wire)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, rename = "eventId", skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
}

/// 上游 JSON 表示
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionWire {
    #[serde(alias = "_id")]
    id: String,
    event_plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    student: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_plan: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    submission_type: SubmissionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_size: Option<u64>,
    status: SubmissionStatus,
    submitted_at: DateTime<Utc>,
}

impl TryFrom<SubmissionWire> for Submission {
    type Error = DashboardError;

    fn try_from(wire: SubmissionWire) -> Result<Self, Self::Error> {
        let content = match wire.submission_type {
            SubmissionKind::Text => SubmissionContent::Text(wire.content.unwrap_or_default()),
            SubmissionKind::Link => {
                let link = wire.content.filter(|c| !c.trim().is_empty()).ok_or_else(|| {
                    DashboardError::validation(format!(
                        "Link submission '{}' has no content",
                        wire.id
                    ))
                })?;
                SubmissionContent::Link(link)
            }
            SubmissionKind::File => SubmissionContent::File {
                file_name: wire.file_name,
                file_size: wire.file_size,
            },
        };

        let event_id = wire
            .event_id
            .or_else(|| wire.event_plan.as_ref().and_then(|p| p.event_id.clone()));

        Ok(Submission {
            id: wire.id,
            event_plan_id: wire.event_plan_id,
            student_id: wire.student_id,
            student_name: wire.student.and_then(|s| s.name),
            plan_title: wire.event_plan.and_then(|p| p.title),
            event_id,
            content,
            status: wire.status,
            submitted_at: wire.submitted_at,
        })
    }
}

impl From<Submission> for SubmissionWire {
    fn from(submission: Submission) -> Self {
        let submission_type = submission.content.kind();
        let (content, file_name, file_size) = match submission.content {
            SubmissionContent::Text(text) => (Some(text), None, None),
            SubmissionContent::Link(link) => (Some(link), None, None),
            SubmissionContent::File {
                file_name,
                file_size,
            } => (None, file_name, file_size),
        };
        SubmissionWire {
            id: submission.id,
            event_plan_id: submission.event_plan_id,
            student_id: submission.student_id,
            student: submission.student_name.map(|name| NamedRef {
                name: Some(name),
                ..Default::default()
            }),
            event_plan: submission.plan_title.map(|title| NamedRef {
                title: Some(title),
                ..Default::default()
            }),
            event_id: submission.event_id,
            submission_type,
            content,
            file_name,
            file_size,
            status: submission.status,
            submitted_at: submission.submitted_at,
        }
    }
}
