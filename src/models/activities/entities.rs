use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::DashboardError;
use crate::schedule::{ClockTime, parse_calendar_date};

// 活动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum PlanType {
    WithSubmission,    // 需要提交
    WithoutSubmission, // 仅活动
}

// 提交形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum SubmissionKind {
    File,
    Text,
    Link,
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionKind::File => write!(f, "file"),
            SubmissionKind::Text => write!(f, "text"),
            SubmissionKind::Link => write!(f, "link"),
        }
    }
}

/// 活动的提交要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionRequirement {
    None,
    // 未设置上限时使用配置中的默认值
    File { size_limit_mb: Option<u64> },
    Text,
    Link,
}

impl SubmissionRequirement {
    pub fn kind(&self) -> Option<SubmissionKind> {
        match self {
            SubmissionRequirement::None => None,
            SubmissionRequirement::File { .. } => Some(SubmissionKind::File),
            SubmissionRequirement::Text => Some(SubmissionKind::Text),
            SubmissionRequirement::Link => Some(SubmissionKind::Link),
        }
    }

    pub fn plan_type(&self) -> PlanType {
        match self {
            SubmissionRequirement::None => PlanType::WithoutSubmission,
            _ => PlanType::WithSubmission,
        }
    }
}

/// 活动（计划），由上游 API 拥有，此处只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActivityWire", into = "ActivityWire")]
pub struct Activity {
    pub id: String,
    pub event_id: Option<String>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub end_time: Option<ClockTime>,
    pub requirement: SubmissionRequirement,
}

impl Activity {
    pub fn requires_submission(&self) -> bool {
        self.requirement != SubmissionRequirement::None
    }

    /// 从上游 JSON 解码，保留时间解析等具体错误
    pub fn decode(value: serde_json::Value) -> Result<Self, DashboardError> {
        let wire: ActivityWire = serde_json::from_value(value)?;
        Activity::try_from(wire)
    }

    /// 文件大小上限（MB）
    pub fn file_size_limit_mb(&self, default_mb: u64) -> Option<u64> {
        match self.requirement {
            SubmissionRequirement::File { size_limit_mb } => {
                Some(size_limit_mb.unwrap_or(default_mb))
            }
            _ => None,
        }
    }
}

/// 上游 JSON 表示
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityWire {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    date: String,
    time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    plan_type: PlanType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submission_type: Option<SubmissionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_size_limit: Option<u64>,
}

impl TryFrom<ActivityWire> for Activity {
    type Error = DashboardError;

    fn try_from(wire: ActivityWire) -> Result<Self, Self::Error> {
        let date = parse_calendar_date(&wire.date)?;
        let time: ClockTime = wire.time.parse()?;
        let end_time = match wire.end_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse()?),
        };

        let requirement = match (wire.plan_type, wire.submission_type) {
            (PlanType::WithoutSubmission, _) => SubmissionRequirement::None,
            (PlanType::WithSubmission, Some(SubmissionKind::File)) => {
                SubmissionRequirement::File {
                    size_limit_mb: wire.file_size_limit.filter(|mb| *mb > 0),
                }
            }
            (PlanType::WithSubmission, Some(SubmissionKind::Text)) => SubmissionRequirement::Text,
            (PlanType::WithSubmission, Some(SubmissionKind::Link)) => SubmissionRequirement::Link,
            (PlanType::WithSubmission, None) => {
                return Err(DashboardError::validation(format!(
                    "Plan '{}' requires a submission but declares no submission type",
                    wire.id
                )));
            }
        };

        Ok(Activity {
            id: wire.id,
            event_id: wire.event_id,
            title: wire.title,
            description: wire.description.unwrap_or_default(),
            date,
            time,
            end_time,
            requirement,
        })
    }
}

impl From<Activity> for ActivityWire {
    fn from(activity: Activity) -> Self {
        let file_size_limit = match activity.requirement {
            SubmissionRequirement::File { size_limit_mb } => size_limit_mb,
            _ => None,
        };
        ActivityWire {
            id: activity.id,
            event_id: activity.event_id,
            title: activity.title,
            description: Some(activity.description),
            date: activity.date.format("%Y-%m-%d").to_string(),
            time: activity.time.to_string(),
            end_time: activity.end_time.map(|t| t.to_string()),
            plan_type: activity.requirement.plan_type(),
            submission_type: activity.requirement.kind(),
            file_size_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_file_plan() {
        let activity: Activity = serde_json::from_value(json!({
            "_id": "p1",
            "eventId": "e1",
            "title": "Photo essay",
            "description": "Upload your photos",
            "date": "2025-06-10T00:00:00.000Z",
            "time": "2:00 PM",
            "endTime": "4:00 PM",
            "planType": "withSubmission",
            "submissionType": "file",
            "fileSizeLimit": 10
        }))
        .unwrap();

        assert_eq!(activity.id, "p1");
        assert_eq!(activity.date, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert_eq!(activity.time.hour(), 14);
        assert_eq!(activity.end_time.map(|t| t.hour()), Some(16));
        assert_eq!(activity.file_size_limit_mb(5), Some(10));
        assert!(activity.requires_submission());
    }

    #[test]
    fn test_missing_file_limit_uses_default() {
        let activity: Activity = serde_json::from_value(json!({
            "id": "p2",
            "title": "Poster",
            "date": "2025-06-10",
            "time": "9:00 AM",
            "planType": "withSubmission",
            "submissionType": "file"
        }))
        .unwrap();
        assert_eq!(activity.file_size_limit_mb(5), Some(5));
        assert_eq!(activity.description, "");
    }

    #[test]
    fn test_without_submission_ignores_submission_type() {
        let activity: Activity = serde_json::from_value(json!({
            "id": "p3",
            "title": "Assembly",
            "date": "2025-06-10",
            "time": "8:00 AM",
            "planType": "withoutSubmission",
            "submissionType": "text"
        }))
        .unwrap();
        assert_eq!(activity.requirement, SubmissionRequirement::None);
        assert!(!activity.requires_submission());
    }

    #[test]
    fn test_decode_keeps_time_parse_error() {
        let err = Activity::decode(json!({
            "id": "p7",
            "title": "Broken",
            "date": "2025-06-10",
            "time": "25:00 PM",
            "planType": "withoutSubmission"
        }))
        .unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[test]
    fn test_malformed_time_fails_decoding() {
        let result = serde_json::from_value::<Activity>(json!({
            "id": "p4",
            "title": "Broken",
            "date": "2025-06-10",
            "time": "9:00",
            "planType": "withoutSubmission"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_submission_plan_without_type_fails() {
        let result = serde_json::from_value::<Activity>(json!({
            "id": "p5",
            "title": "Essay",
            "date": "2025-06-10",
            "time": "9:00 AM",
            "planType": "withSubmission"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_encodes_back_to_wire_shape() {
        let activity: Activity = serde_json::from_value(json!({
            "id": "p6",
            "title": "Link share",
            "date": "2025-06-10",
            "time": "12:00 PM",
            "planType": "withSubmission",
            "submissionType": "link"
        }))
        .unwrap();
        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["planType"], "withSubmission");
        assert_eq!(value["submissionType"], "link");
        assert_eq!(value["time"], "12:00 PM");
        assert_eq!(value["date"], "2025-06-10");
    }
}
