use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use ts_rs::TS;

use crate::models::activities::entities::{PlanType, SubmissionKind};
use crate::models::submissions::responses::SubmissionView;
use crate::schedule::{ActivityStatus, DayPhase};

/// 当前时钟与阶段
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/day_activities.ts")]
pub struct PhaseInfo {
    pub phase: DayPhase,
    pub label: String,
    pub message: String,
    pub footer_hint: String,
    pub current_time: NaiveDateTime,
}

impl PhaseInfo {
    pub fn new(phase: DayPhase, now: NaiveDateTime) -> Self {
        Self {
            phase,
            label: phase.label().to_string(),
            message: phase.message().to_string(),
            footer_hint: phase.footer_hint().to_string(),
            current_time: now,
        }
    }
}

/// 单个活动卡片
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/day_activities.ts")]
pub struct ActivityCard {
    pub id: String,
    pub title: String,
    // 预览阶段不下发描述
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub end_time: Option<String>,
    pub plan_type: PlanType,
    pub submission_type: Option<SubmissionKind>,
    pub file_size_limit_mb: Option<u64>,
    pub status: ActivityStatus,
    pub status_label: String,
    pub submitted: bool,
    pub can_submit: bool,
    pub show_submission_form: bool,
    pub show_details_dialog: bool,
    pub submission: Option<SubmissionView>,
    // 提交窗口关闭时的提示
    pub closed_notice: Option<String>,
}

/// 当日活动视图
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/day_activities.ts")]
pub struct DayActivitiesResponse {
    pub date: NaiveDate,
    pub phase: PhaseInfo,
    pub activities: Vec<ActivityCard>,
}
