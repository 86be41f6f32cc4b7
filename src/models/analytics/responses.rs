use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 总览指标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AnalyticsOverview {
    pub total_students: u32,
    pub active_students: u32,
    pub total_submissions: u32,
    pub submitted_count: u32,
    pub participation_rate: f64,
    pub total_events: u32,
}

/// 每日参与情况
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct DailyParticipation {
    pub date: String,
    pub submissions: u32,
}

/// 小组表现
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct BrigadePerformance {
    pub name: String,
    pub participation_rate: f64,
}

/// 状态分布
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct StatusSlice {
    pub name: String,
    pub value: u32,
}

/// 活动完成度
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ActivityCompletion {
    pub name: String,
    pub completion: f64,
}

/// 分析数据，上游返回什么就透传什么
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct Analytics {
    pub overview: AnalyticsOverview,
    pub daily_participation: Vec<DailyParticipation>,
    pub brigade_performance: Vec<BrigadePerformance>,
    pub status_breakdown: Vec<StatusSlice>,
    pub activity_completion: Vec<ActivityCompletion>,
}
