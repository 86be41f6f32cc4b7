use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

/// 每日提交数
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct WeeklyEntry {
    pub date: NaiveDate,
    // Mon / Tue ...
    pub weekday: String,
    pub submissions: usize,
}

/// 状态分布项
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StatusBreakdownEntry {
    pub name: String,
    pub value: usize,
}

/// 学生个人面板统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboardResponse {
    pub total_submissions: usize,
    pub submitted_count: usize,
    pub pending_count: usize,
    pub late_count: usize,
    pub required_plans: usize,
    pub completion_rate: f64,
    pub completion_percent: u32,
    pub weekly: Vec<WeeklyEntry>,
    pub status_breakdown: Vec<StatusBreakdownEntry>,
}
