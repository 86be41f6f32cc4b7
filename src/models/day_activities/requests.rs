use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

/// 当日活动查询参数，缺省为今天
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/day_activities.ts")]
pub struct DayActivitiesQuery {
    pub date: Option<NaiveDate>,
}
