use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::activities::entities::Activity;

/// 活动生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/day_activities.ts")]
pub enum ActivityStatus {
    Upcoming,  // 尚未开始
    Ongoing,   // 已开始且当天未结束
    Completed, // 当天已结束
}

impl ActivityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityStatus::Upcoming => "Upcoming",
            ActivityStatus::Ongoing => "Live Now",
            ActivityStatus::Completed => "Completed",
        }
    }
}

/// 活动日期当天的最后时刻 23:59:59.999
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// 活动开始的具体时刻
pub fn start_instant(activity: &Activity) -> NaiveDateTime {
    activity.date.and_time(activity.time.as_naive())
}

/// 计算活动状态
pub fn resolve_status(activity: &Activity, now: NaiveDateTime) -> ActivityStatus {
    let start = start_instant(activity);
    if now < start {
        ActivityStatus::Upcoming
    } else if now <= end_of_day(activity.date) {
        ActivityStatus::Ongoing
    } else {
        ActivityStatus::Completed
    }
}
