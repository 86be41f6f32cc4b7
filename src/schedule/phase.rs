use chrono::Timelike;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 一天中的阶段，仅由当前时刻推导，不做持久化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/day_activities.ts")]
pub enum DayPhase {
    Preview, // 预览：只展示标题与时间
    Active,  // 进行中：可提交
    Review,  // 回顾：当前划分下不会出现
}

/// 预览阶段结束的小时（本地时间）
pub const ACTIVE_FROM_HOUR: u32 = 9;

/// 根据本地时刻判定阶段
///
/// `[0, 9)` 为预览，`[9, 24)` 为进行中，`Review` 不会被返回。
pub fn classify_phase<T: Timelike>(now: &T) -> DayPhase {
    let hour = now.hour();
    if hour < ACTIVE_FROM_HOUR {
        DayPhase::Preview
    } else {
        DayPhase::Active
    }
}

impl DayPhase {
    /// 顶部提示语
    pub fn message(&self) -> &'static str {
        match self {
            DayPhase::Preview => "Good morning! Here's a preview of today's activities",
            DayPhase::Active => "Activities are active. You can submit work until 11:59 PM today!",
            DayPhase::Review => {
                "Day completed! Review today's activities and catch up on submissions"
            }
        }
    }

    /// 徽标文字
    pub fn label(&self) -> &'static str {
        match self {
            DayPhase::Preview => "Preview Mode",
            DayPhase::Active => "Active Mode",
            DayPhase::Review => "Review Mode",
        }
    }

    /// 页脚说明
    pub fn footer_hint(&self) -> &'static str {
        match self {
            DayPhase::Preview => "Full activity details will be available from 9:00 AM",
            DayPhase::Active => "You can submit your work for any activity until 11:59 PM today",
            DayPhase::Review => {
                "Click \"View Details\" to see full information and submit if you missed anything"
            }
        }
    }

    pub fn shows_description(&self) -> bool {
        !matches!(self, DayPhase::Preview)
    }

    pub fn shows_inline_submission(&self) -> bool {
        matches!(self, DayPhase::Active)
    }

    pub fn offers_details_dialog(&self) -> bool {
        matches!(self, DayPhase::Review)
    }
}

impl std::fmt::Display for DayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayPhase::Preview => write!(f, "preview"),
            DayPhase::Active => write!(f, "active"),
            DayPhase::Review => write!(f, "review"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_preview_before_nine() {
        for hour in 0..9 {
            for (minute, second) in [(0, 0), (30, 15), (59, 59)] {
                let now = NaiveTime::from_hms_opt(hour, minute, second).unwrap();
                assert_eq!(classify_phase(&now), DayPhase::Preview, "hour {hour}");
            }
        }
    }

    #[test]
    fn test_active_from_nine_to_midnight() {
        for hour in 9..24 {
            for (minute, second) in [(0, 0), (30, 15), (59, 59)] {
                let now = NaiveTime::from_hms_opt(hour, minute, second).unwrap();
                assert_eq!(classify_phase(&now), DayPhase::Active, "hour {hour}");
            }
        }
    }

    #[test]
    fn test_review_is_never_produced() {
        let produced = (0..24)
            .map(|h| classify_phase(&NaiveTime::from_hms_opt(h, 0, 0).unwrap()))
            .any(|p| p == DayPhase::Review);
        assert!(!produced);
    }

    #[test]
    fn test_visibility_rules() {
        assert!(!DayPhase::Preview.shows_description());
        assert!(DayPhase::Active.shows_inline_submission());
        assert!(!DayPhase::Review.shows_inline_submission());
        assert!(DayPhase::Review.offers_details_dialog());
    }
}
