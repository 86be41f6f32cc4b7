use chrono::{Duration, NaiveDate};

use crate::models::activities::entities::Activity;
use crate::models::dashboard::responses::{
    StatusBreakdownEntry, StudentDashboardResponse, WeeklyEntry,
};
use crate::models::submissions::entities::{Submission, SubmissionStatus};

/// 最近一周的天数
const WEEK_DAYS: i64 = 7;

/// 计算学生个人统计
///
/// 每周分布按 `submitted_at` 的 UTC 日期计数，以 `today` 为最后一天。
pub fn compute_dashboard(
    activities: &[Activity],
    submissions: &[Submission],
    today: NaiveDate,
) -> StudentDashboardResponse {
    let count = |status: SubmissionStatus| submissions.iter().filter(|s| s.status == status).count();
    let submitted_count = count(SubmissionStatus::Submitted);
    let pending_count = count(SubmissionStatus::Pending);
    let late_count = count(SubmissionStatus::Late);
    let required_plans = activities.iter().filter(|a| a.requires_submission()).count();

    let completion_rate = if required_plans == 0 {
        0.0
    } else {
        submitted_count as f64 / required_plans as f64 * 100.0
    };

    let weekly = (0..WEEK_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            WeeklyEntry {
                date,
                weekday: date.format("%a").to_string(),
                submissions: submissions
                    .iter()
                    .filter(|s| s.submitted_at.date_naive() == date)
                    .count(),
            }
        })
        .collect();

    let status_breakdown = [("Completed", submitted_count), ("Pending", pending_count)]
        .into_iter()
        .filter(|(_, value)| *value > 0)
        .map(|(name, value)| StatusBreakdownEntry {
            name: name.to_string(),
            value,
        })
        .collect();

    StudentDashboardResponse {
        total_submissions: submissions.len(),
        submitted_count,
        pending_count,
        late_count,
        required_plans,
        completion_rate,
        completion_percent: completion_rate.round() as u32,
        weekly,
        status_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activities::entities::SubmissionRequirement;
    use crate::models::submissions::entities::SubmissionContent;
    use chrono::{TimeZone, Utc};

    fn plan(id: &str, requirement: SubmissionRequirement) -> Activity {
        Activity {
            id: id.to_string(),
            event_id: None,
            title: id.to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            time: "9:00 AM".parse().unwrap(),
            end_time: None,
            requirement,
        }
    }

    fn submission(id: &str, status: SubmissionStatus, day: u32) -> Submission {
        Submission {
            id: id.to_string(),
            event_plan_id: format!("p-{id}"),
            student_id: Some("u1".to_string()),
            student_name: None,
            plan_title: None,
            event_id: None,
            content: SubmissionContent::Text("x".to_string()),
            status,
            submitted_at: Utc.with_ymd_and_hms(2025, 6, day, 15, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_counts_and_completion() {
        let plans = vec![
            plan("a", SubmissionRequirement::Text),
            plan("b", SubmissionRequirement::Link),
            plan("c", SubmissionRequirement::File { size_limit_mb: None }),
            plan("d", SubmissionRequirement::None),
        ];
        let subs = vec![
            submission("1", SubmissionStatus::Submitted, 9),
            submission("2", SubmissionStatus::Submitted, 10),
            submission("3", SubmissionStatus::Late, 10),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let stats = compute_dashboard(&plans, &subs, today);

        assert_eq!(stats.total_submissions, 3);
        assert_eq!(stats.submitted_count, 2);
        assert_eq!(stats.pending_count, 0);
        assert_eq!(stats.late_count, 1);
        assert_eq!(stats.required_plans, 3);
        assert_eq!(stats.completion_percent, 67);
        assert_eq!(
            stats.status_breakdown,
            vec![StatusBreakdownEntry {
                name: "Completed".into(),
                value: 2
            }]
        );
    }

    #[test]
    fn test_weekly_window_ends_today() {
        let subs = vec![
            submission("1", SubmissionStatus::Submitted, 10),
            submission("2", SubmissionStatus::Pending, 10),
            submission("3", SubmissionStatus::Submitted, 4),
            submission("4", SubmissionStatus::Submitted, 3),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let stats = compute_dashboard(&[], &subs, today);

        assert_eq!(stats.weekly.len(), 7);
        assert_eq!(stats.weekly[0].date, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
        assert_eq!(stats.weekly[0].weekday, "Wed");
        assert_eq!(stats.weekly[0].submissions, 1);
        assert_eq!(stats.weekly[6].weekday, "Tue");
        assert_eq!(stats.weekly[6].submissions, 2);
        // 没有需要提交的活动时完成率为 0
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.status_breakdown.len(), 2);
    }
}
