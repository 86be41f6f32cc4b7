use chrono::NaiveDateTime;

use super::status::end_of_day;
use crate::errors::DashboardError;
use crate::models::activities::entities::Activity;
use crate::models::submissions::entities::Submission;

/// 查找引用该活动的第一条提交
pub fn find_submission<'a>(activity_id: &str, submissions: &'a [Submission]) -> Option<&'a Submission> {
    submissions.iter().find(|s| s.event_plan_id == activity_id)
}

/// 是否已有任意一条提交引用该活动
pub fn is_submitted(activity_id: &str, submissions: &[Submission]) -> bool {
    find_submission(activity_id, submissions).is_some()
}

/// 提交窗口判定：当天结束前且尚未提交
///
/// 不考虑阶段与活动开始时间，一旦为 false 即不会再打开。
pub fn can_submit(activity: &Activity, submissions: &[Submission], now: NaiveDateTime) -> bool {
    now <= end_of_day(activity.date) && !is_submitted(&activity.id, submissions)
}

/// 与 `can_submit` 相同的判定，返回具体原因，供提交流程使用
pub fn check_eligibility(
    activity: &Activity,
    submissions: &[Submission],
    now: NaiveDateTime,
) -> Result<(), DashboardError> {
    if !activity.requires_submission() {
        return Err(DashboardError::submission_not_required(format!(
            "'{}' does not accept submissions",
            activity.title
        )));
    }
    if is_submitted(&activity.id, submissions) {
        return Err(DashboardError::already_submitted(format!(
            "You have already submitted '{}'",
            activity.title
        )));
    }
    if now > end_of_day(activity.date) {
        return Err(DashboardError::submission_closed(format!(
            "Submissions were due by 11:59 PM on {}",
            activity.date.format("%Y-%m-%d")
        )));
    }
    Ok(())
}
