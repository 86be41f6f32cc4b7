use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{Caller, DashboardApi};
use crate::errors::{DashboardError, Result};
use crate::models::activities::{entities::Activity, requests::ActivityListQuery};
use crate::models::analytics::responses::{
    ActivityCompletion, Analytics, AnalyticsOverview, DailyParticipation, StatusSlice,
};
use crate::models::submissions::{
    entities::{Submission, SubmissionContent, SubmissionStatus},
    requests::{CreateSubmission, SubmissionListQuery, SubmissionPayload},
};

/// 内存实现，数据仅存在于进程内
#[derive(Default)]
pub struct MemoryDashboardApi {
    activities: RwLock<Vec<Activity>>,
    submissions: RwLock<Vec<Submission>>,
    // 学生 ID -> 姓名
    students: RwLock<BTreeMap<String, String>>,
}

impl MemoryDashboardApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入活动，同 ID 的活动会被替换
    pub async fn seed_activities(&self, activities: impl IntoIterator<Item = Activity>) {
        let mut stored = self.activities.write().await;
        for activity in activities {
            match stored.iter_mut().find(|a| a.id == activity.id) {
                Some(existing) => *existing = activity,
                None => stored.push(activity),
            }
        }
    }

    pub async fn seed_submissions(&self, submissions: impl IntoIterator<Item = Submission>) {
        self.submissions.write().await.extend(submissions);
    }

    pub async fn seed_student(&self, id: impl Into<String>, name: impl Into<String>) {
        self.students.write().await.insert(id.into(), name.into());
    }

    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }
}

#[async_trait::async_trait]
impl DashboardApi for MemoryDashboardApi {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_activities(
        &self,
        _caller: &Caller,
        query: ActivityListQuery,
    ) -> Result<Vec<Activity>> {
        let activities = self.activities.read().await;
        Ok(activities
            .iter()
            .filter(|a| query.date.is_none_or(|d| a.date == d))
            .filter(|a| {
                query
                    .event_id
                    .as_deref()
                    .is_none_or(|id| a.event_id.as_deref() == Some(id))
            })
            .cloned()
            .collect())
    }

    async fn list_submissions(
        &self,
        _caller: &Caller,
        query: SubmissionListQuery,
    ) -> Result<Vec<Submission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .iter()
            .filter(|s| {
                query
                    .student_id
                    .as_deref()
                    .is_none_or(|id| s.student_id.as_deref() == Some(id))
            })
            .filter(|s| {
                query
                    .event_id
                    .as_deref()
                    .is_none_or(|id| s.event_id.as_deref() == Some(id))
            })
            .cloned()
            .collect())
    }

    async fn create_submission(
        &self,
        caller: &Caller,
        request: CreateSubmission,
    ) -> Result<Submission> {
        let student_id = caller.require_student_id()?.to_string();

        let activity = self
            .activities
            .read()
            .await
            .iter()
            .find(|a| a.id == request.event_plan_id)
            .cloned()
            .ok_or_else(|| {
                DashboardError::not_found(format!("Plan '{}' not found", request.event_plan_id))
            })?;

        let content = match request.payload {
            SubmissionPayload::Text(text) => SubmissionContent::Text(text),
            SubmissionPayload::Link(link) => SubmissionContent::Link(link),
            SubmissionPayload::File {
                file_name, bytes, ..
            } => SubmissionContent::File {
                file_name: Some(file_name),
                file_size: Some(bytes.len() as u64),
            },
        };

        let student_name = self.students.read().await.get(&student_id).cloned();
        let submission = Submission {
            id: uuid::Uuid::new_v4().to_string(),
            event_plan_id: activity.id.clone(),
            student_id: Some(student_id),
            student_name,
            plan_title: Some(activity.title.clone()),
            event_id: activity.event_id.clone(),
            content,
            status: SubmissionStatus::Submitted,
            submitted_at: Utc::now(),
        };

        debug!(
            "Stored in-memory submission {} for plan {}",
            submission.id, submission.event_plan_id
        );
        self.submissions.write().await.push(submission.clone());
        Ok(submission)
    }

    async fn get_analytics(
        &self,
        _caller: &Caller,
        event_id: Option<String>,
        time_range_days: u32,
    ) -> Result<Analytics> {
        let activities = self.activities.read().await;
        let submissions = self.submissions.read().await;
        let total_students = self.students.read().await.len() as u32;

        let matches_event = |id: Option<&str>| event_id.as_deref().is_none_or(|e| id == Some(e));
        let scoped: Vec<&Submission> = submissions
            .iter()
            .filter(|s| matches_event(s.event_id.as_deref()))
            .collect();
        let plans: Vec<&Activity> = activities
            .iter()
            .filter(|a| matches_event(a.event_id.as_deref()))
            .collect();

        let active_students: HashSet<&str> =
            scoped.iter().filter_map(|s| s.student_id.as_deref()).collect();
        let submitted_count = scoped
            .iter()
            .filter(|s| s.status == SubmissionStatus::Submitted)
            .count() as u32;
        let events: HashSet<&str> = plans.iter().filter_map(|a| a.event_id.as_deref()).collect();

        let participation_rate = if total_students == 0 {
            0.0
        } else {
            active_students.len() as f64 / total_students as f64 * 100.0
        };

        // 最近 N 天，按日期从旧到新
        let today = Utc::now().date_naive();
        let daily_participation = (0..time_range_days as i64)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                DailyParticipation {
                    date: date.format("%Y-%m-%d").to_string(),
                    submissions: scoped
                        .iter()
                        .filter(|s| s.submitted_at.date_naive() == date)
                        .count() as u32,
                }
            })
            .collect();

        let status_breakdown = [
            SubmissionStatus::Submitted,
            SubmissionStatus::Pending,
            SubmissionStatus::Late,
        ]
        .into_iter()
        .map(|status| StatusSlice {
            name: status.to_string(),
            value: scoped.iter().filter(|s| s.status == status).count() as u32,
        })
        .filter(|slice| slice.value > 0)
        .collect();

        let activity_completion = plans
            .iter()
            .filter(|a| a.requires_submission())
            .map(|a| {
                let count = scoped.iter().filter(|s| s.event_plan_id == a.id).count();
                let completion = if total_students == 0 {
                    0.0
                } else {
                    count as f64 / total_students as f64 * 100.0
                };
                ActivityCompletion {
                    name: a.title.clone(),
                    completion,
                }
            })
            .collect();

        Ok(Analytics {
            overview: AnalyticsOverview {
                total_students,
                active_students: active_students.len() as u32,
                total_submissions: scoped.len() as u32,
                submitted_count,
                participation_rate,
                total_events: events.len() as u32,
            },
            daily_participation,
            brigade_performance: Vec::new(),
            status_breakdown,
            activity_completion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activities::entities::SubmissionRequirement;
    use chrono::NaiveDate;

    fn plan(id: &str, event: &str, requirement: SubmissionRequirement) -> Activity {
        Activity {
            id: id.to_string(),
            event_id: Some(event.to_string()),
            title: format!("Plan {id}"),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            time: "10:00 AM".parse().unwrap(),
            end_time: None,
            requirement,
        }
    }

    #[tokio::test]
    async fn test_create_submission_requires_known_plan() {
        let api = MemoryDashboardApi::new();
        let caller = Caller::student("u1");
        let err = api
            .create_submission(
                &caller,
                CreateSubmission {
                    event_plan_id: "missing".into(),
                    payload: SubmissionPayload::Text("hi".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[tokio::test]
    async fn test_create_submission_requires_identity() {
        let api = MemoryDashboardApi::new();
        api.seed_activities([plan("p1", "e1", SubmissionRequirement::Text)])
            .await;
        let err = api
            .create_submission(
                &Caller::default(),
                CreateSubmission {
                    event_plan_id: "p1".into(),
                    payload: SubmissionPayload::Text("hi".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[tokio::test]
    async fn test_created_submission_is_listed_for_student() {
        let api = MemoryDashboardApi::new();
        api.seed_student("u1", "Asha").await;
        api.seed_activities([plan("p1", "e1", SubmissionRequirement::File { size_limit_mb: None })])
            .await;

        let caller = Caller::student("u1");
        let created = api
            .create_submission(
                &caller,
                CreateSubmission {
                    event_plan_id: "p1".into(),
                    payload: SubmissionPayload::File {
                        file_name: "essay.pdf".into(),
                        content_type: None,
                        bytes: vec![0; 128],
                    },
                },
            )
            .await
            .unwrap();
        assert_eq!(created.student_name.as_deref(), Some("Asha"));
        assert_eq!(created.event_id.as_deref(), Some("e1"));

        let mine = api
            .list_submissions(&caller, SubmissionListQuery::for_student("u1"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        let others = api
            .list_submissions(&caller, SubmissionListQuery::for_student("u2"))
            .await
            .unwrap();
        assert!(others.is_empty());
    }

    #[tokio::test]
    async fn test_list_activities_filters_by_date() {
        let api = MemoryDashboardApi::new();
        let mut other_day = plan("p2", "e1", SubmissionRequirement::None);
        other_day.date = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        api.seed_activities([plan("p1", "e1", SubmissionRequirement::None), other_day])
            .await;

        let found = api
            .list_activities(
                &Caller::default(),
                ActivityListQuery::for_date(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "p1");
    }

    #[tokio::test]
    async fn test_analytics_counts_scoped_submissions() {
        let api = MemoryDashboardApi::new();
        api.seed_student("u1", "Asha").await;
        api.seed_student("u2", "Ben").await;
        api.seed_activities([
            plan("p1", "e1", SubmissionRequirement::Text),
            plan("p2", "e2", SubmissionRequirement::Text),
        ])
        .await;
        for plan_id in ["p1", "p2"] {
            api.create_submission(
                &Caller::student("u1"),
                CreateSubmission {
                    event_plan_id: plan_id.into(),
                    payload: SubmissionPayload::Text("done".into()),
                },
            )
            .await
            .unwrap();
        }

        let analytics = api
            .get_analytics(&Caller::default(), Some("e1".into()), 7)
            .await
            .unwrap();
        assert_eq!(analytics.overview.total_submissions, 1);
        assert_eq!(analytics.overview.active_students, 1);
        assert_eq!(analytics.overview.participation_rate, 50.0);
        assert_eq!(analytics.daily_participation.len(), 7);
        assert_eq!(analytics.status_breakdown.len(), 1);
        assert_eq!(analytics.activity_completion[0].completion, 50.0);
    }
}
