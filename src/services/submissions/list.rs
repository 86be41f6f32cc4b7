use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, warn};

use super::SubmissionService;
use crate::client::{Caller, DashboardApi};
use crate::errors::{DashboardError, Result};
use crate::models::ApiResponse;
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{SubmissionFilterQuery, SubmissionListQuery},
    responses::{SubmissionListResponse, SubmissionView},
};

/// 解析后的筛选条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionFilter {
    search: Option<String>,
    status: Option<SubmissionStatus>,
    event_id: Option<String>,
    date_from: Option<chrono::NaiveDate>,
    date_to: Option<chrono::NaiveDate>,
}

/// 空值与 `ALL` 表示不筛选
fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("ALL"))
}

impl SubmissionFilter {
    pub fn from_query(query: &SubmissionFilterQuery) -> Result<Self> {
        let status = selected(query.status.as_deref())
            .map(|s| s.parse::<SubmissionStatus>())
            .transpose()
            .map_err(DashboardError::validation)?;

        if let (Some(from), Some(to)) = (query.date_from, query.date_to)
            && from > to
        {
            return Err(DashboardError::validation(
                "date_from must not be later than date_to",
            ));
        }

        Ok(Self {
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            status,
            event_id: selected(query.event_id.as_deref()).map(str::to_string),
            date_from: query.date_from,
            date_to: query.date_to,
        })
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            [&submission.student_name, &submission.plan_title]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(needle))
        });
        let status_ok = self.status.is_none_or(|status| submission.status == status);
        let event_ok = self
            .event_id
            .as_deref()
            .is_none_or(|id| submission.event_id.as_deref() == Some(id));
        let day = submission.submitted_at.date_naive();
        let from_ok = self.date_from.is_none_or(|from| day >= from);
        let to_ok = self.date_to.is_none_or(|to| day <= to);

        search_ok && status_ok && event_ok && from_ok && to_ok
    }
}

/// 拉取全部提交并按条件筛选，最新的在前
pub async fn filter_submissions(
    api: &dyn DashboardApi,
    caller: &Caller,
    query: &SubmissionFilterQuery,
) -> Result<SubmissionListResponse> {
    let filter = SubmissionFilter::from_query(query)?;
    let submissions = api
        .list_submissions(caller, SubmissionListQuery::default())
        .await?;
    let total = submissions.len();

    let mut matched: Vec<&Submission> = submissions.iter().filter(|s| filter.matches(s)).collect();
    matched.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    debug!("Submission filter matched {} of {}", matched.len(), total);

    Ok(SubmissionListResponse {
        matched: matched.len(),
        items: matched.into_iter().map(SubmissionView::from).collect(),
        total,
    })
}

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    caller: Caller,
    query: SubmissionFilterQuery,
) -> ActixResult<HttpResponse> {
    let api = service.get_api(request);

    match filter_submissions(api.as_ref(), &caller, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Query successful"))),
        Err(e) => {
            warn!("Failed to list submissions: {}", e);
            Ok(ApiResponse::<()>::from_error(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryDashboardApi;
    use crate::models::submissions::entities::SubmissionContent;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn submission(
        id: &str,
        student: &str,
        plan: &str,
        event: &str,
        status: SubmissionStatus,
        day: u32,
    ) -> Submission {
        Submission {
            id: id.to_string(),
            event_plan_id: format!("p-{id}"),
            student_id: Some(format!("u-{student}")),
            student_name: Some(student.to_string()),
            plan_title: Some(plan.to_string()),
            event_id: Some(event.to_string()),
            content: SubmissionContent::Text("x".to_string()),
            status,
            submitted_at: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
        }
    }

    fn query() -> SubmissionFilterQuery {
        SubmissionFilterQuery::default()
    }

    #[test]
    fn test_search_matches_student_or_plan_case_insensitive() {
        let s = submission("1", "Asha Rao", "Photo Essay", "e1", SubmissionStatus::Submitted, 10);
        let filter = |search: &str| {
            SubmissionFilter::from_query(&SubmissionFilterQuery {
                search: Some(search.to_string()),
                ..query()
            })
            .unwrap()
        };
        assert!(filter("asha").matches(&s));
        assert!(filter("ESSAY").matches(&s));
        assert!(filter("   ").matches(&s));
        assert!(!filter("ben").matches(&s));
    }

    #[test]
    fn test_all_means_no_filter() {
        let s = submission("1", "Asha", "Essay", "e1", SubmissionStatus::Late, 10);
        let filter = SubmissionFilter::from_query(&SubmissionFilterQuery {
            status: Some("ALL".into()),
            event_id: Some("ALL".into()),
            ..query()
        })
        .unwrap();
        assert_eq!(filter, SubmissionFilter::default());
        assert!(filter.matches(&s));
    }

    #[test]
    fn test_status_and_event_filters() {
        let s = submission("1", "Asha", "Essay", "e1", SubmissionStatus::Pending, 10);
        let pending_e1 = SubmissionFilter::from_query(&SubmissionFilterQuery {
            status: Some("pending".into()),
            event_id: Some("e1".into()),
            ..query()
        })
        .unwrap();
        assert!(pending_e1.matches(&s));

        let submitted = SubmissionFilter::from_query(&SubmissionFilterQuery {
            status: Some("submitted".into()),
            ..query()
        })
        .unwrap();
        assert!(!submitted.matches(&s));

        let other_event = SubmissionFilter::from_query(&SubmissionFilterQuery {
            event_id: Some("e2".into()),
            ..query()
        })
        .unwrap();
        assert!(!other_event.matches(&s));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let s = submission("1", "Asha", "Essay", "e1", SubmissionStatus::Submitted, 10);
        let day = |d| NaiveDate::from_ymd_opt(2025, 6, d);
        let range = |from, to| {
            SubmissionFilter::from_query(&SubmissionFilterQuery {
                date_from: from,
                date_to: to,
                ..query()
            })
            .unwrap()
        };
        assert!(range(day(10), day(10)).matches(&s));
        assert!(range(day(1), None).matches(&s));
        assert!(!range(day(11), None).matches(&s));
        assert!(!range(None, day(9)).matches(&s));
    }

    #[test]
    fn test_invalid_status_and_range_rejected() {
        let bad_status = SubmissionFilter::from_query(&SubmissionFilterQuery {
            status: Some("graded".into()),
            ..query()
        });
        assert_eq!(bad_status.unwrap_err().code(), "E003");

        let backwards = SubmissionFilter::from_query(&SubmissionFilterQuery {
            date_from: NaiveDate::from_ymd_opt(2025, 6, 12),
            date_to: NaiveDate::from_ymd_opt(2025, 6, 10),
            ..query()
        });
        assert!(backwards.is_err());
    }

    #[tokio::test]
    async fn test_filter_submissions_orders_newest_first() {
        let api = MemoryDashboardApi::new();
        api.seed_submissions([
            submission("1", "Asha", "Essay", "e1", SubmissionStatus::Submitted, 8),
            submission("2", "Ben", "Essay", "e1", SubmissionStatus::Submitted, 10),
            submission("3", "Cara", "Poster", "e2", SubmissionStatus::Late, 9),
        ])
        .await;

        let response = filter_submissions(
            &api,
            &Caller::default(),
            &SubmissionFilterQuery {
                search: Some("essay".into()),
                ..query()
            },
        )
        .await
        .unwrap();
        assert_eq!(response.total, 3);
        assert_eq!(response.matched, 2);
        let ids: Vec<&str> = response.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
