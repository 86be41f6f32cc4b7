use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 活动列表查询参数（上游 `GET /event-plans`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl ActivityListQuery {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            event_id: None,
        }
    }
}
