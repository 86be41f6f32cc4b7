use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 统计时间范围（天）
pub const ALLOWED_TIME_RANGES: [u32; 3] = [7, 14, 30];

/// 分析数据查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct AnalyticsQuery {
    pub event_id: Option<String>,
    // 7 / 14 / 30，缺省为 7
    pub time_range: Option<u32>,
}

impl AnalyticsQuery {
    /// 解析后的时间范围；`ALL` 事件视为不过滤
    pub fn normalized(&self) -> Result<(Option<String>, u32), String> {
        let days = self.time_range.unwrap_or(7);
        if !ALLOWED_TIME_RANGES.contains(&days) {
            return Err(format!("time_range must be one of 7, 14 or 30, got {days}"));
        }
        let event_id = self
            .event_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case("ALL"))
            .map(str::to_string);
        Ok((event_id, days))
    }
}
