//! 活动时间判定核心
//!
//! 全部为纯函数：输入活动快照、提交快照和当前时间，输出阶段、状态与可提交性。
//! 不持有任何可变状态，由表现层（services）负责保存快照。
//!
//! - `clock_time`: 12 小时制时间字符串与日历日期解析
//! - `phase`: 一天中的阶段（预览 / 进行中 / 回顾）
//! - `status`: 单个活动的生命周期状态
//! - `eligibility`: 提交窗口判定

pub mod clock_time;
pub mod eligibility;
pub mod phase;
pub mod status;

pub use clock_time::{ClockTime, parse_calendar_date};
pub use eligibility::{can_submit, check_eligibility, find_submission, is_submitted};
pub use phase::{DayPhase, classify_phase};
pub use status::{ActivityStatus, end_of_day, resolve_status, start_instant};
