//! 12 小时制时间（如 `9:00 AM`）与日历日期解析
//!
//! 格式不合法时直接返回 `TimeParse` 错误，不做任何默认回退。

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DashboardError;

/// 上午 / 下午
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl FromStr for Meridiem {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("AM") {
            Ok(Meridiem::Am)
        } else if s.eq_ignore_ascii_case("PM") {
            Ok(Meridiem::Pm)
        } else {
            Err(DashboardError::time_parse(format!(
                "Invalid meridiem marker '{s}', expected AM or PM"
            )))
        }
    }
}

/// 一天中的时刻，按分钟精度保存
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// 24 小时制的小时
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

/// 将 12 小时制的小时转换为 24 小时制
///
/// 12 AM → 0，12 PM 保持 12，其余 PM 加 12。
fn to_24_hour(hour: u32, meridiem: Meridiem) -> u32 {
    match (meridiem, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    }
}

fn parse_component(value: &str, what: &str, input: &str) -> Result<u32, DashboardError> {
    if value.is_empty() || value.len() > 2 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(DashboardError::time_parse(format!(
            "Invalid {what} in time '{input}'"
        )));
    }
    value
        .parse::<u32>()
        .map_err(|_| DashboardError::time_parse(format!("Invalid {what} in time '{input}'")))
}

impl FromStr for ClockTime {
    type Err = DashboardError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();

        // 数字部分与上下午标记，允许 "9:00AM" 这种无空格写法
        let (numeral, marker) = match trimmed.split_once(char::is_whitespace) {
            Some((numeral, marker)) => (numeral.trim(), marker.trim()),
            None if trimmed.len() > 2 && trimmed.is_char_boundary(trimmed.len() - 2) => {
                trimmed.split_at(trimmed.len() - 2)
            }
            None => {
                return Err(DashboardError::time_parse(format!(
                    "Missing AM/PM marker in time '{input}'"
                )));
            }
        };

        let meridiem: Meridiem = marker.parse()?;

        let (hours, minutes) = numeral.split_once(':').ok_or_else(|| {
            DashboardError::time_parse(format!("Expected h:mm in time '{input}'"))
        })?;
        let hour = parse_component(hours, "hour", input)?;
        let minute = parse_component(minutes, "minute", input)?;

        if !(1..=12).contains(&hour) {
            return Err(DashboardError::time_parse(format!(
                "Hour must be between 1 and 12 in time '{input}'"
            )));
        }

        ClockTime::from_hm(to_24_hour(hour, meridiem), minute).ok_or_else(|| {
            DashboardError::time_parse(format!("Minute out of range in time '{input}'"))
        })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (is_pm, hour12) = self.0.hour12();
        write!(
            f,
            "{}:{:02} {}",
            hour12,
            self.0.minute(),
            if is_pm { "PM" } else { "AM" }
        )
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: DashboardError| serde::de::Error::custom(e.message()))
    }
}

/// 解析活动日期
///
/// 接受 `YYYY-MM-DD` 或以其开头的 ISO 8601 时间戳，只取日历日部分。
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, DashboardError> {
    let trimmed = input.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DashboardError::time_parse(format!("Invalid date '{input}': {e}")))
}
