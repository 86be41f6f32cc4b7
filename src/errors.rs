//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_dashboard_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum DashboardError {
            $($variant(String),)*
        }

        impl DashboardError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(DashboardError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(DashboardError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(DashboardError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl DashboardError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        DashboardError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_dashboard_errors! {
    Transport("E001", "Upstream Transport Error"),
    UpstreamRejected("E002", "Upstream Rejected Request"),
    Validation("E003", "Validation Error"),
    NotFound("E004", "Resource Not Found"),
    Serialization("E005", "Serialization Error"),
    TimeParse("E006", "Time Parse Error"),
    Configuration("E007", "Configuration Error"),
    SubmissionClosed("E008", "Submission Period Ended"),
    AlreadySubmitted("E009", "Already Submitted"),
    SubmissionInFlight("E010", "Submission In Progress"),
    SubmissionNotRequired("E011", "Submission Not Required"),
    Authentication("E012", "Authentication Error"),
}

impl DashboardError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            DashboardError::Transport(_) => StatusCode::BAD_GATEWAY,
            DashboardError::UpstreamRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Validation(_) | DashboardError::TimeParse(_) => StatusCode::BAD_REQUEST,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::SubmissionClosed(_)
            | DashboardError::AlreadySubmitted(_)
            | DashboardError::SubmissionInFlight(_)
            | DashboardError::SubmissionNotRequired(_) => StatusCode::CONFLICT,
            DashboardError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DashboardError::Serialization(_) | DashboardError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 对应的响应错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DashboardError::Transport(_) => ErrorCode::UpstreamUnavailable,
            DashboardError::UpstreamRejected(_) => ErrorCode::UpstreamRejected,
            DashboardError::Validation(_) | DashboardError::TimeParse(_) => ErrorCode::BadRequest,
            DashboardError::NotFound(_) => ErrorCode::NotFound,
            DashboardError::SubmissionClosed(_) => ErrorCode::SubmissionClosed,
            DashboardError::AlreadySubmitted(_) => ErrorCode::AlreadySubmitted,
            DashboardError::SubmissionInFlight(_) => ErrorCode::SubmissionInFlight,
            DashboardError::SubmissionNotRequired(_) => ErrorCode::SubmissionNotRequired,
            DashboardError::Authentication(_) => ErrorCode::Unauthorized,
            DashboardError::Serialization(_) | DashboardError::Configuration(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DashboardError {}

// 为常见的错误类型实现 From trait
impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::Serialization(err.to_string())
        } else {
            DashboardError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DashboardError::transport("test").code(), "E001");
        assert_eq!(DashboardError::validation("test").code(), "E003");
        assert_eq!(DashboardError::time_parse("test").code(), "E006");
        assert_eq!(DashboardError::submission_in_flight("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            DashboardError::submission_closed("test").error_type(),
            "Submission Period Ended"
        );
        assert_eq!(
            DashboardError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = DashboardError::validation("Response cannot be empty");
        assert_eq!(err.message(), "Response cannot be empty");
    }

    #[test]
    fn test_format_simple() {
        let err = DashboardError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            DashboardError::transport("down").http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            DashboardError::already_submitted("dup").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DashboardError::time_parse("9 o'clock").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DashboardError::submission_closed("late").error_code(),
            ErrorCode::SubmissionClosed
        );
    }
}
