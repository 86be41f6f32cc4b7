use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 响应错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,

    // 上游 API 错误
    UpstreamUnavailable = 2000,
    UpstreamRejected = 2001,

    // 提交相关错误
    SubmissionClosed = 3000,
    AlreadySubmitted = 3001,
    SubmissionInFlight = 3002,
    SubmissionNotRequired = 3003,
}
