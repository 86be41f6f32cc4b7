use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::client::Caller;

/// 网关注入的学生身份头
pub const STUDENT_ID_HEADER: &str = "X-Student-Id";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 从请求头提取调用者身份，缺失时为空，由具体接口决定是否必需
impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let headers = req.headers();
        let bearer_token = header_value(headers, AUTHORIZATION.as_str()).and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
                .map(|token| token.trim().to_string())
        });

        ready(Ok(Caller {
            student_id: header_value(headers, STUDENT_ID_HEADER),
            bearer_token,
        }))
    }
}
