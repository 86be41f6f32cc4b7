/*!
 * 时钟推送服务
 *
 * 客户端可以轮询当前时刻，也可以订阅 Server-Sent Events 流：
 * ```text
 * GET /api/v1/clock/stream
 * ```
 *
 * 每次采样推送一条事件：
 * ```text
 * event: tick
 * data: {"now":"2025-06-10T09:00:00","phase":"active"}
 * ```
 *
 * 时钟广播停止后流随之结束。
 */

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures_util::Stream;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::ApiResponse;
use crate::runtime::clock::{Clock, ClockTick, ClockTicker};

/// 编码为一条 SSE 事件
pub fn encode_event(tick: &ClockTick) -> web::Bytes {
    match serde_json::to_string(tick) {
        Ok(payload) => web::Bytes::from(format!("event: tick\ndata: {payload}\n\n")),
        Err(e) => {
            warn!("Failed to encode clock tick: {}", e);
            web::Bytes::from_static(b": encoding error\n\n")
        }
    }
}

/// 先推送当前值，之后每次更新推送一次，发送端关闭后结束
pub fn tick_stream(
    rx: watch::Receiver<ClockTick>,
) -> impl Stream<Item = Result<web::Bytes, actix_web::Error>> {
    futures_util::stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            debug!("Clock stream closed");
            return None;
        }
        let tick = *rx.borrow_and_update();
        Some((Ok(encode_event(&tick)), (rx, false)))
    })
}

pub struct ClockService;

impl ClockService {
    pub fn new_lazy() -> Self {
        Self
    }

    fn get_ticker(&self, request: &HttpRequest) -> Option<Arc<ClockTicker>> {
        request
            .app_data::<web::Data<Arc<ClockTicker>>>()
            .map(|ticker| ticker.get_ref().clone())
    }

    /// 当前时刻与阶段
    pub async fn current(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let tick = match self.get_ticker(request) {
            Some(ticker) => ticker.latest(),
            None => {
                let clock = request
                    .app_data::<web::Data<Arc<dyn Clock>>>()
                    .expect("Clock not found in app data");
                ClockTick::sample(clock.get_ref().as_ref())
            }
        };
        Ok(HttpResponse::Ok().json(ApiResponse::success(tick, "Query successful")))
    }

    /// SSE 推送
    pub async fn stream(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let Some(ticker) = self.get_ticker(request) else {
            return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                crate::models::ErrorCode::InternalServerError,
                "Clock ticker is not running",
            )));
        };
        Ok(HttpResponse::Ok()
            .content_type("text/event-stream")
            .insert_header(("Cache-Control", "no-cache"))
            .streaming(tick_stream(ticker.subscribe())))
    }
}
