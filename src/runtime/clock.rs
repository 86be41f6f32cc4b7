//! 时钟与定时广播
//!
//! 所有“当前时间”都通过 `Clock` 获取，便于测试时固定时间。
//! `ClockTicker` 按固定间隔采样时钟，并通过 watch 通道广播最新时刻与阶段。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::config::AppConfig;
use crate::schedule::{DayPhase, classify_phase};

pub trait Clock: Send + Sync {
    /// 带时区偏移的当前时刻
    fn now(&self) -> DateTime<FixedOffset>;

    /// 本地挂钟时间，阶段与截止时间均以此为准
    fn local_now(&self) -> NaiveDateTime {
        self.now().naive_local()
    }
}

/// 系统时钟
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// `offset_minutes` 为空时使用本机时区
    pub fn new(offset_minutes: Option<i32>) -> Self {
        let offset = offset_minutes.and_then(|minutes| {
            let offset = FixedOffset::east_opt(minutes * 60);
            if offset.is_none() {
                warn!(
                    "Ignoring out-of-range UTC offset of {} minutes, using host timezone",
                    minutes
                );
            }
            offset
        });
        Self { offset }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.clock.utc_offset_minutes)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// 可手动拨动的时钟，用于测试和演示
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            current: Mutex::new(now),
        }
    }

    /// 以 UTC 偏移 0 固定在给定的挂钟时间
    pub fn at(local: NaiveDateTime) -> Self {
        Self::new(Utc.from_utc_datetime(&local).fixed_offset())
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.lock() = now;
    }

    pub fn set_local(&self, local: NaiveDateTime) {
        let mut current = self.lock();
        let offset = *current.offset();
        *current = DateTime::from_naive_utc_and_offset(local - offset, offset);
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut current = self.lock();
        *current += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<FixedOffset>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.lock()
    }
}

/// 一次时钟采样
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/clock.ts")]
pub struct ClockTick {
    pub now: NaiveDateTime,
    pub phase: DayPhase,
}

impl ClockTick {
    pub fn sample(clock: &dyn Clock) -> Self {
        let now = clock.local_now();
        Self {
            now,
            phase: classify_phase(&now),
        }
    }
}

/// 周期性采样时钟的后台任务
///
/// 丢弃时会中止任务。
pub struct ClockTicker {
    ticks: watch::Receiver<ClockTick>,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ClockTicker {
    /// 启动后台任务，需要在 tokio 运行时中调用
    pub fn spawn(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let first = ClockTick::sample(clock.as_ref());
        let (tick_tx, ticks) = watch::channel(first);
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last_phase = first.phase;

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let tick = ClockTick::sample(clock.as_ref());
                        if tick.phase != last_phase {
                            info!("Day phase changed: {} -> {}", last_phase, tick.phase);
                            last_phase = tick.phase;
                        }
                        // 没有订阅者时也保留最新值
                        tick_tx.send_replace(tick);
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Clock ticker stopped");
        });

        debug!("Clock ticker started with {:?} interval", interval);
        Self {
            ticks,
            stop_tx,
            handle,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ClockTick> {
        self.ticks.clone()
    }

    pub fn latest(&self) -> ClockTick {
        *self.ticks.borrow()
    }

    /// 请求停止，幂等
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
