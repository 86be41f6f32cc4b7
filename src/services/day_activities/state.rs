use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use moka::ops::compute::Op;
use moka::sync::Cache;
use tracing::debug;

use crate::config::SnapshotConfig;
use crate::errors::{DashboardError, Result};
use crate::models::activities::entities::Activity;
use crate::models::submissions::entities::Submission;

const DEFAULT_TTL_SECS: u64 = 900;
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// 某个学生最近一次加载的当日数据
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
    pub submissions: Vec<Submission>,
    pub fetched_at: NaiveDateTime,
}

impl Snapshot {
    pub fn activity(&self, plan_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == plan_id)
    }
}

#[derive(Debug, Clone, Default)]
struct StudentState {
    snapshot: Option<Snapshot>,
    // 本地已并入、上游列表中尚未出现的提交
    pending: Vec<Submission>,
}

fn upsert(list: &mut Vec<Submission>, submission: &Submission) {
    match list.iter_mut().find(|s| s.id == submission.id) {
        Some(existing) => *existing = submission.clone(),
        None => list.push(submission.clone()),
    }
}

/// 按学生保存的视图快照，以及正在进行的提交
///
/// 快照带 TTL 和容量上限，过期后由上游重新拉取。
pub struct SnapshotStore {
    students: Cache<String, StudentState>,
    // (学生, 活动)
    in_flight: DashMap<(String, String), ()>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::with_limits(Duration::from_secs(DEFAULT_TTL_SECS), DEFAULT_MAX_CAPACITY)
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::with_limits(Duration::from_secs(config.ttl), config.max_capacity)
    }

    pub fn with_limits(ttl: Duration, max_capacity: u64) -> Self {
        debug!(
            "SnapshotStore initialized with ttl {:?} and max capacity {}",
            ttl, max_capacity
        );
        Self {
            students: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
            in_flight: DashMap::new(),
        }
    }

    /// 用刷新结果替换快照
    ///
    /// 刷新开始后才并入的提交不会被旧列表覆盖。
    pub fn replace(&self, student_id: &str, mut snapshot: Snapshot) {
        self.students
            .entry_by_ref(student_id)
            .and_compute_with(|existing| {
                let mut pending = existing
                    .map(|entry| entry.into_value().pending)
                    .unwrap_or_default();
                pending.retain(|p| !snapshot.submissions.iter().any(|s| s.id == p.id));
                for submission in &pending {
                    snapshot.submissions.push(submission.clone());
                }
                if !pending.is_empty() {
                    debug!(
                        "Kept {} locally merged submissions for {} across refresh",
                        pending.len(),
                        student_id
                    );
                }
                Op::Put(StudentState {
                    snapshot: Some(snapshot),
                    pending,
                })
            });
    }

    pub fn get(&self, student_id: &str) -> Option<Snapshot> {
        self.students.get(student_id).and_then(|s| s.snapshot)
    }

    /// 本地已并入但上游尚未返回的提交
    pub fn pending(&self, student_id: &str) -> Vec<Submission> {
        self.students
            .get(student_id)
            .map(|s| s.pending)
            .unwrap_or_default()
    }

    /// 将新提交并入学生快照，同 ID 的记录会被替换
    pub fn merge_submission(&self, student_id: &str, submission: &Submission) {
        self.students
            .entry_by_ref(student_id)
            .and_compute_with(|existing| {
                let mut state = existing.map(|entry| entry.into_value()).unwrap_or_default();
                if let Some(snapshot) = state.snapshot.as_mut() {
                    upsert(&mut snapshot.submissions, submission);
                }
                upsert(&mut state.pending, submission);
                Op::Put(state)
            });
        debug!(
            "Merged submission {} into snapshot of {}",
            submission.id, student_id
        );
    }

    /// 标记提交开始，同一学生同一活动同时只能有一个
    pub fn begin_submission(&self, student_id: &str, plan_id: &str) -> Result<InFlightGuard<'_>> {
        let key = (student_id.to_string(), plan_id.to_string());
        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => Err(DashboardError::submission_in_flight(
                "A submission for this activity is already in progress",
            )),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlightGuard { store: self, key })
            }
        }
    }

    pub fn is_in_flight(&self, student_id: &str, plan_id: &str) -> bool {
        self.in_flight
            .contains_key(&(student_id.to_string(), plan_id.to_string()))
    }
}

/// 离开作用域时释放进行中标记
#[must_use]
pub struct InFlightGuard<'a> {
    store: &'a SnapshotStore,
    key: (String, String),
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.store.in_flight.remove(&self.key);
    }
}
