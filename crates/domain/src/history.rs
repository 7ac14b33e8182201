//! Run history: bounded, newest-first execution records with pass/fail counters.

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

use crate::id::RunId;
use crate::step::StepResult;
use crate::time::Timestamp;

/// Step results of exactly one iteration, in step order.
///
/// Serializes as the bare step-result array. The id, iteration number and
/// timestamps are only exposed to Rust callers and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    pub id: RunId,
    /// 1-based iteration number.
    pub iteration: u64,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub steps: Vec<StepResult>,
}

impl ExecutionRecord {
    #[must_use]
    pub fn new(
        iteration: u64,
        started_at: Timestamp,
        finished_at: Timestamp,
        steps: Vec<StepResult>,
    ) -> Self {
        Self {
            id: RunId::new(),
            iteration,
            started_at,
            finished_at,
            steps,
        }
    }

    /// An iteration passes only when every step passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| step.passed)
    }
}

impl Serialize for ExecutionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.steps.serialize(serializer)
    }
}

/// Per-action history.
///
/// `records[0]` is always the most recent iteration. Counters keep growing
/// after the records they describe have been evicted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHistory {
    pub repeats: u64,
    pub pass_count: u64,
    pub fail_count: u64,
    #[serde(rename = "stepResults")]
    records: VecDeque<ExecutionRecord>,
}

impl RunHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an iteration: push it to the front, evict from the back beyond
    /// `capacity`, and bump `repeats` plus exactly one of the counters.
    pub fn record(&mut self, record: ExecutionRecord, capacity: usize) {
        if record.passed() {
            self.pass_count += 1;
        } else {
            self.fail_count += 1;
        }
        self.repeats += 1;
        self.records.push_front(record);
        self.records.truncate(capacity.max(1));
    }

    /// Records, newest first.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &ExecutionRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ExecutionRecord> {
        self.records.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
