//! Collect-and-continue outcome of batch operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One input entry that failed within a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    /// Position of the entry in the input
    pub index: usize,
    /// Identifier of the entry, when one could be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub error: String,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "#{} <{}>: {}", self.index, id, self.error),
            None => write!(f, "#{}: {}", self.index, self.error),
        }
    }
}

/// Successes and per-entry failures of a batch.
///
/// A batch with failures is still an `Ok` outcome of the operation that
/// produced it. Use [`into_result`](Self::into_result) for all-or-nothing
/// callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&mut self, item: T) {
        self.succeeded.push(item);
    }

    pub fn push_err(&mut self, index: usize, id: Option<String>, error: impl fmt::Display) {
        self.failed.push(BatchFailure {
            index,
            id,
            error: error.to_string(),
        });
    }

    /// True when no entry failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Total number of input entries accounted for
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map the successes, keeping failures as-is.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> BatchResult<U> {
        BatchResult {
            succeeded: self.succeeded.into_iter().map(f).collect(),
            failed: self.failed,
        }
    }

    /// Successes paired with their position in the input, plus the failures.
    ///
    /// Successes and failures are both recorded in input order, so the
    /// positions are recovered from the failure indices.
    pub fn into_indexed(self) -> (Vec<(usize, T)>, Vec<BatchFailure>) {
        let failed_at: std::collections::BTreeSet<usize> =
            self.failed.iter().map(|f| f.index).collect();
        let positions = (0..).filter(|i| !failed_at.contains(i));
        let succeeded = positions.zip(self.succeeded).collect();
        (succeeded, self.failed)
    }

    /// All successes, or an error carrying every failure.
    pub fn into_result(self) -> Result<Vec<T>, PartialBatchFailure> {
        if self.failed.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(PartialBatchFailure {
                succeeded: self.succeeded.len(),
                failures: self.failed,
            })
        }
    }
}

/// Strict view of a batch in which some entries failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} of {} entries failed; first: {}", .failures.len(), .succeeded + .failures.len(), first_failure(.failures))]
pub struct PartialBatchFailure {
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

fn first_failure(failures: &[BatchFailure]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
