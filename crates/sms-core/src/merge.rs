//! Merge Resolver: decides whether a record creates or replaces a stored one.

use sms_model::MergeKey;
use sms_resolve::{StoredRecordRef, ViewRow};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Merge state of a record.
///
/// `Candidate` moves to `NoMatch` or `Matched` on the row count of the
/// record-by-key query, and nothing else. Both outcomes are terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MergeState {
    #[default]
    Candidate,
    NoMatch,
    Matched(StoredRecordRef),
}

impl MergeState {
    /// Apply the record-by-key result for `key`.
    ///
    /// More than one row is a hard failure; the rows are never tie-broken.
    pub fn advance(self, key: &MergeKey, rows: &[ViewRow<StoredRecordRef>]) -> Result<Self> {
        if !matches!(self, MergeState::Candidate) {
            return Ok(self);
        }
        let next = match rows {
            [] => MergeState::NoMatch,
            [row] => MergeState::Matched(row.value.clone()),
            many => {
                return Err(PipelineError::AmbiguousMatch {
                    key: key.clone(),
                    rows: many.len(),
                });
            }
        };
        debug!(matched = next.is_matched(), "merge resolved");
        Ok(next)
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MergeState::Matched(_))
    }
}
