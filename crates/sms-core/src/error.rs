use sms_model::{MergeKey, ModelError};
use sms_resolve::LookupError;
use thiserror::Error;

/// Failures that abort processing of a message.
///
/// Everything else is filed on the record as a `RecordError`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("invalid pipeline options: {0}")]
    Options(#[from] ModelError),
    #[error(
        "{rows} stored records match {}/{}/{}; refusing to pick one",
        .key.year, .key.month, .key.facility
    )]
    AmbiguousMatch { key: MergeKey, rows: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
