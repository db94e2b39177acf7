//! Interface to the external key-ordered lookup service.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sms_model::{Entity, MergeKey, RelatedEntities};
use thiserror::Error;

/// One row returned by an index query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRow<T> {
    pub key: Vec<String>,
    pub value: T,
}

impl<T> ViewRow<T> {
    pub fn new(key: Vec<String>, value: T) -> Self {
        Self { key, value }
    }
}

/// Value of a record-by-key row: the stored identity, plus the related
/// entities of the stored record when the index emits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecordRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev")]
    pub rev: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entities: Option<RelatedEntities>,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to read lookup fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lookup fixture: {0}")]
    Json(#[from] serde_json::Error),
}

/// Blocking queries against the document store's indexes.
///
/// Implementations return every row for the key; the resolvers decide what
/// zero, one, or several rows mean.
pub trait LookupService {
    /// Clinic entities whose contact phone equals `phone`.
    fn facility_by_phone(&self, phone: &str) -> Result<Vec<ViewRow<Entity>>, LookupError>;

    /// Records stored under `(year, month, facility)`.
    fn record_by_key(&self, key: &MergeKey)
    -> Result<Vec<ViewRow<StoredRecordRef>>, LookupError>;
}

impl<T: LookupService + ?Sized> LookupService for &T {
    fn facility_by_phone(&self, phone: &str) -> Result<Vec<ViewRow<Entity>>, LookupError> {
        (**self).facility_by_phone(phone)
    }

    fn record_by_key(
        &self,
        key: &MergeKey,
    ) -> Result<Vec<ViewRow<StoredRecordRef>>, LookupError> {
        (**self).record_by_key(key)
    }
}
