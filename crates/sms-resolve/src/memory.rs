//! In-memory lookup service backed by fixture data.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sms_model::{Entity, MergeKey};

use crate::lookup::{LookupError, LookupService, StoredRecordRef, ViewRow};

/// A stored record as the record-by-key index sees it.
///
/// The index emits the record under its merge key and, when set, under the
/// facility identifier its message reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub key: MergeKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(flatten)]
    pub value: StoredRecordRef,
}

impl StoredRecord {
    pub fn new(key: MergeKey, value: StoredRecordRef) -> Self {
        Self {
            key,
            facility_id: None,
            value,
        }
    }

    pub fn with_facility_id(mut self, facility_id: impl Into<String>) -> Self {
        self.facility_id = Some(facility_id.into());
        self
    }

    fn indexed_under(&self, key: &MergeKey) -> bool {
        if self.key == *key {
            return true;
        }
        self.facility_id.as_deref() == Some(key.facility.as_str())
            && self.key.year == key.year
            && self.key.month == key.month
    }
}

/// Lookup service over owned lists of facilities and stored records.
///
/// Facilities are indexed by their own contact phone, the way the
/// document store's phone view emits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLookup {
    #[serde(default)]
    pub facilities: Vec<Entity>,
    #[serde(default)]
    pub records: Vec<StoredRecord>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facility(mut self, entity: Entity) -> Self {
        self.facilities.push(entity);
        self
    }

    pub fn with_record(self, key: MergeKey, value: StoredRecordRef) -> Self {
        self.with_stored(StoredRecord::new(key, value))
    }

    pub fn with_stored(mut self, record: StoredRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn from_json(contents: &str) -> Result<Self, LookupError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LookupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}

impl LookupService for MemoryLookup {
    fn facility_by_phone(&self, phone: &str) -> Result<Vec<ViewRow<Entity>>, LookupError> {
        let phone = phone.trim();
        Ok(self
            .facilities
            .iter()
            .filter(|entity| entity.contact_phone() == Some(phone))
            .map(|entity| ViewRow::new(vec![phone.to_string()], entity.clone()))
            .collect())
    }

    fn record_by_key(
        &self,
        key: &MergeKey,
    ) -> Result<Vec<ViewRow<StoredRecordRef>>, LookupError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.indexed_under(key))
            .map(|record| ViewRow::new(key.view_key(), record.value.clone()))
            .collect())
    }
}
