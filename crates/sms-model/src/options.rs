//! Configuration options for SMS processing.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Options controlling record construction and callback paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Offset of the gateway's local time from UTC.
    ///
    /// `sent_timestamp` carries no zone, so it is read in this offset.
    pub utc_offset_minutes: i32,

    /// Path of the document collection; creates POST here, replaces PUT
    /// to `<collection_root>/<id>`.
    pub collection_root: String,

    /// Prefix for the staged callback paths.
    pub base_url: String,

    /// Locale used when the gateway does not send one.
    pub default_locale: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            collection_root: "/kujua".to_string(),
            base_url: "/kujua/_design/kujua-sms/_rewrite".to_string(),
            default_locale: "en".to_string(),
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn with_collection_root(mut self, root: impl Into<String>) -> Self {
        self.collection_root = root.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        if self.utc_offset_minutes.abs() >= MAX_OFFSET_MINUTES {
            return Err(ModelError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(ModelError::InvalidUtcOffset(self.utc_offset_minutes))
    }
}
