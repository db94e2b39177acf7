//! The canonical data record produced from one inbound SMS.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::field::FieldMap;
use crate::issue::{ErrorCode, RecordError};
use crate::task::{OutboundMessage, Task};

/// Raw message fields as delivered by the SMS gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    pub message: String,
    #[serde(default)]
    pub sent_timestamp: Option<String>,
    #[serde(default)]
    pub sent_to: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsMessageKind {
    #[default]
    SmsMessage,
}

/// Copy of the inbound message embedded in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub from: String,
    pub message: String,
    pub sent_timestamp: Option<String>,
    pub sent_to: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: SmsMessageKind,
    pub locale: String,
    pub form: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    DataRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntities {
    pub clinic: Option<Entity>,
}

/// Store identity of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev")]
    pub rev: String,
}

/// Key used to find an earlier record for the same reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeKey {
    pub year: String,
    pub month: String,
    pub facility: String,
}

impl MergeKey {
    /// Key as laid out in the record-by-key index.
    pub fn view_key(&self) -> Vec<String> {
        vec![self.year.clone(), self.month.clone(), self.facility.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: RecordKind,
    pub form: Option<String>,
    /// Milliseconds since the Unix epoch, unset when the timestamp was invalid.
    #[serde(default)]
    pub reported_date: Option<i64>,
    pub from: String,
    pub sent_to: Option<String>,
    pub raw_message: String,
    pub sms_message: SmsMessage,
    #[serde(default)]
    pub fields: FieldMap,
    pub facility_id: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    #[serde(default)]
    pub related_entities: RelatedEntities,
    #[serde(default)]
    pub errors: Vec<RecordError>,
    #[serde(default)]
    pub responses: Vec<OutboundMessage>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Parse problems waiting for the validator to file them after the
    /// resolution errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<RecordError>,
}

impl DataRecord {
    pub fn new(message: &InboundMessage, locale: &str) -> Self {
        Self {
            id: None,
            rev: None,
            kind: RecordKind::DataRecord,
            form: None,
            reported_date: None,
            from: message.from.clone(),
            sent_to: message.sent_to.clone(),
            raw_message: message.message.clone(),
            sms_message: SmsMessage {
                from: message.from.clone(),
                message: message.message.clone(),
                sent_timestamp: message.sent_timestamp.clone(),
                sent_to: message.sent_to.clone(),
                kind: SmsMessageKind::SmsMessage,
                locale: message.locale.clone().unwrap_or_else(|| locale.to_string()),
                form: None,
            },
            fields: FieldMap::new(),
            facility_id: None,
            year: None,
            month: None,
            related_entities: RelatedEntities::default(),
            errors: Vec::new(),
            responses: Vec::new(),
            tasks: Vec::new(),
            parse_errors: Vec::new(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        match (&self.id, &self.rev) {
            (Some(id), Some(rev)) => Some(Identity {
                id: id.clone(),
                rev: rev.clone(),
            }),
            _ => None,
        }
    }

    pub fn assign_identity(&mut self, identity: &Identity) {
        self.id = Some(identity.id.clone());
        self.rev = Some(identity.rev.clone());
    }

    pub fn clinic(&self) -> Option<&Entity> {
        self.related_entities.clinic.as_ref()
    }

    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|error| error.code == code)
    }

    /// Append an error unless an identical entry is already filed.
    ///
    /// Returns `true` when the error was added.
    pub fn push_error(&mut self, error: RecordError) -> bool {
        if self.errors.contains(&error) {
            return false;
        }
        self.errors.push(error);
        true
    }

    /// Merge key for this record: the resolved clinic id when known,
    /// otherwise the facility identifier from the message.
    pub fn merge_key(&self) -> Option<MergeKey> {
        let facility = self
            .clinic()
            .and_then(|clinic| clinic.id.clone())
            .or_else(|| self.facility_id.clone())?;
        Some(MergeKey {
            year: self.year.clone()?,
            month: self.month.clone()?,
            facility,
        })
    }

    /// Key under the facility identifier from the message, when the merge
    /// key uses a resolved clinic id that differs from it.
    ///
    /// A record stored before its clinic resolved sits under this key.
    pub fn reported_merge_key(&self) -> Option<MergeKey> {
        let key = self.merge_key()?;
        let reported = self.facility_id.clone()?;
        (key.facility != reported).then_some(MergeKey {
            facility: reported,
            ..key
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound() -> InboundMessage {
        InboundMessage {
            from: "+13125551212".to_string(),
            message: "1!TEST!facility#2011#11".to_string(),
            sent_timestamp: Some("01-19-12 18:45".to_string()),
            sent_to: Some("+15551212".to_string()),
            locale: None,
        }
    }

    #[test]
    fn push_error_skips_duplicates() {
        let mut record = DataRecord::new(&inbound(), "en");
        assert!(record.push_error(RecordError::facility_not_found()));
        assert!(!record.push_error(RecordError::facility_not_found()));
        assert_eq!(record.errors.len(), 1);
    }

    #[test]
    fn merge_key_prefers_clinic_id() {
        let mut record = DataRecord::new(&inbound(), "en");
        record.year = Some("2011".to_string());
        record.month = Some("11".to_string());
        record.facility_id = Some("facility".to_string());
        assert_eq!(record.merge_key().map(|key| key.facility).as_deref(), Some("facility"));

        record.related_entities.clinic = Some(Entity::new("clinic").with_id("abc"));
        assert_eq!(record.merge_key().map(|key| key.facility).as_deref(), Some("abc"));
    }

    #[test]
    fn reported_key_only_when_clinic_differs() {
        let mut record = DataRecord::new(&inbound(), "en");
        record.year = Some("2011".to_string());
        record.month = Some("11".to_string());
        record.facility_id = Some("facility".to_string());
        assert_eq!(record.reported_merge_key(), None);

        record.related_entities.clinic = Some(Entity::new("clinic").with_id("abc"));
        let reported = record.reported_merge_key().expect("reported key");
        assert_eq!(reported.facility, "facility");
        assert_eq!(reported.year, "2011");

        record.related_entities.clinic = Some(Entity::new("clinic").with_id("facility"));
        assert_eq!(record.reported_merge_key(), None);
    }

    #[test]
    fn merge_key_requires_period() {
        let mut record = DataRecord::new(&inbound(), "en");
        record.facility_id = Some("facility".to_string());
        record.year = Some("2011".to_string());
        assert!(record.merge_key().is_none());
    }
}
