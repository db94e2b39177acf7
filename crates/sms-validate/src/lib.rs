//! Validator: files resolution outcomes and queued parse problems on a
//! data record.
//!
//! Errors are appended in a fixed order (facility, recipient, then parse
//! errors) and never removed. An entry identical to one already on the
//! record is skipped, so validating the same record twice changes nothing.

#![deny(unsafe_code)]

use serde::Serialize;
use sms_model::{DataRecord, RecordError};
use sms_resolve::{FacilityOutcome, RecipientOutcome, Resolution};
use tracing::{debug, info};

/// What a validation pass did to the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Entries appended to `errors` by this pass.
    pub errors_added: usize,
    /// Entries skipped because an identical one was already filed.
    pub duplicates_skipped: usize,
    /// The record carries a clinic after this pass.
    pub clinic_attached: bool,
}

impl ValidationSummary {
    fn file(&mut self, record: &mut DataRecord, error: RecordError) {
        if record.push_error(error) {
            self.errors_added += 1;
        } else {
            self.duplicates_skipped += 1;
        }
    }
}

/// Validate `record` against the resolver's outcome.
///
/// A resolved facility is attached as `related_entities.clinic`. A clinic
/// already on the record is never cleared by a later failed resolution.
pub fn validate(record: &mut DataRecord, resolution: &Resolution) -> ValidationSummary {
    let mut summary = ValidationSummary::default();

    match &resolution.facility {
        FacilityOutcome::Found(entity) => {
            record.related_entities.clinic = Some(entity.as_ref().clone());
        }
        FacilityOutcome::NotFound => {
            summary.file(record, RecordError::facility_not_found());
        }
        FacilityOutcome::Ambiguous { .. } => {
            let error = RecordError::facility_ambiguous(record.from.trim());
            summary.file(record, error);
        }
    }

    if resolution.recipients == RecipientOutcome::NotFound {
        summary.file(record, RecordError::recipient_not_found());
    }

    let queued = std::mem::take(&mut record.parse_errors);
    for error in queued {
        summary.file(record, error);
    }

    summary.clinic_attached = record.clinic().is_some();
    if summary.errors_added > 0 {
        info!(
            errors_added = summary.errors_added,
            total_errors = record.errors.len(),
            "record has validation errors"
        );
    } else {
        debug!(
            duplicates_skipped = summary.duplicates_skipped,
            "record passed validation"
        );
    }
    summary
}
