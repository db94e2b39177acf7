//! Staged pipeline: each stage takes what the previous callback carried and
//! returns the next callback.
//!
//! 1. [`Stages::add_sms`] builds the record and asks for facility rows.
//! 2. [`Stages::add_facility`] resolves, validates and generates tasks, then
//!    asks for record-by-key rows (or creates directly when the record has
//!    no merge key).
//! 3. [`Stages::merge`] settles the merge state and returns the storage
//!    write.

use sms_ingest::RecordBuilder;
use sms_model::{DataRecord, Entity, InboundMessage, PipelineOptions};
use sms_notify::{acknowledge, generate_tasks};
use sms_resolve::{Resolution, StoredRecordRef, ViewRow, resolve};
use sms_standards::{FormRegistry, TierSelector};
use sms_validate::validate;
use tracing::{debug, info_span};

use crate::error::Result;
use crate::merge::MergeState;
use crate::response::{Callback, Method, compose, encode_segment, join_path};

/// Form path segment used when no form code could be read.
pub const UNKNOWN_FORM_SEGMENT: &str = "unknown";

#[derive(Debug, Clone)]
pub struct Stages<'a> {
    builder: RecordBuilder<'a>,
    options: &'a PipelineOptions,
}

impl<'a> Stages<'a> {
    pub fn new(registry: &'a FormRegistry, options: &'a PipelineOptions) -> Result<Self> {
        Ok(Self {
            builder: RecordBuilder::new(registry, options)?,
            options,
        })
    }

    pub fn options(&self) -> &'a PipelineOptions {
        self.options
    }

    /// Tier selectors of the record's form; empty for unknown forms.
    pub fn recipient_policy(&self, record: &DataRecord) -> &'a [TierSelector] {
        record
            .form
            .as_deref()
            .and_then(|code| self.builder.registry().get(code))
            .map(|schema| schema.tasks.recipients.as_slice())
            .unwrap_or_default()
    }

    /// Stage 1: parse the message and ask for the reporter's facility.
    pub fn add_sms(&self, message: &InboundMessage) -> Callback {
        let _span = info_span!("add_sms").entered();
        let mut record = self.builder.build(message);
        if let Some(schema) = record
            .form
            .as_deref()
            .and_then(|code| self.builder.registry().get(code))
        {
            acknowledge(&mut record, schema);
        }

        let path = join_path(
            &self.options.base_url,
            &[
                &encode_segment(form_segment(&record)),
                "data_record",
                "add",
                "facility",
                &encode_segment(record.from.trim()),
            ],
        );
        Callback::new(path, Method::Get, record)
    }

    /// Stage 2: apply the facility rows fetched for the reporter (and for
    /// `sent_to` when the recipient policy needs it).
    pub fn add_facility(&self, mut record: DataRecord, rows: &[ViewRow<Entity>]) -> Callback {
        let _span = info_span!("add_facility").entered();
        let resolution = resolve(
            rows,
            &record.from,
            record.sent_to.as_deref(),
            self.recipient_policy(&record),
        );
        self.apply_resolution(&mut record, &resolution);
        self.after_resolution(record)
    }

    /// Stage 3: settle the merge and return the storage write.
    pub fn merge(
        &self,
        record: DataRecord,
        rows: &[ViewRow<StoredRecordRef>],
    ) -> Result<Callback> {
        let _span = info_span!("merge").entered();
        let state = match record.merge_key() {
            Some(key) => MergeState::Candidate.advance(&key, rows)?,
            None => MergeState::NoMatch,
        };
        Ok(compose(record, &state, self.options))
    }

    /// File the resolution on the record and generate its tasks.
    pub fn apply_resolution(&self, record: &mut DataRecord, resolution: &Resolution) {
        validate(record, resolution);
        if let Some(schema) = record
            .form
            .as_deref()
            .and_then(|code| self.builder.registry().get(code))
        {
            generate_tasks(record, schema, &resolution.recipients);
        }
    }

    /// Callback after stage 2: the merge lookup, or a create when the
    /// record cannot be keyed.
    pub fn after_resolution(&self, record: DataRecord) -> Callback {
        match record.merge_key() {
            Some(key) => {
                let path = join_path(
                    &self.options.base_url,
                    &[
                        &encode_segment(form_segment(&record)),
                        "data_record",
                        "merge",
                        &encode_segment(&key.year),
                        &encode_segment(&key.month),
                        &encode_segment(&key.facility),
                    ],
                );
                Callback::new(path, Method::Get, record)
            }
            None => {
                debug!("record has no merge key; creating directly");
                compose(record, &MergeState::NoMatch, self.options)
            }
        }
    }
}

fn form_segment(record: &DataRecord) -> &str {
    record.form.as_deref().unwrap_or(UNKNOWN_FORM_SEGMENT)
}
