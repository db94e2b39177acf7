//! Record Builder: turns one inbound message into a candidate data record.

use chrono::FixedOffset;
use sms_model::{DataRecord, InboundMessage, ModelError, PipelineOptions, RecordError};
use sms_standards::{FormRegistry, FormSchema};
use tracing::{debug, warn};

use crate::aggregate::apply_aggregates;
use crate::parser::{apply_schema, parse_sent_timestamp, split_message};

/// Builds candidate records against a fixed form registry and options.
///
/// Parse problems are queued on `parse_errors`; the validator files them
/// on `errors` after the resolution outcomes.
#[derive(Debug, Clone)]
pub struct RecordBuilder<'a> {
    registry: &'a FormRegistry,
    options: &'a PipelineOptions,
    offset: FixedOffset,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(
        registry: &'a FormRegistry,
        options: &'a PipelineOptions,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            registry,
            options,
            offset: options.utc_offset()?,
        })
    }

    pub fn registry(&self) -> &'a FormRegistry {
        self.registry
    }

    /// Build the record. Never fails: every problem becomes a record error.
    pub fn build(&self, message: &InboundMessage) -> DataRecord {
        let mut record = DataRecord::new(message, &self.options.default_locale);

        match split_message(&message.message) {
            Ok(split) => match self.registry.get(&split.form_code) {
                Some(schema) => {
                    record.form = Some(schema.code.clone());
                    self.apply_form(&mut record, schema, &split.values);
                }
                None => {
                    warn!(form = %split.form_code, "no schema registered for form");
                    record.form = Some(split.form_code.clone());
                    record
                        .parse_errors
                        .push(RecordError::form_not_found(&split.form_code));
                }
            },
            Err(error) => {
                debug!("message does not follow the form layout");
                record.parse_errors.push(error);
            }
        }
        record.sms_message.form = record.form.clone();

        match message.sent_timestamp.as_deref() {
            Some(raw) => {
                record.reported_date = parse_sent_timestamp(raw, &self.offset);
                if record.reported_date.is_none() {
                    record.parse_errors.push(RecordError::timestamp(raw));
                }
            }
            None => debug!("gateway sent no timestamp; reported_date left unset"),
        }

        record
    }

    fn apply_form(&self, record: &mut DataRecord, schema: &FormSchema, values: &[String]) {
        let parse = apply_schema(schema, values);
        record.fields = parse.fields;
        record.parse_errors.extend(parse.errors);
        apply_aggregates(schema, &mut record.fields);

        if let Some(key) = &schema.merge_key {
            record.facility_id = record.fields.text(&key.facility);
            record.year = record.fields.text(&key.year);
            record.month = record.fields.text(&key.month);
        }

        debug!(
            form = %schema.code,
            fields = record.fields.len(),
            parse_errors = record.parse_errors.len(),
            "parsed form fields"
        );
    }
}
