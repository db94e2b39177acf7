//! Synchronous pipeline over a lookup service.
//!
//! Runs the stages back to back for one message:
//!
//! 1. **add_sms** - parse and build the candidate record
//! 2. **resolve** - facility and recipient lookup, validation, tasks
//! 3. **merge** - record-by-key lookup and the storage write. A record
//!    keyed by a resolved clinic falls back to the facility identifier from
//!    the message when nothing is stored under the clinic.
//!
//! The two lookups are the only blocking calls. Nothing is cached between
//! messages.

use sms_model::{InboundMessage, PipelineOptions};
use sms_resolve::{LookupService, resolve_with};
use sms_standards::FormRegistry;
use tracing::{debug, info_span};

use crate::error::Result;
use crate::response::{Callback, Method};
use crate::stages::Stages;

pub struct Pipeline<'a, L> {
    stages: Stages<'a>,
    lookup: L,
}

impl<'a, L: LookupService> Pipeline<'a, L> {
    pub fn new(registry: &'a FormRegistry, options: &'a PipelineOptions, lookup: L) -> Result<Self> {
        Ok(Self {
            stages: Stages::new(registry, options)?,
            lookup,
        })
    }

    /// Process one message into its storage write.
    ///
    /// Fails only when a lookup fails or the merge key matches more than one
    /// stored record.
    pub fn process(&self, message: &InboundMessage) -> Result<Callback> {
        let span = info_span!("process_sms", form = tracing::field::Empty);
        let _guard = span.enter();

        let mut record = self.stages.add_sms(message).body;
        if let Some(form) = record.form.as_deref() {
            span.record("form", form);
        }

        let resolution = resolve_with(
            &self.lookup,
            &record.from,
            record.sent_to.as_deref(),
            self.stages.recipient_policy(&record),
        )?;
        self.stages.apply_resolution(&mut record, &resolution);

        let next = self.stages.after_resolution(record);
        if next.method != Method::Get {
            return Ok(next);
        }
        let record = next.body;
        let mut rows = match record.merge_key() {
            Some(key) => self.lookup.record_by_key(&key)?,
            None => Vec::new(),
        };
        if rows.is_empty()
            && let Some(reported) = record.reported_merge_key()
        {
            debug!("nothing stored under the clinic key; trying the reported facility");
            rows = self.lookup.record_by_key(&reported)?;
        }
        debug!(rows = rows.len(), "fetched stored records for merge key");
        self.stages.merge(record, &rows)
    }
}
