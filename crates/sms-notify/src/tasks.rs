//! Task Generator and reporter acknowledgement.

use sms_model::{DataRecord, OutboundMessage, Task};
use sms_resolve::RecipientOutcome;
use sms_standards::FormSchema;
use tracing::debug;

use crate::template::render_message;

/// Append one pending task per recipient tier.
///
/// Tiers come in resolver order, so the output is deterministic. A task
/// identical to one already on the record is not added again. Returns the
/// number of tasks added.
pub fn generate_tasks(
    record: &mut DataRecord,
    schema: &FormSchema,
    recipients: &RecipientOutcome,
) -> usize {
    let tiers = recipients.tiers();
    if tiers.is_empty() || schema.tasks.template.is_empty() {
        return 0;
    }

    let message = render_message(schema, &record.fields);
    let mut added = 0;
    for tier in tiers {
        let task = Task::pending(vec![OutboundMessage::new(&tier.phone, &message)]);
        if !record.tasks.contains(&task) {
            record.tasks.push(task);
            added += 1;
        }
    }
    debug!(form = %schema.code, tasks_added = added, "generated tasks");
    added
}

/// Queue the form's acknowledgement reply to the reporter.
///
/// Returns `true` when a response was added.
pub fn acknowledge(record: &mut DataRecord, schema: &FormSchema) -> bool {
    let Some(text) = schema.acknowledgement.as_deref() else {
        return false;
    };
    let response = OutboundMessage::new(record.from.trim(), text);
    if record.responses.contains(&response) {
        return false;
    }
    record.responses.push(response);
    true
}
