//! Record building against the default form definitions.

use std::sync::OnceLock;

use proptest::prelude::*;
use sms_ingest::RecordBuilder;
use sms_model::{ErrorCode, FieldValue, InboundMessage, PipelineOptions};
use sms_standards::FormRegistry;

fn registry() -> &'static FormRegistry {
    static REGISTRY: OnceLock<FormRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| FormRegistry::load_default().expect("load forms"))
}

fn inbound(text: &str) -> InboundMessage {
    InboundMessage {
        from: "+13125551212".to_string(),
        message: text.to_string(),
        sent_timestamp: Some("01-19-12 18:45".to_string()),
        sent_to: Some("+15551212".to_string()),
        locale: None,
    }
}

const EXAMPLE: &str = "1!TEST!facility#2011#11#0#1#2#3#4#5#6#9#8#7#6#5#4";

#[test]
fn builds_test_form_fields_in_schema_order() {
    let options = PipelineOptions::default();
    let builder = RecordBuilder::new(registry(), &options).unwrap();
    let record = builder.build(&inbound(EXAMPLE));

    let schema = registry().get("TEST").unwrap();
    let keys: Vec<&str> = record.fields.keys().collect();
    let expected: Vec<&str> = schema.field_names().collect();
    assert_eq!(keys, expected);

    assert_eq!(record.form.as_deref(), Some("TEST"));
    assert_eq!(record.sms_message.form.as_deref(), Some("TEST"));
    assert_eq!(record.facility_id.as_deref(), Some("facility"));
    assert_eq!(record.year.as_deref(), Some("2011"));
    assert_eq!(record.month.as_deref(), Some("11"));
    assert_eq!(
        record.fields.get("misoprostol_administered"),
        Some(&FieldValue::Bool(false))
    );
    assert_eq!(
        record.fields.get("quantity_dispensed.eye_ointment"),
        Some(&FieldValue::Int(6))
    );
    assert_eq!(
        record.fields.get("days_stocked_out.la_6x1"),
        Some(&FieldValue::Int(9))
    );
    assert_eq!(record.reported_date, Some(1_326_998_700_000));
    assert!(record.parse_errors.is_empty());
    assert!(record.errors.is_empty());
    assert!(record.tasks.is_empty());
    assert!(record.related_entities.clinic.is_none());
}

#[test]
fn form_code_matches_case_insensitively() {
    let options = PipelineOptions::default();
    let builder = RecordBuilder::new(registry(), &options).unwrap();
    let record = builder.build(&inbound(&EXAMPLE.replace("TEST", "test")));
    assert_eq!(record.form.as_deref(), Some("TEST"));
    assert!(record.parse_errors.is_empty());
}

#[test]
fn unknown_form_keeps_code_and_queues_error() {
    let options = PipelineOptions::default();
    let builder = RecordBuilder::new(registry(), &options).unwrap();
    let record = builder.build(&inbound("1!NOPE!a#b"));

    assert_eq!(record.form.as_deref(), Some("NOPE"));
    assert!(record.fields.is_empty());
    assert_eq!(record.parse_errors.len(), 1);
    assert_eq!(record.parse_errors[0].code, ErrorCode::FormNotFound);
    assert!(record.merge_key().is_none());
}

#[test]
fn invalid_timestamp_leaves_reported_date_unset() {
    let options = PipelineOptions::default();
    let builder = RecordBuilder::new(registry(), &options).unwrap();
    let mut message = inbound(EXAMPLE);
    message.sent_timestamp = Some("yesterday".to_string());
    let record = builder.build(&message);

    assert_eq!(record.reported_date, None);
    assert_eq!(record.parse_errors.len(), 1);
    assert_eq!(record.parse_errors[0].code, ErrorCode::TimestampInvalid);
}

#[test]
fn type_error_is_queued_and_parsing_continues() {
    let options = PipelineOptions::default();
    let builder = RecordBuilder::new(registry(), &options).unwrap();
    let record = builder.build(&inbound(&EXAMPLE.replace("#1#2#", "#one#2#")));

    assert_eq!(record.parse_errors.len(), 1);
    assert_eq!(record.parse_errors[0].code, ErrorCode::FieldTypeInvalid);
    assert_eq!(
        record.fields.get("quantity_dispensed.la_6x1"),
        Some(&FieldValue::Text("one".to_string()))
    );
    assert_eq!(
        record.fields.get("quantity_dispensed.la_6x2"),
        Some(&FieldValue::Int(2))
    );
}

#[test]
fn configured_offset_shifts_reported_date() {
    let options = PipelineOptions::default().with_utc_offset_minutes(180);
    let builder = RecordBuilder::new(registry(), &options).unwrap();
    let record = builder.build(&inbound(EXAMPLE));
    assert_eq!(record.reported_date, Some(1_326_998_700_000 - 3 * 3_600_000));
}

#[test]
fn rejects_invalid_offset() {
    let options = PipelineOptions::default().with_utc_offset_minutes(-5000);
    assert!(RecordBuilder::new(registry(), &options).is_err());
}

proptest! {
    #[test]
    fn parsing_is_deterministic_and_schema_ordered(
        counts in proptest::collection::vec(0u32..10_000, 13)
    ) {
        let joined: Vec<String> = counts.iter().map(u32::to_string).collect();
        let text = format!("1!TEST!clinic-7#2012#3#{}", joined.join("#"));

        let options = PipelineOptions::default();
        let builder = RecordBuilder::new(registry(), &options).unwrap();
        let first = builder.build(&inbound(&text));
        let second = builder.build(&inbound(&text));

        prop_assert_eq!(&first.fields, &second.fields);
        prop_assert_eq!(&first.tasks, &second.tasks);
        prop_assert!(first.parse_errors.is_empty());

        let schema = registry().get("TEST").unwrap();
        let keys: Vec<&str> = first.fields.keys().collect();
        let expected: Vec<&str> = schema.field_names().collect();
        prop_assert_eq!(keys, expected);
        prop_assert_eq!(
            first.fields.get("misoprostol_administered"),
            Some(&FieldValue::Bool(counts[0] >= 1))
        );
    }
}
