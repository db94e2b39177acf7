//! Splitting and typing of `<prefix>!<form-code>!<values>` messages.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use sms_model::{FieldMap, FieldValue, RecordError};
use sms_standards::{FieldType, FormSchema};

/// Gateway timestamp layout: `MM-DD-YY HH:mm`.
pub const SENT_TIMESTAMP_FORMAT: &str = "%m-%d-%y %H:%M";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Structural pieces of a message before any schema is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMessage {
    pub prefix: String,
    pub form_code: String,
    pub values: Vec<String>,
}

/// Split the raw text into prefix, form code, and positional values.
///
/// Values are separated by `#` or `|`; both may appear in one message.
pub fn split_message(raw: &str) -> Result<SplitMessage, RecordError> {
    let mut parts = raw.trim().splitn(3, '!');
    let (Some(prefix), Some(form_code), Some(rest)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(RecordError::sms_format(
            "Message must have the form <prefix>!<form>!<values>.",
        ));
    };

    let form_code = form_code.trim();
    if form_code.is_empty() {
        return Err(RecordError::sms_format("Message has an empty form code."));
    }

    Ok(SplitMessage {
        prefix: prefix.trim().to_string(),
        form_code: form_code.to_string(),
        values: rest
            .split(['#', '|'])
            .map(|value| value.trim().to_string())
            .collect(),
    })
}

/// Parse the gateway's sent timestamp in the configured offset.
///
/// Returns milliseconds since the Unix epoch.
pub fn parse_sent_timestamp(raw: &str, offset: &FixedOffset) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), SENT_TIMESTAMP_FORMAT).ok()?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|moment| moment.timestamp_millis())
}

/// Outcome of zipping positional values onto a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldParse {
    pub fields: FieldMap,
    pub errors: Vec<RecordError>,
}

/// Map values onto the schema's fields in declaration order.
///
/// Every declared field gets an entry. Missing trailing values are null and
/// surplus values are ignored; either mismatch files one format error.
/// Type failures keep the raw text so nothing from the message is lost.
pub fn apply_schema(schema: &FormSchema, values: &[String]) -> FieldParse {
    let mut parse = FieldParse::default();

    if values.len() != schema.fields.len() {
        parse.errors.push(RecordError::sms_format(format!(
            "Form '{}' expects {} values, got {}.",
            schema.code,
            schema.fields.len(),
            values.len()
        )));
    }

    for (idx, field) in schema.fields.iter().enumerate() {
        let Some(raw) = values.get(idx) else {
            parse.fields.insert(field.name.clone(), FieldValue::Null);
            continue;
        };
        let value = match coerce(field.field_type, raw) {
            Ok(value) => value,
            Err(()) => {
                parse.errors.push(RecordError::field_type(
                    &field.name,
                    field.field_type.as_str(),
                    raw,
                ));
                FieldValue::Text(raw.clone())
            }
        };
        parse.fields.insert(field.name.clone(), value);
    }

    parse
}

fn coerce(field_type: FieldType, raw: &str) -> Result<FieldValue, ()> {
    let trimmed = raw.trim();
    match field_type {
        FieldType::String => Ok(FieldValue::Text(trimmed.to_string())),
        _ if trimmed.is_empty() => Ok(FieldValue::Null),
        FieldType::Int => trimmed.parse::<i64>().map(FieldValue::Int).map_err(|_| ()),
        FieldType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_model::ErrorCode;
    use sms_standards::FieldDescriptor;

    fn schema() -> FormSchema {
        let field = |name: &str, field_type| FieldDescriptor {
            name: name.to_string(),
            field_type,
            label: name.to_string(),
        };
        FormSchema {
            code: "VPD".to_string(),
            title: None,
            fields: vec![
                field("facility_id", FieldType::String),
                field("cases", FieldType::Int),
                field("onset", FieldType::Date),
            ],
            aggregates: Vec::new(),
            merge_key: None,
            tasks: Default::default(),
            acknowledgement: None,
        }
    }

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn split_accepts_hash_and_pipe() {
        let split = split_message("1!VPD!abc#3|2012-01-19").unwrap();
        assert_eq!(split.prefix, "1");
        assert_eq!(split.form_code, "VPD");
        assert_eq!(split.values, values(&["abc", "3", "2012-01-19"]));
    }

    #[test]
    fn split_keeps_bangs_in_values() {
        let split = split_message("1!VPD!a!b#2").unwrap();
        assert_eq!(split.values, values(&["a!b", "2"]));
    }

    #[test]
    fn split_rejects_free_text() {
        let err = split_message("hello there").unwrap_err();
        assert_eq!(err.code, ErrorCode::SmsFormatInvalid);
    }

    #[test]
    fn timestamp_is_read_in_offset() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            parse_sent_timestamp("01-19-12 18:45", &utc),
            Some(1_326_998_700_000)
        );

        let chicago = FixedOffset::west_opt(6 * 3600).unwrap();
        assert_eq!(
            parse_sent_timestamp("01-19-12 18:45", &chicago),
            Some(1_326_998_700_000 + 6 * 3_600_000)
        );
    }

    #[test]
    fn timestamp_rejects_other_layouts() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(parse_sent_timestamp("2012-01-19 18:45", &utc), None);
        assert_eq!(parse_sent_timestamp("13-40-12 18:45", &utc), None);
    }

    #[test]
    fn bad_int_keeps_raw_text_and_continues() {
        let parse = apply_schema(&schema(), &values(&["abc", "x3", "2012-01-19"]));
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::FieldTypeInvalid);
        assert_eq!(parse.fields.get("cases"), Some(&FieldValue::Text("x3".to_string())));
        assert_eq!(
            parse.fields.get("onset"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2012, 1, 19).unwrap()))
        );
    }

    #[test]
    fn short_message_nulls_missing_fields() {
        let parse = apply_schema(&schema(), &values(&["abc"]));
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].code, ErrorCode::SmsFormatInvalid);
        let keys: Vec<&str> = parse.fields.keys().collect();
        assert_eq!(keys, vec!["facility_id", "cases", "onset"]);
        assert_eq!(parse.fields.get("cases"), Some(&FieldValue::Null));
    }

    #[test]
    fn empty_int_is_null_without_error() {
        let parse = apply_schema(&schema(), &values(&["abc", "", ""]));
        assert!(parse.errors.is_empty());
        assert_eq!(parse.fields.get("cases"), Some(&FieldValue::Null));
    }
}
