//! Schema-declared derived fields.

use sms_model::{FieldMap, FieldValue};
use sms_standards::{AggregateRule, FormSchema};

/// Apply every aggregate of `schema` to `fields`, in declaration order.
///
/// A source that is missing or not an integer makes the aggregate null.
pub fn apply_aggregates(schema: &FormSchema, fields: &mut FieldMap) {
    for aggregate in &schema.aggregates {
        let value = evaluate(aggregate, fields);
        fields.insert(aggregate.target(), value);
    }
}

fn evaluate(aggregate: &AggregateRule, fields: &FieldMap) -> FieldValue {
    match aggregate {
        AggregateRule::Flag {
            source, threshold, ..
        } => match fields.get(source).and_then(FieldValue::as_int) {
            Some(value) => FieldValue::Bool(value >= *threshold),
            None => FieldValue::Null,
        },
        AggregateRule::Sum { sources, .. } => sources
            .iter()
            .try_fold(0i64, |total, source| {
                let value = fields.get(source).and_then(FieldValue::as_int)?;
                total.checked_add(value)
            })
            .map_or(FieldValue::Null, FieldValue::Int),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_standards::{FieldDescriptor, FieldType};

    fn schema(aggregates: Vec<AggregateRule>) -> FormSchema {
        FormSchema {
            code: "AGG".to_string(),
            title: None,
            fields: vec![
                FieldDescriptor {
                    name: "a".to_string(),
                    field_type: FieldType::Int,
                    label: "A".to_string(),
                },
                FieldDescriptor {
                    name: "b".to_string(),
                    field_type: FieldType::Int,
                    label: "B".to_string(),
                },
            ],
            aggregates,
            merge_key: None,
            tasks: Default::default(),
            acknowledgement: None,
        }
    }

    fn fields(a: FieldValue, b: FieldValue) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("a", a);
        fields.insert("b", b);
        fields
    }

    #[test]
    fn flag_replaces_source_in_place() {
        let schema = schema(vec![AggregateRule::Flag {
            target: "a".to_string(),
            source: "a".to_string(),
            threshold: 1,
            label: None,
        }]);
        let mut values = fields(FieldValue::Int(0), FieldValue::Int(4));
        apply_aggregates(&schema, &mut values);

        let keys: Vec<&str> = values.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(values.get("a"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn sum_appends_new_field() {
        let schema = schema(vec![AggregateRule::Sum {
            target: "total".to_string(),
            sources: vec!["a".to_string(), "b".to_string()],
            label: None,
        }]);
        let mut values = fields(FieldValue::Int(3), FieldValue::Int(4));
        apply_aggregates(&schema, &mut values);
        assert_eq!(values.get("total"), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn mistyped_source_yields_null() {
        let schema = schema(vec![AggregateRule::Sum {
            target: "total".to_string(),
            sources: vec!["a".to_string(), "b".to_string()],
            label: None,
        }]);
        let mut values = fields(FieldValue::Int(3), FieldValue::Text("x".to_string()));
        apply_aggregates(&schema, &mut values);
        assert_eq!(values.get("total"), Some(&FieldValue::Null));
    }
}
