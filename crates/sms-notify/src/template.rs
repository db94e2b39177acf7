use sms_model::FieldMap;
use sms_standards::FormSchema;

/// Separator between rendered `Label: value` pairs.
pub const PAIR_SEPARATOR: &str = ", ";

/// Render the form's task template against parsed fields.
///
/// Each template entry becomes `Label: value`. A missing or null field
/// renders with an empty value so the message layout stays fixed.
pub fn render_message(schema: &FormSchema, fields: &FieldMap) -> String {
    schema
        .tasks
        .template
        .iter()
        .map(|name| {
            let value = fields.get(name).map(ToString::to_string).unwrap_or_default();
            format!("{}: {}", schema.label_for(name), value)
        })
        .collect::<Vec<_>>()
        .join(PAIR_SEPARATOR)
}
