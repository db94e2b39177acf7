#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::StandardsError;
use crate::paths::forms_path;
use crate::schema::{AggregateRule, FieldType, FormSchema};

#[derive(Debug, Deserialize)]
struct FormsFile {
    #[serde(default)]
    forms: Vec<FormSchema>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistrySummary {
    pub form_count: usize,
    pub field_count: usize,
    pub aggregate_count: usize,
}

/// Immutable lookup of form schemas by code.
///
/// Codes match case-insensitively; the schema keeps the declared spelling.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    forms: BTreeMap<String, FormSchema>,
}

impl FormRegistry {
    pub fn new(forms: Vec<FormSchema>) -> Result<Self, StandardsError> {
        let mut by_code = BTreeMap::new();
        for form in forms {
            validate_form(&form)?;
            let key = form.code.trim().to_ascii_uppercase();
            if by_code.contains_key(&key) {
                return Err(StandardsError::DuplicateForm { code: form.code });
            }
            by_code.insert(key, form);
        }
        Ok(Self { forms: by_code })
    }

    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self, StandardsError> {
        let file: FormsFile = toml::from_str(contents).map_err(|source| StandardsError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        Self::new(file.forms)
    }

    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| StandardsError::io(path, source))?;
        let registry = Self::from_toml_str(&contents, &path.display().to_string())?;
        debug!(
            path = %path.display(),
            forms = registry.len(),
            "loaded form definitions"
        );
        Ok(registry)
    }

    /// Load `forms.toml` from the standards directory.
    pub fn load_default() -> Result<Self, StandardsError> {
        Self::load(&forms_path())
    }

    pub fn get(&self, code: &str) -> Option<&FormSchema> {
        self.forms.get(&code.trim().to_ascii_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormSchema> {
        self.forms.values()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            form_count: self.forms.len(),
            field_count: self.forms.values().map(|form| form.fields.len()).sum(),
            aggregate_count: self.forms.values().map(|form| form.aggregates.len()).sum(),
        }
    }
}

fn validate_form(form: &FormSchema) -> Result<(), StandardsError> {
    if form.code.trim().is_empty() {
        return Err(StandardsError::EmptyFormCode);
    }
    if form.fields.is_empty() {
        return Err(StandardsError::NoFields {
            form: form.code.clone(),
        });
    }

    let mut seen = BTreeSet::new();
    for field in &form.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(StandardsError::DuplicateField {
                form: form.code.clone(),
                field: field.name.clone(),
            });
        }
    }

    for aggregate in &form.aggregates {
        validate_aggregate(form, aggregate)?;
    }

    if let Some(key) = &form.merge_key {
        for name in [&key.facility, &key.year, &key.month] {
            if !form.defines(name) {
                return Err(unknown_field(form, name, "merge key"));
            }
        }
    }

    for name in &form.tasks.template {
        if !form.defines(name) {
            return Err(unknown_field(form, name, "task template"));
        }
    }

    Ok(())
}

fn validate_aggregate(form: &FormSchema, aggregate: &AggregateRule) -> Result<(), StandardsError> {
    let invalid = |message: String| StandardsError::InvalidAggregate {
        form: form.code.clone(),
        target: aggregate.target().to_string(),
        message,
    };

    let sources = aggregate.sources();
    if sources.is_empty() {
        return Err(invalid("no source fields".to_string()));
    }
    for source in sources {
        let Some(field) = form.field(source) else {
            return Err(unknown_field(form, source, "aggregate"));
        };
        if field.field_type != FieldType::Int {
            return Err(invalid(format!(
                "source {source} is {}, expected int",
                field.field_type
            )));
        }
    }

    // A sum writing over one of its declared fields would lose that value.
    if let AggregateRule::Sum { target, .. } = aggregate
        && form.field(target).is_some()
    {
        return Err(invalid("sum target shadows a declared field".to_string()));
    }

    Ok(())
}

fn unknown_field(form: &FormSchema, field: &str, context: &'static str) -> StandardsError {
    StandardsError::UnknownField {
        form: form.code.clone(),
        field: field.to_string(),
        context,
    }
}
