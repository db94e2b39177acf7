#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    String,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::String => "string",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
}

/// Derived value computed from parsed fields after positional mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateRule {
    /// Boolean `source >= threshold`. Replaces the source when `target`
    /// names the same field.
    Flag {
        target: String,
        source: String,
        threshold: i64,
        #[serde(default)]
        label: Option<String>,
    },
    /// Integer total of the listed fields.
    Sum {
        target: String,
        sources: Vec<String>,
        #[serde(default)]
        label: Option<String>,
    },
}

impl AggregateRule {
    pub fn target(&self) -> &str {
        match self {
            AggregateRule::Flag { target, .. } | AggregateRule::Sum { target, .. } => target,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            AggregateRule::Flag { label, .. } | AggregateRule::Sum { label, .. } => {
                label.as_deref()
            }
        }
    }

    pub fn sources(&self) -> Vec<&str> {
        match self {
            AggregateRule::Flag { source, .. } => vec![source.as_str()],
            AggregateRule::Sum { sources, .. } => sources.iter().map(String::as_str).collect(),
        }
    }
}

/// Which fields of a form supply the record-by-key index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeKeyFields {
    pub facility: String,
    pub year: String,
    pub month: String,
}

/// Selects tiers of the resolved contact chain that receive a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierSelector {
    /// The most distant ancestor with a contact phone.
    Topmost,
    /// The closest entity with a contact phone (usually the clinic).
    Closest,
    /// Every tier with a contact phone.
    All,
    /// Every tier of the given entity type.
    EntityType(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPolicy {
    #[serde(default)]
    pub recipients: Vec<TierSelector>,
    /// Field names rendered as `Label: value`, in order.
    #[serde(default)]
    pub template: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub code: String,
    #[serde(default)]
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub aggregates: Vec<AggregateRule>,
    #[serde(default)]
    pub merge_key: Option<MergeKeyFields>,
    #[serde(default)]
    pub tasks: TaskPolicy,
    /// Reply sent back to the reporter once the form is recognized.
    #[serde(default)]
    pub acknowledgement: Option<String>,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn aggregate(&self, target: &str) -> Option<&AggregateRule> {
        self.aggregates
            .iter()
            .find(|aggregate| aggregate.target() == target)
    }

    /// Display label for a field or aggregate target, falling back to the name.
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        if let Some(label) = self.aggregate(name).and_then(AggregateRule::label) {
            return label;
        }
        self.field(name)
            .map(|field| field.label.as_str())
            .unwrap_or(name)
    }

    /// True when `name` is a declared field or aggregate target.
    pub fn defines(&self, name: &str) -> bool {
        self.field(name).is_some() || self.aggregate(name).is_some()
    }
}
