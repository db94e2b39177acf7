#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse form definitions {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("form definition has an empty code")]
    EmptyFormCode,

    #[error("duplicate form code: {code}")]
    DuplicateForm { code: String },

    #[error("form {form} declares no fields")]
    NoFields { form: String },

    #[error("form {form} declares field {field} more than once")]
    DuplicateField { form: String, field: String },

    #[error("form {form}: {context} references unknown field {field}")]
    UnknownField {
        form: String,
        field: String,
        context: &'static str,
    },

    #[error("form {form}: invalid aggregate {target}: {message}")]
    InvalidAggregate {
        form: String,
        target: String,
        message: String,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
