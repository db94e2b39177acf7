use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable error codes stored on a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    SmsFormatInvalid,
    FormNotFound,
    FieldTypeInvalid,
    TimestampInvalid,
    FacilityNotFound,
    FacilityAmbiguous,
    RecipientNotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SmsFormatInvalid => "sms_format_invalid",
            ErrorCode::FormNotFound => "form_not_found",
            ErrorCode::FieldTypeInvalid => "field_type_invalid",
            ErrorCode::TimestampInvalid => "timestamp_invalid",
            ErrorCode::FacilityNotFound => "facility_not_found",
            ErrorCode::FacilityAmbiguous => "facility_ambiguous",
            ErrorCode::RecipientNotFound => "recipient_not_found",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured problem filed on a record instead of aborting the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    pub code: ErrorCode,
    pub message: String,
}

impl RecordError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn sms_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SmsFormatInvalid, message)
    }

    pub fn form_not_found(code: &str) -> Self {
        Self::new(ErrorCode::FormNotFound, format!("Form '{code}' not found."))
    }

    pub fn field_type(name: &str, expected: &str, raw: &str) -> Self {
        Self::new(
            ErrorCode::FieldTypeInvalid,
            format!("Field '{name}' expects {expected}, got '{raw}'."),
        )
    }

    pub fn timestamp(raw: &str) -> Self {
        Self::new(
            ErrorCode::TimestampInvalid,
            format!("Could not parse sent timestamp '{raw}'."),
        )
    }

    pub fn facility_not_found() -> Self {
        Self::new(ErrorCode::FacilityNotFound, "Facility not found.")
    }

    pub fn facility_ambiguous(phone: &str) -> Self {
        Self::new(
            ErrorCode::FacilityAmbiguous,
            format!("More than one facility matches {phone}."),
        )
    }

    pub fn recipient_not_found() -> Self {
        Self::new(
            ErrorCode::RecipientNotFound,
            "Could not find message recipient.",
        )
    }
}
