//! Extraction of the raw message fields posted by the SMS gateway.

use sms_model::InboundMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InboundError {
    #[error("gateway payload is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("gateway payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read the gateway's `application/x-www-form-urlencoded` POST body.
///
/// Unknown keys are ignored. Later duplicates of a key win.
pub fn from_form_body(body: &str) -> Result<InboundMessage, InboundError> {
    let mut from = None;
    let mut message = None;
    let mut sent_timestamp = None;
    let mut sent_to = None;
    let mut locale = None;

    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "from" => from = Some(value),
            "message" => message = Some(value),
            "sent_timestamp" => sent_timestamp = Some(value),
            "sent_to" => sent_to = Some(value),
            "locale" => locale = Some(value),
            _ => {}
        }
    }

    let message = InboundMessage {
        from: from.ok_or(InboundError::MissingField("from"))?,
        message: message.ok_or(InboundError::MissingField("message"))?,
        sent_timestamp,
        sent_to,
        locale,
    };
    require_fields(message)
}

/// Read a JSON gateway payload.
pub fn from_json(body: &str) -> Result<InboundMessage, InboundError> {
    let message: InboundMessage = serde_json::from_str(body)?;
    require_fields(message)
}

fn require_fields(message: InboundMessage) -> Result<InboundMessage, InboundError> {
    if message.from.trim().is_empty() {
        return Err(InboundError::MissingField("from"));
    }
    if message.message.trim().is_empty() {
        return Err(InboundError::MissingField("message"));
    }
    Ok(message)
}
