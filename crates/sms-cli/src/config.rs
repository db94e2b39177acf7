//! Loading of pipeline options, gateway payloads and lookup fixtures.

use std::path::Path;

use anyhow::{Context, Result};
use sms_ingest::{from_form_body, from_json};
use sms_model::{InboundMessage, PipelineOptions};
use sms_resolve::MemoryLookup;
use sms_standards::FormRegistry;
use tracing::debug;

/// Read pipeline options from a TOML file, or defaults when none is given.
///
/// Missing keys take their default values.
pub fn load_options(path: Option<&Path>) -> Result<PipelineOptions> {
    let Some(path) = path else {
        return Ok(PipelineOptions::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let options: PipelineOptions =
        toml::from_str(&contents).with_context(|| format!("parse config {}", path.display()))?;
    options
        .utc_offset()
        .with_context(|| format!("invalid utc_offset_minutes in {}", path.display()))?;
    debug!(path = %path.display(), "loaded pipeline options");
    Ok(options)
}

/// Load the form registry from `path`, or from the standards directory.
pub fn load_registry(path: Option<&Path>) -> Result<FormRegistry> {
    match path {
        Some(path) => {
            FormRegistry::load(path).with_context(|| format!("load forms {}", path.display()))
        }
        None => FormRegistry::load_default().context("load default forms"),
    }
}

/// Read one gateway payload. Files ending in `.json` are parsed as JSON;
/// anything else as a form-urlencoded body.
pub fn read_message(path: &Path) -> Result<InboundMessage> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read message {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let message = if is_json {
        from_json(&contents)
    } else {
        from_form_body(contents.trim())
    };
    message.with_context(|| format!("decode message {}", path.display()))
}

/// Load the lookup fixture, or an empty lookup when none is given.
pub fn load_lookup(path: Option<&Path>) -> Result<MemoryLookup> {
    match path {
        Some(path) => {
            MemoryLookup::load(path).with_context(|| format!("load lookup {}", path.display()))
        }
        None => Ok(MemoryLookup::new()),
    }
}
