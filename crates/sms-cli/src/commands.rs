use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use sms_cli::config::{load_lookup, load_options, load_registry, read_message};
use sms_cli::logging::redact_value;
use sms_cli::summary::{forms_table, record_table};
use sms_core::Pipeline;
use tracing::{info, info_span, trace};

use crate::cli::ProcessArgs;

pub fn run_forms(forms: Option<&Path>) -> Result<()> {
    let registry = load_registry(forms)?;
    println!("{}", forms_table(&registry));
    Ok(())
}

pub fn run_process(args: &ProcessArgs, forms: Option<&Path>) -> Result<()> {
    let span = info_span!("process", message_file = %args.message.display());
    let _guard = span.enter();
    let start = Instant::now();

    let registry = load_registry(forms)?;
    let options = load_options(args.config.as_deref())?;
    let lookup = load_lookup(args.lookup.as_deref())?;
    let message = read_message(&args.message)?;
    trace!(
        from = %redact_value(&message.from),
        text = %redact_value(&message.message),
        "read gateway message"
    );

    let pipeline = Pipeline::new(&registry, &options, lookup).context("build pipeline")?;
    let callback = pipeline.process(&message).context("process message")?;
    info!(
        path = %callback.path,
        errors = callback.body.errors.len(),
        tasks = callback.body.tasks.len(),
        duration_ms = start.elapsed().as_millis(),
        "message processed"
    );

    let json = serde_json::to_string_pretty(&callback).context("serialize callback")?;
    println!("{json}");
    if args.summary {
        eprintln!("{}", record_table(&callback));
    }
    Ok(())
}
