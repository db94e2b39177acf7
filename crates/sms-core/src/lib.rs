//! SMS-to-data-record pipeline.
//!
//! - **stages**: the staged callback protocol (add_sms, add_facility, merge)
//! - **pipeline**: the same stages run synchronously against a lookup service
//! - **merge**: the create-or-replace state machine
//! - **response**: callback and storage descriptors

pub mod error;
pub mod merge;
pub mod pipeline;
pub mod response;
pub mod stages;

pub use error::{PipelineError, Result};
pub use merge::MergeState;
pub use pipeline::Pipeline;
pub use response::{Callback, Method, compose};
pub use stages::{Stages, UNKNOWN_FORM_SEGMENT};
