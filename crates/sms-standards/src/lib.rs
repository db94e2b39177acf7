#![deny(unsafe_code)]

pub mod error;
pub mod paths;
pub mod registry;
pub mod schema;

pub use crate::error::StandardsError;
pub use crate::registry::{FormRegistry, RegistrySummary};
pub use crate::schema::{
    AggregateRule, FieldDescriptor, FieldType, FormSchema, MergeKeyFields, TaskPolicy,
    TierSelector,
};
