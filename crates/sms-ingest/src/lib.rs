//! SMS ingestion: gateway payload extraction, form parsing, and record
//! building.

pub mod aggregate;
pub mod builder;
pub mod inbound;
pub mod parser;

pub use aggregate::apply_aggregates;
pub use builder::RecordBuilder;
pub use inbound::{InboundError, from_form_body, from_json};
pub use parser::{
    FieldParse, SENT_TIMESTAMP_FORMAT, SplitMessage, apply_schema, parse_sent_timestamp,
    split_message,
};
