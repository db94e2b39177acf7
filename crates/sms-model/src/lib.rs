pub mod entity;
pub mod error;
pub mod field;
pub mod issue;
pub mod options;
pub mod record;
pub mod task;

pub use entity::{Contact, Entity};
pub use error::{ModelError, Result};
pub use field::{FieldMap, FieldValue};
pub use issue::{ErrorCode, RecordError};
pub use options::PipelineOptions;
pub use record::{
    DataRecord, Identity, InboundMessage, MergeKey, RecordKind, RelatedEntities, SmsMessage,
    SmsMessageKind,
};
pub use task::{OutboundMessage, Task, TaskState};
