//! Facility and recipient resolution against the document store's indexes.

pub mod chain;
pub mod facility;
pub mod lookup;
pub mod memory;

pub use chain::{ContactChain, MAX_HIERARCHY_DEPTH, Tier};
pub use facility::{
    FacilityOutcome, RecipientOutcome, Resolution, resolve, resolve_with, select_facility,
};
pub use lookup::{LookupError, LookupService, StoredRecordRef, ViewRow};
pub use memory::{MemoryLookup, StoredRecord};
