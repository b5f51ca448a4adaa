//! Data model for worksync
//!
//! Shared between the store, the aggregator, the check-in flow and the
//! insight adapter. Serialized field names follow the camelCase layout of
//! the persisted attendance slot.

mod reference;
mod types;

pub use reference::*;
pub use types::*;
