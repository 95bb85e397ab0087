//! Core types and traits for bulkput.
//!
//! `bulkput-core` is the **contract layer** between record types, the batching
//! orchestrator and the destinations rows are written to.
//!
//! # Role In The Architecture
//!
//! - **Record contract**: `Record` is implemented by user types (or used through
//!   `DynamicRecord`) to expose table name, field metadata and field values.
//! - **Data model**: `Value`, `SqlType` and `FieldInfo` describe what gets bound
//!   into each batch.
//! - **Errors**: the `Error` taxonomy shared by the orchestrator and destination
//!   implementations.
//! - **Structured concurrency**: re-exports `Cx` and `Outcome` from asupersync so
//!   destination writes are cancel-correct.
//!
//! Most applications should use the `bulkput` crate; reach for `bulkput-core`
//! directly when implementing a destination.

pub use asupersync::{Cx, Outcome};

pub mod dynamic;
pub mod error;
pub mod field;
pub mod record;
pub mod relationship;
pub mod types;
pub mod value;

pub use dynamic::DynamicRecord;
pub use error::{
    BoxError, Error, HookError, Result, SchemaError, ValidationError, ValidationErrorKind,
    WriteError,
};
pub use field::FieldInfo;
pub use record::{AsAny, Record};
pub use relationship::RelationshipKind;
pub use types::SqlType;
pub use value::Value;
