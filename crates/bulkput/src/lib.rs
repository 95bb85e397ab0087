//! Batched, column-projected upserts of homogeneous records.
//!
//! `bulkput` takes a slice of records bound for one table and writes them
//! through a destination in as few statements as the destination's bound
//! parameter limit allows.
//!
//! # Pipeline
//!
//! 1. [`Schema::resolve`] reads table name, storable fields and the single
//!    primary key from the first record.
//! 2. A [`ColumnPolicy`] projects those fields to the columns to write.
//! 3. Every record runs through the [`Hook`] chain, then its primary key is
//!    checked and its column values are extracted ([`pipeline`]).
//! 4. The extracted rows are cut into batches that respect the parameter
//!    ceiling ([`partition`]).
//! 5. Each batch goes to the [`BatchWriter`], in order, stopping at the first
//!    failure.
//!
//! [`Batcher`] ties it together as an immutable configuration that can be
//! branched and reused across destinations and datasets.
//!
//! # Example
//!
//! ```ignore
//! use bulkput::prelude::*;
//!
//! let batcher = Batcher::new()
//!     .with_destination(&conn)
//!     .exclude_columns(["special_notes"])
//!     .add_hook(Hook::new(|c: &mut Country| {
//!         c.count = 100;
//!         Ok(HookAction::Keep)
//!     }));
//!
//! match batcher.put(&cx, &mut countries).await {
//!     Outcome::Ok(summary) => println!("wrote {} rows", summary.rows_written),
//!     Outcome::Err(e) => eprintln!("put failed: {e}"),
//!     other => eprintln!("put interrupted: {other:?}"),
//! }
//! ```

pub mod batcher;
pub mod columns;
pub mod config;
pub mod hook;
pub mod partition;
pub mod pipeline;
pub mod schema;
pub mod writer;

pub use bulkput_core::*;

pub use batcher::{Batcher, PreparedPut, PutSummary, Unbound};
pub use columns::{ColumnPolicy, ColumnSet};
pub use config::{BatcherConfig, DEFAULT_MAX_PARAMS};
pub use hook::{Hook, HookAction, HookResult};
pub use pipeline::Row;
pub use schema::Schema;
pub use writer::{BatchRequest, BatchWriter};

/// Everything needed to configure a batcher and implement a destination.
pub mod prelude {
    pub use crate::{
        BatchRequest, BatchWriter, Batcher, BatcherConfig, ColumnPolicy, Cx, DynamicRecord,
        Error, FieldInfo, Hook, HookAction, Outcome, PutSummary, Record, RelationshipKind, Row,
        SqlType, Value,
    };
}
