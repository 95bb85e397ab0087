//! SQL column types carried in field metadata.

use serde::{Deserialize, Serialize};

/// Logical SQL type of a column.
///
/// Writers use this to pick placeholder casts or binary encodings; the batching
/// layer itself only passes it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal,
    #[default]
    Text,
    Blob,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
}
