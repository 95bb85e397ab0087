//! Parameter-bounded batching.
//!
//! Each row binds one value per column plus one for the primary key used by
//! the upsert predicate. Batches hold as many whole rows as fit under the
//! parameter ceiling, and at least one.

use crate::pipeline::Row;

/// Bound parameters consumed by one row.
#[must_use]
pub const fn parameter_width(column_count: usize) -> usize {
    column_count + 1
}

/// Rows per batch for the given column count and parameter ceiling.
#[must_use]
pub fn batch_size(column_count: usize, max_params: usize) -> usize {
    (max_params / parameter_width(column_count)).max(1)
}

/// Split `rows` into consecutive, order-preserving batches.
///
/// Every batch but the last has exactly [`batch_size`] rows. No rows means no
/// batches.
pub fn partition(rows: &[Row], column_count: usize, max_params: usize) -> std::slice::Chunks<'_, Row> {
    rows.chunks(batch_size(column_count, max_params))
}
