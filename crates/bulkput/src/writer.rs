//! The destination contract.
//!
//! A [`BatchWriter`] executes one batch as a single upsert: rows whose primary
//! key is new are inserted, rows whose key exists are updated, using exactly
//! the columns of the request in that order. The batcher calls it once per
//! batch, sequentially, and stops at the first failure.

use std::future::Future;
use std::sync::Arc;

use bulkput_core::{Cx, Error, Outcome};

use crate::partition::parameter_width;
use crate::pipeline::Row;

/// One batch handed to a destination.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Dialect reported by the destination.
    pub dialect: &'a str,
    pub table: &'a str,
    /// Column matched by the upsert predicate.
    pub primary_key: &'a str,
    /// Columns to write; every row has one value per column, in this order.
    pub columns: &'a [&'a str],
    pub rows: &'a [Row],
    /// 0-based position of this batch within the call.
    pub batch: usize,
    /// Set by [`Batcher::verbose`](crate::Batcher::verbose) for this
    /// configuration only. Destinations use it to log statements.
    pub verbose: bool,
}

impl BatchRequest<'_> {
    /// Bound parameters this batch needs.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.rows.len() * parameter_width(self.columns.len())
    }
}

/// A destination able to upsert batches of rows.
pub trait BatchWriter: Send + Sync {
    /// Dialect name, e.g. `"postgres"`.
    fn dialect(&self) -> &str;

    /// Upsert every row of `batch`, returning the number of rows affected.
    fn write_batch(
        &self,
        cx: &Cx,
        batch: &BatchRequest<'_>,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;
}

impl<W: BatchWriter> BatchWriter for &W {
    fn dialect(&self) -> &str {
        (**self).dialect()
    }

    fn write_batch(
        &self,
        cx: &Cx,
        batch: &BatchRequest<'_>,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        (**self).write_batch(cx, batch)
    }
}

impl<W: BatchWriter> BatchWriter for Arc<W> {
    fn dialect(&self) -> &str {
        (**self).dialect()
    }

    fn write_batch(
        &self,
        cx: &Cx,
        batch: &BatchRequest<'_>,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        (**self).write_batch(cx, batch)
    }
}
