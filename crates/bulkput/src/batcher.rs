//! The batcher: a reusable, immutable write configuration.
//!
//! Every configuration method takes `&self` and returns a new `Batcher`; the
//! receiver is never modified. Column lists and hooks are shared between a
//! batcher and the batchers derived from it, so branching a base configuration
//! per destination or per dataset is cheap and safe across threads.
//!
//! # Example
//!
//! ```ignore
//! let base = Batcher::new().with_destination(&conn).max_params(30_000);
//!
//! // Same columns, different tables.
//! let narrow = base.only_columns(["code", "population"]);
//! narrow.put(&cx, &mut countries).await;
//! narrow.put(&cx, &mut cities).await;
//!
//! // One dataset, many destinations.
//! let prepared = Batcher::new().rows(countries);
//! for conn in &replicas {
//!     prepared.with_destination(conn).put(&cx).await;
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use bulkput_core::{Cx, Error, Outcome, Record, WriteError};

use crate::columns::{ColumnPolicy, ColumnSet};
use crate::config::BatcherConfig;
use crate::hook::Hook;
use crate::partition::{batch_size, partition};
use crate::pipeline::extract_rows;
use crate::schema::Schema;
use crate::writer::{BatchRequest, BatchWriter};

/// Destination placeholder of a batcher that cannot write yet.
///
/// `put` only exists once a [`BatchWriter`] is bound with
/// [`Batcher::with_destination`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unbound;

/// What a successful `put` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutSummary {
    /// Rows sent to the destination.
    pub rows_written: u64,
    /// Rows the destination reported as affected.
    pub rows_affected: u64,
    /// Rows dropped by hooks.
    pub rows_skipped: usize,
    /// Batches written.
    pub batches: usize,
}

/// Immutable batched-upsert configuration.
pub struct Batcher<D = Unbound> {
    destination: Arc<D>,
    only_columns: Option<ColumnSet>,
    exclude_columns: Option<ColumnSet>,
    hooks: Arc<[Hook]>,
    max_params: Option<usize>,
    verbose: bool,
}

impl Batcher<Unbound> {
    /// Create a batcher with no destination and default settings.
    pub fn new() -> Self {
        Self {
            destination: Arc::new(Unbound),
            only_columns: None,
            exclude_columns: None,
            hooks: Arc::from(Vec::new()),
            max_params: None,
            verbose: false,
        }
    }

    /// Create a batcher from plain settings.
    pub fn from_config(config: &BatcherConfig) -> Self {
        Self::new().apply_config(config)
    }
}

impl Default for Batcher<Unbound> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Batcher<D> {
    fn clone(&self) -> Self {
        Self {
            destination: Arc::clone(&self.destination),
            only_columns: self.only_columns.clone(),
            exclude_columns: self.exclude_columns.clone(),
            hooks: Arc::clone(&self.hooks),
            max_params: self.max_params,
            verbose: self.verbose,
        }
    }
}

impl<D> fmt::Debug for Batcher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batcher")
            .field("destination", &std::any::type_name::<D>())
            .field("only_columns", &self.only_columns)
            .field("exclude_columns", &self.exclude_columns)
            .field("hooks", &self.hooks.len())
            .field("max_params", &self.max_params)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl<D> Batcher<D> {
    /// Bind a destination, keeping every other setting.
    pub fn with_destination<W: BatchWriter>(&self, destination: W) -> Batcher<W> {
        Batcher {
            destination: Arc::new(destination),
            only_columns: self.only_columns.clone(),
            exclude_columns: self.exclude_columns.clone(),
            hooks: Arc::clone(&self.hooks),
            max_params: self.max_params,
            verbose: self.verbose,
        }
    }

    /// Write only these columns.
    ///
    /// Takes precedence over [`exclude_columns`](Self::exclude_columns) when
    /// both are set. An empty list clears the restriction.
    pub fn only_columns<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.only_columns = Some(ColumnSet::new(columns));
        next
    }

    /// Write every column except these.
    pub fn exclude_columns<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.exclude_columns = Some(ColumnSet::new(columns));
        next
    }

    /// Replace both column lists with a single policy.
    pub fn with_column_policy(&self, policy: ColumnPolicy) -> Self {
        let mut next = self.clone();
        (next.only_columns, next.exclude_columns) = match policy {
            ColumnPolicy::All => (None, None),
            ColumnPolicy::Include(only) => (Some(only), None),
            ColumnPolicy::Exclude(skip) => (None, Some(skip)),
        };
        next
    }

    /// Replace the hook chain.
    pub fn hooks<I: IntoIterator<Item = Hook>>(&self, hooks: I) -> Self {
        let mut next = self.clone();
        next.hooks = hooks.into_iter().collect();
        next
    }

    /// Append one hook to the chain.
    pub fn add_hook(&self, hook: Hook) -> Self {
        let mut next = self.clone();
        next.hooks = self.hooks.iter().cloned().chain(Some(hook)).collect();
        next
    }

    /// Maximum bound parameters per batch; `0` restores the default.
    pub fn max_params(&self, count: usize) -> Self {
        let mut next = self.clone();
        next.max_params = Some(count);
        next
    }

    /// Log every batch at `info` and ask the destination to log its statements.
    ///
    /// Scoped to this configuration and the batchers derived from it.
    pub fn verbose(&self, enabled: bool) -> Self {
        let mut next = self.clone();
        next.verbose = enabled;
        next
    }

    /// Apply plain settings on top of this configuration.
    ///
    /// Only what `config` sets is overridden: `None` values and empty column
    /// lists keep the current setting, shared with this batcher.
    pub fn apply_config(&self, config: &BatcherConfig) -> Self {
        let mut next = self.clone();
        if !config.only_columns.is_empty() {
            next.only_columns = Some(ColumnSet::new(config.only_columns.iter().cloned()));
        }
        if !config.exclude_columns.is_empty() {
            next.exclude_columns = Some(ColumnSet::new(config.exclude_columns.iter().cloned()));
        }
        if config.max_params.is_some() {
            next.max_params = config.max_params;
        }
        if let Some(verbose) = config.verbose {
            next.verbose = verbose;
        }
        next
    }

    /// Snapshot the plain settings.
    pub fn config(&self) -> BatcherConfig {
        fn list(set: Option<&ColumnSet>) -> Vec<String> {
            set.map(|s| s.iter().map(str::to_string).collect())
                .unwrap_or_default()
        }
        BatcherConfig {
            max_params: self.max_params,
            only_columns: list(self.only_columns.as_ref()),
            exclude_columns: list(self.exclude_columns.as_ref()),
            verbose: Some(self.verbose),
        }
    }

    /// The projection rule in effect.
    pub fn column_policy(&self) -> ColumnPolicy {
        ColumnPolicy::from_sets(self.only_columns.as_ref(), self.exclude_columns.as_ref())
    }

    /// The parameter ceiling in effect.
    pub fn effective_max_params(&self) -> usize {
        BatcherConfig {
            max_params: self.max_params,
            ..BatcherConfig::default()
        }
        .effective_max_params()
    }

    pub fn hook_chain(&self) -> &[Hook] {
        &self.hooks
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Bind a dataset, producing a put that can be run against any destination.
    pub fn rows<R: Record + Clone>(&self, rows: impl Into<Arc<[R]>>) -> PreparedPut<D, R> {
        PreparedPut {
            batcher: self.clone(),
            rows: rows.into(),
        }
    }
}

impl<D: BatchWriter> Batcher<D> {
    /// The bound destination.
    pub fn destination(&self) -> &D {
        &self.destination
    }

    /// Upsert `rows` into their table.
    ///
    /// The schema comes from the first row. Every row then runs through the
    /// hook chain, is validated and extracted; only when all rows passed are
    /// batches sent, one at a time and in order. Hooks mutate `rows` in place.
    ///
    /// An empty input succeeds without contacting the destination. On a write
    /// failure, batches already sent stay written.
    #[tracing::instrument(level = "debug", skip_all, fields(rows = rows.len()))]
    pub async fn put<R: Record>(&self, cx: &Cx, rows: &mut [R]) -> Outcome<PutSummary, Error> {
        let Some(sample) = rows.first() else {
            tracing::debug!("No rows to put");
            return Outcome::Ok(PutSummary::default());
        };

        let schema = match Schema::resolve(sample) {
            Ok(schema) => schema,
            Err(e) => return Outcome::Err(e.into()),
        };
        let fields = self.column_policy().project(schema.fields());
        let columns: Vec<&str> = fields.iter().map(|f| f.column_name.as_ref()).collect();
        if !fields.iter().any(|f| f.name == schema.primary_key().name) {
            tracing::warn!(
                table = schema.table_name(),
                primary_key = schema.primary_key_column(),
                "Projected columns do not include the primary key"
            );
        }
        tracing::debug!(
            table = schema.table_name(),
            primary_key = schema.primary_key_column(),
            columns = ?columns,
            "Resolved write columns"
        );

        let extracted = match extract_rows(rows, &self.hooks, &fields, schema.primary_key()) {
            Ok(extracted) => extracted,
            Err(e) => return Outcome::Err(e),
        };

        let max_params = self.effective_max_params();
        let dialect = self.destination.dialect();
        let mut summary = PutSummary {
            rows_skipped: extracted.skipped,
            ..PutSummary::default()
        };
        tracing::debug!(
            rows = extracted.rows.len(),
            skipped = extracted.skipped,
            batch_size = batch_size(columns.len(), max_params),
            "Rows ready for batching"
        );

        for (index, batch_rows) in partition(&extracted.rows, columns.len(), max_params).enumerate() {
            let request = BatchRequest {
                dialect,
                table: schema.table_name(),
                primary_key: schema.primary_key_column(),
                columns: &columns,
                rows: batch_rows,
                batch: index,
                verbose: self.verbose,
            };
            if self.verbose {
                tracing::info!(
                    table = request.table,
                    batch = index,
                    rows = batch_rows.len(),
                    params = request.parameter_count(),
                    "Writing batch"
                );
            } else {
                tracing::trace!(
                    table = request.table,
                    batch = index,
                    rows = batch_rows.len(),
                    "Writing batch"
                );
            }

            match self.destination.write_batch(cx, &request).await {
                Outcome::Ok(affected) => {
                    summary.rows_written += batch_rows.len() as u64;
                    summary.rows_affected += affected;
                    summary.batches += 1;
                }
                Outcome::Err(source) => {
                    tracing::warn!(
                        table = request.table,
                        batch = index,
                        rows_written = summary.rows_written,
                        error = %source,
                        "Batch write failed"
                    );
                    return Outcome::Err(Error::Write(WriteError {
                        table: schema.table_name().to_string(),
                        batch: index,
                        rows_written: summary.rows_written,
                        source: Box::new(source),
                    }));
                }
                Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
                Outcome::Panicked(payload) => return Outcome::Panicked(payload),
            }
        }

        tracing::debug!(
            table = schema.table_name(),
            rows_written = summary.rows_written,
            batches = summary.batches,
            "Put complete"
        );
        Outcome::Ok(summary)
    }
}

/// A batcher with a bound dataset.
///
/// The rows are shared, never mutated: each `put` runs the hooks on its own
/// copy, so one dataset can be written to many destinations.
pub struct PreparedPut<D, R> {
    batcher: Batcher<D>,
    rows: Arc<[R]>,
}

impl<D, R> Clone for PreparedPut<D, R> {
    fn clone(&self) -> Self {
        Self {
            batcher: self.batcher.clone(),
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<D, R> fmt::Debug for PreparedPut<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedPut")
            .field("batcher", &self.batcher)
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl<D, R: Record + Clone> PreparedPut<D, R> {
    /// Target another destination with the same rows and settings.
    pub fn with_destination<W: BatchWriter>(&self, destination: W) -> PreparedPut<W, R> {
        PreparedPut {
            batcher: self.batcher.with_destination(destination),
            rows: Arc::clone(&self.rows),
        }
    }

    pub fn batcher(&self) -> &Batcher<D> {
        &self.batcher
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }
}

impl<D: BatchWriter, R: Record + Clone> PreparedPut<D, R> {
    /// Run the put against the bound destination.
    pub async fn put(&self, cx: &Cx) -> Outcome<PutSummary, Error> {
        let mut rows = self.rows.to_vec();
        self.batcher.put(cx, &mut rows).await
    }
}
