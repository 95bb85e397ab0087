//! Per-row preprocessing hooks.
//!
//! Hooks run against every input record, in configured order, before the row
//! is validated and extracted. A hook may mutate the record, ask for it to be
//! skipped, or fail the whole write.
//!
//! # Example
//!
//! ```ignore
//! let batcher = Batcher::new()
//!     .with_destination(conn)
//!     .hooks([
//!         Hook::new(|c: &mut Country| {
//!             c.count = 100;
//!             Ok(HookAction::Keep)
//!         }),
//!         Hook::new(|c: &mut Country| {
//!             Ok(if c.code == "BEN" { HookAction::Skip } else { HookAction::Keep })
//!         }),
//!     ]);
//! ```

use std::fmt;
use std::sync::Arc;

use bulkput_core::{BoxError, Record};

/// What to do with the row after a hook ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookAction {
    /// Continue with the next hook, then write the row.
    #[default]
    Keep,
    /// Drop this row; later hooks do not run for it.
    Skip,
}

/// Result returned by a hook.
pub type HookResult = Result<HookAction, BoxError>;

type HookFn = dyn Fn(&mut dyn Record) -> HookResult + Send + Sync;

/// A shareable preprocessing function.
#[derive(Clone)]
pub struct Hook {
    name: Option<&'static str>,
    run: Arc<HookFn>,
}

impl Hook {
    /// A hook for one concrete record type.
    ///
    /// Rows of any other type pass through untouched, so a base batcher with
    /// typed hooks can still write unrelated tables.
    pub fn new<R, F>(f: F) -> Self
    where
        R: Record,
        F: Fn(&mut R) -> HookResult + Send + Sync + 'static,
    {
        Self {
            name: None,
            run: Arc::new(move |row: &mut dyn Record| match (*row).as_any_mut().downcast_mut::<R>() {
                Some(row) => f(row),
                None => {
                    tracing::trace!(
                        expected = std::any::type_name::<R>(),
                        table = row.table_name(),
                        "Typed hook passed over a row of another type"
                    );
                    Ok(HookAction::Keep)
                }
            }),
        }
    }

    /// A hook applied to rows of every type through the `Record` accessor.
    pub fn any<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Record) -> HookResult + Send + Sync + 'static,
    {
        Self {
            name: None,
            run: Arc::new(f),
        }
    }

    /// Attach a name used in logs.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Run the hook against one record.
    pub fn run(&self, row: &mut dyn Record) -> HookResult {
        (self.run)(row)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("name", &self.name).finish_non_exhaustive()
    }
}
