//! Serializable batcher settings.

use serde::{Deserialize, Serialize};

/// Parameter ceiling used when none is configured.
pub const DEFAULT_MAX_PARAMS: usize = 65_536;

/// Plain-data form of a batcher's settings.
///
/// Useful for loading write settings from a config file; apply it with
/// [`Batcher::from_config`](crate::Batcher::from_config) and read it back with
/// [`Batcher::config`](crate::Batcher::config). Hooks and destinations are code
/// and are not part of it.
///
/// Every field is optional: unset values and empty lists leave the settings of
/// the batcher it is applied to untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatcherConfig {
    /// Maximum bound parameters per batch. `None` or `0` uses
    /// [`DEFAULT_MAX_PARAMS`].
    pub max_params: Option<usize>,
    /// Columns to write. When non-empty, `exclude_columns` is ignored.
    pub only_columns: Vec<String>,
    /// Columns to leave out.
    pub exclude_columns: Vec<String>,
    /// Raise per-batch events to `info` and ask the destination to log.
    pub verbose: Option<bool>,
}

impl BatcherConfig {
    /// The ceiling actually used for batching.
    #[must_use]
    pub fn effective_max_params(&self) -> usize {
        match self.max_params {
            Some(0) | None => DEFAULT_MAX_PARAMS,
            Some(n) => n,
        }
    }
}
