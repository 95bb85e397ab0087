//! Column projection.
//!
//! A [`ColumnPolicy`] picks which storable fields of a [`Schema`](crate::Schema)
//! are written. Column names are matched by exact membership: a configured
//! `"id"` never selects `"bid"` or `"identifier"`.

use std::sync::Arc;

use bulkput_core::FieldInfo;

/// An immutable, cheaply clonable set of column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet(Arc<[String]>);

impl ColumnSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Which storable fields a write includes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// Every storable field.
    #[default]
    All,
    /// Only fields whose column is in the set, in schema order.
    Include(ColumnSet),
    /// Every storable field whose column is not in the set.
    Exclude(ColumnSet),
}

impl ColumnPolicy {
    /// Combine separately configured include and exclude lists.
    ///
    /// A non-empty include list wins and the exclude list is ignored. Empty
    /// lists count as unset.
    pub fn from_sets(include: Option<&ColumnSet>, exclude: Option<&ColumnSet>) -> Self {
        match (include, exclude) {
            (Some(only), _) if !only.is_empty() => ColumnPolicy::Include(only.clone()),
            (_, Some(skip)) if !skip.is_empty() => ColumnPolicy::Exclude(skip.clone()),
            _ => ColumnPolicy::All,
        }
    }

    /// Project `fields` to the ordered list of fields to write.
    ///
    /// Output order always follows `fields`, never the order of the set.
    pub fn project<'a>(&self, fields: &'a [FieldInfo]) -> Vec<&'a FieldInfo> {
        fields
            .iter()
            .filter(|f| f.is_storable())
            .filter(|f| match self {
                ColumnPolicy::All => true,
                ColumnPolicy::Include(only) => only.contains(&f.column_name),
                ColumnPolicy::Exclude(skip) => !skip.contains(&f.column_name),
            })
            .collect()
    }
}
