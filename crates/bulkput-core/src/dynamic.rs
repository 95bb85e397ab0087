//! Records defined at runtime.
//!
//! Provides `DynamicRecord` for writing to tables whose columns are not known
//! at compile time, for example rows loaded from JSON fixtures.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::field::FieldInfo;
use crate::record::Record;
use crate::types::SqlType;
use crate::value::Value;

/// A record whose table and columns are declared at runtime.
///
/// Field names and column names are the same for dynamic records. Columns that
/// were declared but never set read as `Value::Null`.
///
/// # Example
///
/// ```
/// use bulkput_core::dynamic::DynamicRecord;
/// use bulkput_core::{FieldInfo, Record, SqlType, Value};
///
/// let mut row = DynamicRecord::new("countries");
/// row.add_column(FieldInfo::owned("code", "code", SqlType::Text).primary_key(true));
/// row.add_column(FieldInfo::owned("count", "count", SqlType::BigInt));
///
/// row.set("code", "BEN");
///
/// assert_eq!(row.field_value("code"), Some(Value::Text("BEN".to_string())));
/// assert_eq!(row.field_value("count"), Some(Value::Null));
/// assert_eq!(row.field_value("missing"), None);
/// ```
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    table_name: String,
    /// Column definitions in declaration order.
    columns: Vec<FieldInfo>,
    values: HashMap<String, Value>,
}

impl DynamicRecord {
    /// Create an empty record for the given table.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Create a record with a shared column layout.
    pub fn with_columns(table_name: impl Into<String>, columns: Vec<FieldInfo>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            values: HashMap::new(),
        }
    }

    /// Add a column definition.
    pub fn add_column(&mut self, column: FieldInfo) {
        self.columns.push(column);
    }

    /// Get column definitions.
    pub fn columns(&self) -> &[FieldInfo] {
        &self.columns
    }

    /// Set a value for a column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Get a value for a column, if it was set.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    /// Check if a column has a value set.
    pub fn has(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Populate a record from a JSON object.
    ///
    /// Keys that are not declared columns are rejected so that typos in
    /// fixtures surface instead of being silently dropped.
    pub fn from_json(
        table_name: impl Into<String>,
        columns: Vec<FieldInfo>,
        object: serde_json::Value,
    ) -> Result<Self> {
        let mut record = Self::with_columns(table_name, columns);
        let serde_json::Value::Object(map) = object else {
            return Err(Error::Custom(format!(
                "expected a JSON object for a `{}` row",
                record.table_name
            )));
        };
        for (key, value) in map {
            if !record.columns.iter().any(|c| c.name == key.as_str()) {
                return Err(Error::Custom(format!(
                    "table `{}` has no column `{}`",
                    record.table_name, key
                )));
            }
            record.values.insert(key, Value::from(value));
        }
        Ok(record)
    }

    /// Infer text/number/bool columns from the keys of a JSON object.
    ///
    /// `primary_key` names the column to mark as primary key.
    pub fn infer_columns(object: &serde_json::Value, primary_key: &str) -> Vec<FieldInfo> {
        let serde_json::Value::Object(map) = object else {
            return Vec::new();
        };
        map.iter()
            .map(|(key, value)| {
                let sql_type = match value {
                    serde_json::Value::Bool(_) => SqlType::Boolean,
                    serde_json::Value::Number(n) if n.is_i64() => SqlType::BigInt,
                    serde_json::Value::Number(_) => SqlType::Double,
                    serde_json::Value::String(_) => SqlType::Text,
                    _ => SqlType::Json,
                };
                FieldInfo::owned(key.clone(), key.clone(), sql_type)
                    .primary_key(key == primary_key)
                    .nullable(value.is_null())
            })
            .collect()
    }
}

impl Record for DynamicRecord {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn fields(&self) -> &[FieldInfo] {
        &self.columns
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        if !self.columns.iter().any(|c| c.name == field) {
            return None;
        }
        Some(self.values.get(field).cloned().unwrap_or(Value::Null))
    }
}
