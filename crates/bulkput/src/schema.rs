//! Schema resolution from a sample record.

use bulkput_core::{FieldInfo, Record, SchemaError};

/// Table metadata derived from one record.
///
/// Holds the storable fields only: relationship fields have no column and are
/// dropped here, before any column policy sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table_name: String,
    primary_key: FieldInfo,
    fields: Vec<FieldInfo>,
}

impl Schema {
    /// Resolve the schema of `sample`'s record type.
    ///
    /// Fails when the type declares zero or more than one primary-key field;
    /// the error names the table and every primary-key candidate found.
    pub fn resolve(sample: &dyn Record) -> Result<Self, SchemaError> {
        let table_name = sample.table_name().to_string();
        let primary_keys = sample.primary_key_fields();

        let [primary_key] = primary_keys.as_slice() else {
            return Err(SchemaError {
                table: table_name,
                primary_keys: primary_keys
                    .iter()
                    .map(|f| f.column_name.to_string())
                    .collect(),
            });
        };
        let primary_key = (*primary_key).clone();

        let fields = sample
            .fields()
            .iter()
            .filter(|f| f.is_storable())
            .cloned()
            .collect();

        Ok(Self {
            table_name,
            primary_key,
            fields,
        })
    }

    /// Destination table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The single primary-key field.
    pub fn primary_key(&self) -> &FieldInfo {
        &self.primary_key
    }

    /// Column name of the primary key.
    pub fn primary_key_column(&self) -> &str {
        &self.primary_key.column_name
    }

    /// Storable fields in declaration order.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }
}
