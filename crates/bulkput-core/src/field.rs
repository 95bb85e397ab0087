//! Field and column definitions.

use std::borrow::Cow;

use crate::relationship::RelationshipKind;
use crate::types::SqlType;

/// Metadata about one field of a record type.
///
/// Static record types declare their fields in a `static` table using the
/// const builder methods; runtime-defined records build them with
/// [`FieldInfo::owned`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name, used to read the value from a record
    pub name: Cow<'static, str>,
    /// Database column name (may differ from field name)
    pub column_name: Cow<'static, str>,
    /// SQL type for this field
    pub sql_type: SqlType,
    /// Whether this field is nullable
    pub nullable: bool,
    /// Whether this is the primary key
    pub primary_key: bool,
    /// Whether the destination assigns this field's value
    pub auto_increment: bool,
    /// Set when the field references other records instead of storing a value.
    pub relationship: Option<RelationshipKind>,
}

impl FieldInfo {
    /// Create a new field info with minimal required data.
    pub const fn new(name: &'static str, column_name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name: Cow::Borrowed(name),
            column_name: Cow::Borrowed(column_name),
            sql_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            relationship: None,
        }
    }

    /// Create a field info from runtime strings.
    pub fn owned(
        name: impl Into<String>,
        column_name: impl Into<String>,
        sql_type: SqlType,
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            column_name: Cow::Owned(column_name.into()),
            sql_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
            relationship: None,
        }
    }

    /// Set nullable flag.
    pub const fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Set primary key flag.
    pub const fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }

    /// Set auto-increment flag.
    pub const fn auto_increment(mut self, value: bool) -> Self {
        self.auto_increment = value;
        self
    }

    /// Mark this field as a reference to other records.
    pub const fn relationship(mut self, kind: RelationshipKind) -> Self {
        self.relationship = Some(kind);
        self
    }

    /// Whether the field maps to a column that can be written.
    #[must_use]
    pub const fn is_storable(&self) -> bool {
        self.relationship.is_none()
    }
}
