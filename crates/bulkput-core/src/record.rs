//! The record accessor contract.
//!
//! A `Record` exposes the metadata and field values the batching layer needs:
//! the destination table, the ordered field list with its primary-key and
//! relationship markers, and a way to read any field's current value. Static
//! record types implement it with a `static` field table and a `match` over
//! field names; [`DynamicRecord`](crate::dynamic::DynamicRecord) implements it
//! for tables only known at runtime.

use std::any::Any;

use crate::field::FieldInfo;
use crate::value::Value;

/// Upcast to `Any`, implemented for every `'static` type.
///
/// This lets hooks written against a concrete record type recover it from a
/// `&mut dyn Record`.
pub trait AsAny: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A structured value that can be written as one row of a table.
///
/// # Example
///
/// ```
/// use bulkput_core::{FieldInfo, Record, SqlType, Value};
///
/// struct Country {
///     code: String,
///     count: i64,
/// }
///
/// impl Record for Country {
///     fn table_name(&self) -> &str {
///         "countries"
///     }
///
///     fn fields(&self) -> &[FieldInfo] {
///         static FIELDS: &[FieldInfo] = &[
///             FieldInfo::new("code", "code", SqlType::Text).primary_key(true),
///             FieldInfo::new("count", "count", SqlType::BigInt),
///         ];
///         FIELDS
///     }
///
///     fn field_value(&self, field: &str) -> Option<Value> {
///         match field {
///             "code" => Some(self.code.as_str().into()),
///             "count" => Some(self.count.into()),
///             _ => None,
///         }
///     }
/// }
///
/// let c = Country { code: "BEN".into(), count: 0 };
/// assert_eq!(c.primary_key_fields().len(), 1);
/// assert_eq!(c.field_value("count"), Some(Value::BigInt(0)));
/// ```
pub trait Record: AsAny + Send {
    /// Destination table for records of this type.
    fn table_name(&self) -> &str;

    /// All fields in declaration order, relationship fields included.
    fn fields(&self) -> &[FieldInfo];

    /// Current value of the named field, or `None` if there is no such field.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Fields marked as primary key.
    fn primary_key_fields(&self) -> Vec<&FieldInfo> {
        self.fields().iter().filter(|f| f.primary_key).collect()
    }
}
