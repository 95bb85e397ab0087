//! Per-row processing: hooks, primary-key validation, value extraction.

use bulkput_core::{
    Error, FieldInfo, HookError, Record, Result, ValidationError, ValidationErrorKind, Value,
};

use crate::hook::{Hook, HookAction};

/// The ordered column values of one record.
pub type Row = Vec<Value>;

/// Outcome of processing a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    Row(Row),
    Skipped,
}

/// Rows extracted from a whole input, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub rows: Vec<Row>,
    pub skipped: usize,
}

/// Run the hooks against `record`, then validate and extract it.
///
/// `row` is the 1-based position of the record in the input. A hook error or
/// a zero primary key is returned as an error for the whole call; a skip only
/// drops this record.
pub fn process_row(
    row: usize,
    record: &mut dyn Record,
    hooks: &[Hook],
    columns: &[&FieldInfo],
    primary_key: &FieldInfo,
) -> Result<Processed> {
    for (position, hook) in hooks.iter().enumerate() {
        match hook.run(record) {
            Ok(HookAction::Keep) => {}
            Ok(HookAction::Skip) => {
                tracing::trace!(row, hook = position, name = ?hook.name(), "Row skipped by hook");
                return Ok(Processed::Skipped);
            }
            Err(source) => {
                return Err(Error::Hook(HookError {
                    row,
                    hook: position,
                    source,
                }));
            }
        }
    }

    // Hooks may have filled in the key, so it is read only now.
    let key = read_field(record, row, primary_key)?;
    if key.is_zero() {
        return Err(ValidationError {
            kind: ValidationErrorKind::ZeroPrimaryKey,
            row,
            column: primary_key.column_name.to_string(),
        }
        .into());
    }

    let values = columns
        .iter()
        .map(|field| {
            if field.name == primary_key.name {
                Ok(key.clone())
            } else {
                read_field(record, row, field)
            }
        })
        .collect::<Result<Row>>()?;
    Ok(Processed::Row(values))
}

/// Process every record of `records` in order.
///
/// Stops at the first error; nothing extracted so far is returned in that case.
pub fn extract_rows<R: Record>(
    records: &mut [R],
    hooks: &[Hook],
    columns: &[&FieldInfo],
    primary_key: &FieldInfo,
) -> Result<Extracted> {
    let mut extracted = Extracted {
        rows: Vec::with_capacity(records.len()),
        skipped: 0,
    };
    for (index, record) in records.iter_mut().enumerate() {
        match process_row(index + 1, record, hooks, columns, primary_key)? {
            Processed::Row(values) => extracted.rows.push(values),
            Processed::Skipped => extracted.skipped += 1,
        }
    }
    Ok(extracted)
}

fn read_field(record: &dyn Record, row: usize, field: &FieldInfo) -> Result<Value> {
    record.field_value(&field.name).ok_or_else(|| {
        ValidationError {
            kind: ValidationErrorKind::MissingField,
            row,
            column: field.column_name.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkput_core::{DynamicRecord, SqlType};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn layout() -> Vec<FieldInfo> {
        vec![
            FieldInfo::owned("code", "code", SqlType::Text).primary_key(true),
            FieldInfo::owned("short_name", "short_name", SqlType::Text),
            FieldInfo::owned("count", "count", SqlType::BigInt),
        ]
    }

    fn country(code: &str, name: &str, count: i64) -> DynamicRecord {
        let mut row = DynamicRecord::with_columns("countries", layout());
        if !code.is_empty() {
            row.set("code", code);
        }
        row.set("short_name", name);
        row.set("count", count);
        row
    }

    #[test]
    fn test_extracts_in_column_order() {
        let fields = layout();
        let columns = vec![&fields[2], &fields[0]];
        let mut record = country("BEN", "Benin", 4);

        let processed = process_row(1, &mut record, &[], &columns, &fields[0]).unwrap();
        assert_eq!(
            processed,
            Processed::Row(vec![Value::BigInt(4), Value::Text("BEN".to_string())])
        );
    }

    #[test]
    fn test_zero_primary_key_names_row() {
        let fields = layout();
        let columns: Vec<_> = fields.iter().collect();
        let mut records = vec![country("BEN", "Benin", 0), country("", "Nowhere", 0)];

        let err = extract_rows(&mut records, &[], &columns, &fields[0]).unwrap_err();
        match err {
            Error::Validation(e) => {
                assert_eq!(e.kind, ValidationErrorKind::ZeroPrimaryKey);
                assert_eq!(e.row, 2);
                assert_eq!(e.column, "code");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_hook_can_fill_primary_key() {
        let fields = layout();
        let columns: Vec<_> = fields.iter().collect();
        let hooks = [Hook::new(|r: &mut DynamicRecord| {
            if !r.has("code") {
                r.set("code", "GEN");
            }
            Ok(HookAction::Keep)
        })];
        let mut records = vec![country("", "Generated", 1)];

        let extracted = extract_rows(&mut records, &hooks, &columns, &fields[0]).unwrap();
        assert_eq!(extracted.rows[0][0], Value::Text("GEN".to_string()));
    }

    #[test]
    fn test_skip_stops_the_chain() {
        let fields = layout();
        let columns: Vec<_> = fields.iter().collect();
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);
        let hooks = [
            Hook::new(|r: &mut DynamicRecord| {
                Ok(if r.get("code").and_then(Value::as_str) == Some("BEN") {
                    HookAction::Skip
                } else {
                    HookAction::Keep
                })
            }),
            Hook::any(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(HookAction::Keep)
            }),
        ];
        let mut records = vec![
            country("BEN", "Benin", 0),
            country("BFA", "Burkina Faso", 2),
            country("BGD", "Bangladesh", 1),
        ];

        let extracted = extract_rows(&mut records, &hooks, &columns, &fields[0]).unwrap();
        assert_eq!(extracted.skipped, 1);
        assert_eq!(extracted.rows.len(), 2);
        assert_eq!(extracted.rows[0][0], Value::Text("BFA".to_string()));
        assert_eq!(later_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_skipped_row_is_not_validated() {
        let fields = layout();
        let columns: Vec<_> = fields.iter().collect();
        let hooks = [Hook::any(|r| {
            Ok(if r.field_value("code") == Some(Value::Null) {
                HookAction::Skip
            } else {
                HookAction::Keep
            })
        })];
        let mut records = vec![country("", "Nowhere", 0), country("BFA", "Burkina Faso", 2)];

        let extracted = extract_rows(&mut records, &hooks, &columns, &fields[0]).unwrap();
        assert_eq!(extracted.rows.len(), 1);
        assert_eq!(extracted.skipped, 1);
    }

    #[test]
    fn test_hook_error_aborts() {
        let fields = layout();
        let columns: Vec<_> = fields.iter().collect();
        let hooks = [
            Hook::any(|_| Ok(HookAction::Keep)),
            Hook::new(|r: &mut DynamicRecord| {
                if r.get("code").and_then(Value::as_str) == Some("BFA") {
                    Err("no BFA allowed".into())
                } else {
                    Ok(HookAction::Keep)
                }
            }),
        ];
        let mut records = vec![country("BEN", "Benin", 0), country("BFA", "Burkina Faso", 2)];

        let err = extract_rows(&mut records, &hooks, &columns, &fields[0]).unwrap_err();
        match err {
            Error::Hook(e) => {
                assert_eq!(e.row, 2);
                assert_eq!(e.hook, 1);
                assert_eq!(e.source.to_string(), "no BFA allowed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let fields = layout();
        let stray = FieldInfo::owned("region", "region", SqlType::Text);
        let columns = vec![&fields[0], &stray];
        let mut record = country("BEN", "Benin", 0);

        let err = process_row(1, &mut record, &[], &columns, &fields[0]).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError {
                kind: ValidationErrorKind::MissingField,
                ..
            })
        ));
    }
}
