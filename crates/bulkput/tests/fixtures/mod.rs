//! Record types and an in-memory upserting destination for tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Mutex;

use bulkput::{
    BatchRequest, BatchWriter, Cx, Error, FieldInfo, Outcome, Record, RelationshipKind, SqlType,
    Value,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Country {
    pub code: String,
    pub short_name: String,
    pub special_notes: String,
    pub region: String,
    pub income_group: String,
    pub count: i64,
    pub avg_age: f64,
    pub tall: bool,
}

impl Record for Country {
    fn table_name(&self) -> &str {
        "countries"
    }

    fn fields(&self) -> &[FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("code", "code", SqlType::Text).primary_key(true),
            FieldInfo::new("short_name", "short_name", SqlType::Text),
            FieldInfo::new("special_notes", "special_notes", SqlType::Text),
            FieldInfo::new("region", "region", SqlType::Text),
            FieldInfo::new("income_group", "income_group", SqlType::Text),
            FieldInfo::new("count", "count", SqlType::BigInt),
            FieldInfo::new("avg_age", "avg_age", SqlType::Double),
            FieldInfo::new("tall", "tall", SqlType::Boolean),
        ];
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        let value = match field {
            "code" => self.code.as_str().into(),
            "short_name" => self.short_name.as_str().into(),
            "special_notes" => self.special_notes.as_str().into(),
            "region" => self.region.as_str().into(),
            "income_group" => self.income_group.as_str().into(),
            "count" => self.count.into(),
            "avg_age" => self.avg_age.into(),
            "tall" => self.tall.into(),
            _ => return None,
        };
        Some(value)
    }
}

pub fn country(code: &str, short_name: &str, count: i64) -> Country {
    Country {
        code: code.to_string(),
        short_name: short_name.to_string(),
        special_notes: format!("{short_name}. Special notes."),
        region: "Sub-Saharan Africa".to_string(),
        count,
        avg_age: count as f64,
        ..Country::default()
    }
}

pub fn countries() -> Vec<Country> {
    vec![
        Country {
            tall: true,
            ..country("BEN", "Benin", 0)
        },
        country("BFA", "Burkina Faso", 2),
        Country {
            region: "South Asia".to_string(),
            ..country("BGD", "Bangladesh", 1)
        },
    ]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct City {
    pub code: String,
    pub name: String,
    pub population: i64,
}

impl Record for City {
    fn table_name(&self) -> &str {
        "cities"
    }

    fn fields(&self) -> &[FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("code", "code", SqlType::Text).primary_key(true),
            FieldInfo::new("name", "name", SqlType::Text),
            FieldInfo::new("population", "population", SqlType::BigInt),
        ];
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "code" => Some(self.code.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            "population" => Some(self.population.into()),
            _ => None,
        }
    }
}

/// A hub with a destination-assigned key and a has-many relationship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryHub {
    pub id: i64,
    pub name: String,
    pub time_zone: String,
    pub delivery_hours: Vec<String>,
}

impl Record for DeliveryHub {
    fn table_name(&self) -> &str {
        "delivery_hubs"
    }

    fn fields(&self) -> &[FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id", "id", SqlType::BigInt)
                .primary_key(true)
                .auto_increment(true),
            FieldInfo::new("name", "name", SqlType::Text),
            FieldInfo::new("time_zone", "time_zone", SqlType::Text),
            FieldInfo::new("delivery_hours", "delivery_hours", SqlType::Json)
                .relationship(RelationshipKind::OneToMany),
        ];
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "time_zone" => Some(self.time_zone.as_str().into()),
            "delivery_hours" => Some(Value::Array(
                self.delivery_hours
                    .iter()
                    .map(|h| Value::from(h.as_str()))
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// A link row keyed by two columns, which the batcher cannot upsert.
#[derive(Debug, Clone, Default)]
pub struct SiteInterval {
    pub hub_id: i64,
    pub name: String,
}

impl Record for SiteInterval {
    fn table_name(&self) -> &str {
        "site_intervals"
    }

    fn fields(&self) -> &[FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("hub_id", "hub_id", SqlType::BigInt).primary_key(true),
            FieldInfo::new("name", "name", SqlType::Text).primary_key(true),
        ];
        FIELDS
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "hub_id" => Some(self.hub_id.into()),
            "name" => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

/// What the destination saw for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch {
    pub dialect: String,
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub batch: usize,
    pub verbose: bool,
}

type StoredRow = HashMap<String, Value>;

/// In-memory destination with upsert-by-primary-key semantics.
#[derive(Debug, Default)]
pub struct MemoryDestination {
    tables: Mutex<HashMap<String, BTreeMap<String, StoredRow>>>,
    batches: Mutex<Vec<RecordedBatch>>,
    /// Reject the batch with this index.
    fail_on_batch: Option<usize>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_batch(batch: usize) -> Self {
        Self {
            fail_on_batch: Some(batch),
            ..Self::default()
        }
    }

    /// Stored rows of `table`, ordered by primary key.
    pub fn rows(&self, table: &str) -> Vec<StoredRow> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches().iter().map(|b| b.rows.len()).collect()
    }

    fn upsert(&self, request: &BatchRequest<'_>) -> Result<u64, Error> {
        self.batches.lock().unwrap().push(RecordedBatch {
            dialect: request.dialect.to_string(),
            table: request.table.to_string(),
            primary_key: request.primary_key.to_string(),
            columns: request.columns.iter().map(|c| (*c).to_string()).collect(),
            rows: request.rows.to_vec(),
            batch: request.batch,
            verbose: request.verbose,
        });

        if self.fail_on_batch == Some(request.batch) {
            return Err(Error::Custom("connection reset by peer".to_string()));
        }

        let key_index = request
            .columns
            .iter()
            .position(|c| *c == request.primary_key)
            .ok_or_else(|| {
                Error::Custom(format!(
                    "primary key `{}` is not among the written columns",
                    request.primary_key
                ))
            })?;

        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(request.table.to_string()).or_default();
        for row in request.rows {
            let key = format!("{:?}", row[key_index]);
            let stored = table.entry(key).or_default();
            for (column, value) in request.columns.iter().zip(row) {
                stored.insert((*column).to_string(), value.clone());
            }
        }
        Ok(request.rows.len() as u64)
    }
}

impl BatchWriter for MemoryDestination {
    fn dialect(&self) -> &str {
        "memory"
    }

    fn write_batch(
        &self,
        _cx: &Cx,
        batch: &BatchRequest<'_>,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        let outcome = match self.upsert(batch) {
            Ok(affected) => Outcome::Ok(affected),
            Err(e) => Outcome::Err(e),
        };
        async move { outcome }
    }
}

pub fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> Result<T, String> {
    match outcome {
        Outcome::Ok(v) => Ok(v),
        Outcome::Err(e) => Err(format!("unexpected error: {e}")),
        Outcome::Cancelled(r) => Err(format!("cancelled: {r:?}")),
        Outcome::Panicked(p) => Err(format!("panicked: {p:?}")),
    }
}

pub fn expect_error<T: std::fmt::Debug>(outcome: Outcome<T, Error>) -> Error {
    match outcome {
        Outcome::Ok(v) => panic!("expected an error, got {v:?}"),
        Outcome::Err(e) => e,
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}
