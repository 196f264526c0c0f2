//! In-memory storage backend.
//!
//! Used for local development when the hosted backend is unconfigured and
//! by the integration tests. Emulates the backend-assigned behavior the
//! services rely on: numeric auto-increment ids for operators, insert
//! timestamps, and unique-key conflicts.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use homewiz_core::query::SortOrder;
use homewiz_core::store::{RangeClause, SelectQuery, SelectResult, StoreClient, StoreError};

/// Static schema knowledge for the known tables.
struct TableSchema {
    id_column: &'static str,
    /// Backend assigns a numeric id on insert.
    auto_id: bool,
    /// Backend stamps `created_at` on insert.
    stamp_created_at: bool,
    /// Columns with a unique constraint besides the id.
    unique: &'static [&'static str],
}

/// Column defaults the real backend's schema would materialize on insert.
fn defaults_for(table: &str) -> Vec<(&'static str, Value)> {
    match table {
        "buildings" => vec![
            ("wifi_included", Value::Bool(true)),
            ("laundry_onsite", Value::Bool(true)),
        ],
        "rooms" => vec![
            ("status", Value::String("AVAILABLE".into())),
            ("maximum_people_in_room", Value::from(1)),
        ],
        "tenants" => vec![
            ("status", Value::String("ACTIVE".into())),
            ("account_status", Value::String("CURRENT".into())),
        ],
        "operators" => vec![
            ("active", Value::Bool(true)),
            ("operator_type", Value::String("LEASING_AGENT".into())),
        ],
        "leads" => vec![
            ("status", Value::String("EXPLORING".into())),
            ("interaction_count", Value::from(0)),
        ],
        _ => Vec::new(),
    }
}

fn schema_for(table: &str) -> TableSchema {
    match table {
        "buildings" => TableSchema {
            id_column: "building_id",
            auto_id: false,
            stamp_created_at: true,
            unique: &[],
        },
        "rooms" => TableSchema {
            id_column: "room_id",
            auto_id: false,
            stamp_created_at: true,
            unique: &[],
        },
        "tenants" => TableSchema {
            id_column: "tenant_id",
            auto_id: false,
            stamp_created_at: true,
            unique: &["tenant_email"],
        },
        "operators" => TableSchema {
            id_column: "operator_id",
            auto_id: true,
            stamp_created_at: false,
            unique: &["email"],
        },
        "leads" => TableSchema {
            id_column: "lead_id",
            auto_id: false,
            stamp_created_at: true,
            unique: &[],
        },
        _ => TableSchema {
            id_column: "id",
            auto_id: false,
            stamp_created_at: false,
            unique: &[],
        },
    }
}

/// Table-keyed in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rows directly, bypassing insert-time stamping. Test setup
    /// helper.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().extend(rows);
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        // Nulls sort last regardless of direction.
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => match (a.as_str(), b.as_str()) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => a.to_string().cmp(&b.to_string()),
            },
        },
    }
}

fn matches_filters(row: &Value, query: &SelectQuery) -> bool {
    let object = match row.as_object() {
        Some(object) => object,
        None => return false,
    };

    for (column, expected) in &query.filters {
        let actual = object.get(column).unwrap_or(&Value::Null);
        if !values_equal(actual, expected) {
            return false;
        }
    }

    for RangeClause { column, min, max } in &query.ranges {
        let actual = object.get(column).unwrap_or(&Value::Null);
        if actual.is_null() {
            return false;
        }
        if let Some(min) = min {
            if compare_values(actual, min) == Ordering::Less {
                return false;
            }
        }
        if let Some(max) = max {
            if compare_values(actual, max) == Ordering::Greater {
                return false;
            }
        }
    }

    if let Some(search) = &query.search {
        let needle = search.term.to_lowercase();
        let hit = search.fields.iter().any(|field| {
            object
                .get(field)
                .and_then(Value::as_str)
                .map(|text| text.to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
        if !hit {
            return false;
        }
    }

    true
}

impl StoreClient for MemoryStore {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<SelectResult, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.get(table).cloned().unwrap_or_default();
        drop(tables);

        let mut matched: Vec<Value> = rows
            .into_iter()
            .filter(|row| matches_filters(row, &query))
            .collect();

        let total = matched.len() as u64;

        if let Some((column, order)) = &query.order {
            matched.sort_by(|a, b| {
                let left = a.get(column).unwrap_or(&Value::Null);
                let right = b.get(column).unwrap_or(&Value::Null);
                let ordering = compare_values(left, right);
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        let offset = query.offset.unwrap_or(0) as usize;
        let page: Vec<Value> = match query.limit {
            Some(limit) => matched.into_iter().skip(offset).take(limit as usize).collect(),
            None => matched.into_iter().skip(offset).collect(),
        };

        Ok(SelectResult {
            rows: page,
            count: query.count.then_some(total),
        })
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let mut object: Map<String, Value> = match row {
            Value::Object(object) => object,
            _ => {
                return Err(StoreError::Decode(
                    "insert payload must be a JSON object".into(),
                ));
            }
        };

        let schema = schema_for(table);
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        if schema.auto_id {
            let next = rows
                .iter()
                .filter_map(|existing| existing.get(schema.id_column))
                .filter_map(Value::as_i64)
                .max()
                .unwrap_or(0)
                + 1;
            object.insert(schema.id_column.to_string(), Value::from(next));
        } else if let Some(id) = object.get(schema.id_column) {
            let duplicate = rows.iter().any(|existing| {
                existing
                    .get(schema.id_column)
                    .is_some_and(|existing_id| values_equal(existing_id, id))
            });
            if duplicate {
                return Err(StoreError::Conflict {
                    table: table.to_string(),
                    message: format!("duplicate {}: {}", schema.id_column, id),
                });
            }
        }

        for column in schema.unique {
            if let Some(value) = object.get(*column) {
                let duplicate = rows.iter().any(|existing| {
                    existing
                        .get(*column)
                        .is_some_and(|existing_value| values_equal(existing_value, value))
                });
                if duplicate {
                    return Err(StoreError::Conflict {
                        table: table.to_string(),
                        message: format!("duplicate {column}: {value}"),
                    });
                }
            }
        }

        if schema.stamp_created_at && !object.contains_key("created_at") {
            object.insert(
                "created_at".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }

        for (column, value) in defaults_for(table) {
            object.entry(column.to_string()).or_insert(value);
        }

        let stored = Value::Object(object);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id: &Value,
        patch: Value,
    ) -> Result<Value, StoreError> {
        let patch = match patch {
            Value::Object(object) => object,
            _ => {
                return Err(StoreError::Decode(
                    "update payload must be a JSON object".into(),
                ));
            }
        };

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        for row in rows.iter_mut() {
            let matches = row
                .get(id_column)
                .is_some_and(|existing| values_equal(existing, id));
            if !matches {
                continue;
            }
            if let Some(object) = row.as_object_mut() {
                for (column, value) in &patch {
                    object.insert(column.clone(), value.clone());
                }
            }
            return Ok(row.clone());
        }

        Err(StoreError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        })
    }

    async fn delete(&self, table: &str, id_column: &str, id: &Value) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| {
            !row.get(id_column)
                .is_some_and(|existing| values_equal(existing, id))
        });
        Ok((before - rows.len()) as u64)
    }
}
