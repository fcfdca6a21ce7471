//! In-memory tabular relations.
//!
//! A [`Table`] is an ordered header list plus rows of JSON objects, the same
//! row representation the loader produces from CSV. Cells loaded from CSV are
//! strings; cells filled by an unmatched left join are `Null`. The builders
//! combine tables with a small set of relational operations:
//!
//! - [`Table::select`] - column projection (fails on a missing column)
//! - [`Table::rename`] - warehouse-facing column renames
//! - [`Table::left_join`] - hash join preserving left cardinality
//!
//! [`RawTables`] is the read-only name-keyed set of loaded extracts that
//! every builder consumes.

use serde_json::{Map, Value};
use std::collections::HashMap;

// =============================================================================
// Table
// =============================================================================

/// A named tabular relation.
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name; raw tables carry the file stem, outputs the warehouse name.
    pub name: String,
    /// Column names in output order.
    pub headers: Vec<String>,
    /// Rows keyed by column name. A header missing from a row reads as null.
    pub rows: Vec<Map<String, Value>>,
}

use crate::error::{TableError, TableResult};

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the table has a column with this name.
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Fail with a [`TableError::MissingColumn`] unless the column exists.
    pub fn require_column(&self, column: &str) -> TableResult<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(TableError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
        }
    }

    /// All values of one column, in row order; null for missing keys.
    pub fn column(&self, column: &str) -> TableResult<Vec<&Value>> {
        self.require_column(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(column).unwrap_or(&Value::Null))
            .collect())
    }

    /// Project onto a fixed column subset, in the given order.
    ///
    /// Fails if any requested column is not a header of this table. Cells
    /// absent from a row (null join fills) are carried as explicit nulls so
    /// every output row has every output column.
    pub fn select(&self, columns: &[&str]) -> TableResult<Table> {
        for col in columns {
            self.require_column(col)?;
        }

        let headers: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Map::new();
                for col in columns {
                    let value = row.get(*col).cloned().unwrap_or(Value::Null);
                    out.insert(col.to_string(), value);
                }
                out
            })
            .collect();

        Ok(Table {
            name: self.name.clone(),
            headers,
            rows,
        })
    }

    /// Rename columns in place, `(old, new)` pairs.
    ///
    /// Fails if an `old` name is not a column of this table.
    pub fn rename(mut self, renames: &[(&str, &str)]) -> TableResult<Table> {
        for (old, _) in renames {
            self.require_column(old)?;
        }

        for (old, new) in renames {
            for header in &mut self.headers {
                if header == old {
                    *header = new.to_string();
                }
            }
            for row in &mut self.rows {
                if let Some(value) = row.remove(*old) {
                    row.insert(new.to_string(), value);
                }
            }
        }

        Ok(self)
    }

    /// Left-join another table on `self.left_on == right.right_on`.
    ///
    /// Row count and order of the left side are preserved: the first matching
    /// right row wins, and an unmatched left row gets null fills for every
    /// joined column. Right columns that already exist on the left keep the
    /// left value (joining on a shared key therefore does not duplicate it).
    /// Empty and null keys never match, mirroring how missing foreign keys
    /// behave in the extracts.
    pub fn left_join(&self, right: &Table, left_on: &str, right_on: &str) -> TableResult<Table> {
        self.require_column(left_on)?;
        right.require_column(right_on)?;

        // Columns contributed by the right side, left columns take precedence.
        let joined_cols: Vec<&String> = right
            .headers
            .iter()
            .filter(|h| !self.has_column(h))
            .collect();

        let mut headers = self.headers.clone();
        headers.extend(joined_cols.iter().map(|h| (*h).clone()));

        // First occurrence of each key wins.
        let mut index: HashMap<&str, &Map<String, Value>> = HashMap::new();
        for row in &right.rows {
            if let Some(key) = join_key(row.get(right_on)) {
                index.entry(key).or_insert(row);
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                let matched = join_key(row.get(left_on)).and_then(|key| index.get(key));
                for col in &joined_cols {
                    let value = matched
                        .and_then(|m| m.get(col.as_str()).cloned())
                        .unwrap_or(Value::Null);
                    out.insert((*col).clone(), value);
                }
                out
            })
            .collect();

        Ok(Table {
            name: self.name.clone(),
            headers,
            rows,
        })
    }
}

/// Join key of a cell; null and empty cells never participate in a join.
fn join_key(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

// =============================================================================
// Raw table set
// =============================================================================

/// The loaded raw extracts, keyed by table name.
///
/// Populated once by the loader and read-only for the whole run.
#[derive(Debug, Default)]
pub struct RawTables {
    tables: HashMap<String, Table>,
}

impl RawTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loaded table under its name.
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Look up a table a builder cannot run without.
    pub fn required(&self, name: &str) -> TableResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| TableError::MissingTable(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Completed dimension tables, keyed by short name (`calendar`, `customer`, ...).
pub type Dimensions = HashMap<String, Table>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    fn table(name: &str, headers: &[&str], rows: Vec<Map<String, Value>>) -> Table {
        Table {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_select_projects_in_order() {
        let t = table(
            "customer",
            &["customer_id", "email", "phone"],
            vec![row(&[("customer_id", "1"), ("email", "a@b.c"), ("phone", "555")])],
        );

        let out = t.select(&["email", "customer_id"]).unwrap();
        assert_eq!(out.headers, vec!["email", "customer_id"]);
        assert_eq!(out.rows[0]["email"], "a@b.c");
    }

    #[test]
    fn test_select_missing_column_fails() {
        let t = table("customer", &["customer_id"], vec![]);
        let err = t.select(&["customer_id", "email"]).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_rename() {
        let t = table(
            "channel",
            &["channel_id", "name"],
            vec![row(&[("channel_id", "1"), ("name", "Web")])],
        );

        let out = t.rename(&[("name", "channel_name")]).unwrap();
        assert_eq!(out.headers, vec!["channel_id", "channel_name"]);
        assert_eq!(out.rows[0]["channel_name"], "Web");
        assert!(out.rows[0].get("name").is_none());
    }

    #[test]
    fn test_left_join_preserves_left_rows() {
        let items = table(
            "sales_order_item",
            &["order_id", "product_id"],
            vec![
                row(&[("order_id", "10"), ("product_id", "1")]),
                row(&[("order_id", "11"), ("product_id", "2")]),
                row(&[("order_id", "99"), ("product_id", "3")]),
            ],
        );
        let orders = table(
            "sales_order",
            &["order_id", "status"],
            vec![
                row(&[("order_id", "10"), ("status", "paid")]),
                row(&[("order_id", "11"), ("status", "open")]),
            ],
        );

        let joined = items.left_join(&orders, "order_id", "order_id").unwrap();
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.headers, vec!["order_id", "product_id", "status"]);
        assert_eq!(joined.rows[0]["status"], "paid");
        // Unmatched key fills null, row still present.
        assert_eq!(joined.rows[2]["status"], Value::Null);
    }

    #[test]
    fn test_left_join_first_match_wins() {
        let left = table("l", &["k"], vec![row(&[("k", "1")])]);
        let right = table(
            "r",
            &["k", "v"],
            vec![row(&[("k", "1"), ("v", "first")]), row(&[("k", "1"), ("v", "second")])],
        );

        let joined = left.left_join(&right, "k", "k").unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined.rows[0]["v"], "first");
    }

    #[test]
    fn test_left_join_empty_key_never_matches() {
        let left = table("l", &["k"], vec![row(&[("k", "")])]);
        let right = table("r", &["k", "v"], vec![row(&[("k", ""), ("v", "x")])]);

        let joined = left.left_join(&right, "k", "k").unwrap();
        assert_eq!(joined.rows[0]["v"], Value::Null);
    }

    #[test]
    fn test_required_table() {
        let mut raw = RawTables::new();
        raw.insert(table("payment", &["payment_id"], vec![]));

        assert!(raw.required("payment").is_ok());
        let err = raw.required("shipment").unwrap_err();
        assert!(err.to_string().contains("shipment"));
    }
}
