//! Warehouse output sink.
//!
//! Writes a finished table to `<dir>/<table name>.csv` with a header row and
//! no index column. Cell rendering is fixed: nulls become empty fields,
//! strings pass through, numbers use their JSON display form (`2.5`, not
//! `2.50`), so reruns over unchanged input produce byte-identical files.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::WarehouseConfig;
use crate::error::PipelineResult;
use crate::table::Table;

/// CSV sink over the two warehouse output directories.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dim_dir: PathBuf,
    fact_dir: PathBuf,
}

impl CsvSink {
    pub fn new(config: &WarehouseConfig) -> Self {
        Self {
            dim_dir: config.dim_dir.clone(),
            fact_dir: config.fact_dir.clone(),
        }
    }

    /// Write a dimension table, returning the file path.
    pub fn write_dim(&self, table: &Table) -> PipelineResult<PathBuf> {
        write_table(&self.dim_dir, table)
    }

    /// Write a fact table, returning the file path.
    pub fn write_fact(&self, table: &Table) -> PipelineResult<PathBuf> {
        write_table(&self.fact_dir, table)
    }
}

fn write_table(dir: &Path, table: &Table) -> PipelineResult<PathBuf> {
    let path = dir.join(format!("{}.csv", table.name));
    let mut writer = csv::Writer::from_path(&path)?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        let record: Vec<String> = table
            .headers
            .iter()
            .map(|h| render_cell(row.get(h).unwrap_or(&Value::Null)))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(path)
}

/// CSV field form of a cell.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_cell() {
        assert_eq!(render_cell(&Value::Null), "");
        assert_eq!(render_cell(&json!("Web")), "Web");
        assert_eq!(render_cell(&json!(20240405)), "20240405");
        assert_eq!(render_cell(&json!(2.5)), "2.5");
        assert_eq!(render_cell(&json!(-60)), "-60");
    }

    #[test]
    fn test_write_table_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = WarehouseConfig::new(dir.path(), dir.path());
        std::fs::create_dir_all(&config.dim_dir).unwrap();
        let sink = CsvSink::new(&config);

        let mut table = Table::new(
            "dim_channels",
            vec!["channel_id".into(), "channel_name".into()],
        );
        let mut row = serde_json::Map::new();
        row.insert("channel_id".into(), json!("1"));
        row.insert("channel_name".into(), Value::Null);
        table.rows.push(row);

        let path = sink.write_dim(&table).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "channel_id,channel_name\n1,\n");
    }
}
