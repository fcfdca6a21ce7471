//! Pipeline orchestrator.
//!
//! A run is one-shot and strictly sequential: load the raw extracts, build
//! the six dimensions in fixed order, then the five facts, writing each
//! table to the sink as it completes. The first builder error aborts the
//! run; dimension files already written stay on disk, no fact file is
//! produced after a fact-phase failure.

use serde::Serialize;

use super::{dims, facts};
use crate::config::WarehouseConfig;
use crate::error::{PipelineResult, TableResult};
use crate::loader;
use crate::logs::{log_info, log_success};
use crate::sink::CsvSink;
use crate::table::{Dimensions, RawTables, Table};

type DimBuilder = fn(&RawTables) -> TableResult<Table>;
type FactBuilder = fn(&RawTables, &Dimensions) -> TableResult<Table>;

/// Dimension builders in execution order, keyed by dimension-set short name.
const DIM_BUILDERS: &[(&str, DimBuilder)] = &[
    ("calendar", dims::dim_calendar),
    ("customer", dims::dim_customer),
    ("product", dims::dim_product),
    ("channel", dims::dim_channel),
    ("province", dims::dim_province),
    ("store", dims::dim_store),
];

/// Fact builders in execution order.
const FACT_BUILDERS: &[FactBuilder] = &[
    facts::fact_sales,
    facts::fact_payment,
    facts::fact_nps,
    facts::fact_web_session,
    facts::fact_shipment,
];

/// Name and row count of one written table.
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dimensions: Vec<TableSummary>,
    pub facts: Vec<TableSummary>,
}

/// Run the full load -> transform -> write sequence.
pub fn run(config: &WarehouseConfig) -> PipelineResult<RunReport> {
    log_info(format!("Reading raw extracts from: {}", config.input_dir.display()));
    let raw = loader::load_raw_dir(&config.input_dir)?;
    log_success(format!("Loaded {} raw tables", raw.len()));

    let sink = CsvSink::new(config);
    let mut report = RunReport {
        dimensions: Vec::new(),
        facts: Vec::new(),
    };

    log_info("--> Building dimension tables...");
    let mut dimensions = Dimensions::new();
    for (key, builder) in DIM_BUILDERS {
        let table = builder(&raw)?;
        let path = sink.write_dim(&table)?;
        log_success(format!("{} ({} rows) -> {}", table.name, table.len(), path.display()));
        report.dimensions.push(TableSummary {
            name: table.name.clone(),
            rows: table.len(),
        });
        dimensions.insert(key.to_string(), table);
    }

    log_info("--> Building fact tables...");
    for builder in FACT_BUILDERS {
        let table = builder(&raw, &dimensions)?;
        let path = sink.write_fact(&table)?;
        log_success(format!("{} ({} rows) -> {}", table.name, table.len(), path.display()));
        report.facts.push(TableSummary {
            name: table.name,
            rows: table.rows.len(),
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_order_is_fixed() {
        let dim_names: Vec<&str> = DIM_BUILDERS.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            dim_names,
            vec!["calendar", "customer", "product", "channel", "province", "store"]
        );
        assert_eq!(FACT_BUILDERS.len(), 5);
    }
}
