//! # Starmill - star-schema warehouse builder
//!
//! Starmill transforms a directory of normalized relational CSV extracts
//! (orders, customers, products, payments, sessions, survey responses,
//! shipments) into a denormalized star-schema warehouse: six dimension
//! tables and five fact tables ready for analytical querying.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  RAW/*.csv  │────▶│   Loader    │────▶│  Transform   │────▶│ warehouse/  │
//! │  (extracts) │     │ (auto-enc)  │     │ (dims+facts) │     │  dim, fact  │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! Dimensions build first, then facts; every join is a left join so a fact
//! table keeps one row per row of its primary source.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use starmill::{run, WarehouseConfig};
//!
//! fn main() {
//!     let report = run(&WarehouseConfig::default()).unwrap();
//!     println!("Wrote {} fact tables", report.facts.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Input/output directory configuration
//! - [`table`] - In-memory tables, joins and projections
//! - [`loader`] - CSV loading with auto-detection
//! - [`transform`] - Date-key codec, builders and pipeline
//! - [`sink`] - Warehouse CSV output
//! - [`logs`] - Progress output

// Core modules
pub mod config;
pub mod error;
pub mod logs;

// Tables
pub mod table;

// Loading
pub mod loader;

// Transformation
pub mod transform;

// Output
pub mod sink;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, PipelineError, TableError};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{WarehouseConfig, DEFAULT_INPUT_DIR, DEFAULT_WAREHOUSE_DIR};

// =============================================================================
// Re-exports - Tables
// =============================================================================

pub use table::{Dimensions, RawTables, Table};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use loader::{detect_delimiter, detect_encoding, load_raw_dir, load_table_file, parse_table};

// =============================================================================
// Re-exports - Date-key codec
// =============================================================================

pub use transform::datekey::{date_key, date_of_key, key_of_date, parse_timestamp};

// =============================================================================
// Re-exports - Builders
// =============================================================================

pub use transform::dims::{
    dim_calendar, dim_channel, dim_customer, dim_product, dim_province, dim_store,
};
pub use transform::facts::{
    fact_nps, fact_payment, fact_sales, fact_shipment, fact_web_session,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{run, RunReport, TableSummary};

// =============================================================================
// Re-exports - Sink
// =============================================================================

pub use sink::CsvSink;
