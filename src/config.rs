//! Warehouse run configuration.
//!
//! Defaults are `RAW` for input and `warehouse/dim` + `warehouse/fact` for
//! output; the CLI can override the roots. All builders receive paths
//! through [`WarehouseConfig`] rather than hard-coding them.

use std::path::{Path, PathBuf};

/// Default input directory holding one CSV file per raw table.
pub const DEFAULT_INPUT_DIR: &str = "RAW";

/// Default warehouse output root.
pub const DEFAULT_WAREHOUSE_DIR: &str = "warehouse";

/// Subdirectory of the warehouse root for dimension tables.
pub const DIM_SUBDIR: &str = "dim";

/// Subdirectory of the warehouse root for fact tables.
pub const FACT_SUBDIR: &str = "fact";

/// Resolved directories for a single pipeline run.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Directory of raw CSV extracts, one file per table.
    pub input_dir: PathBuf,
    /// Output directory for dimension tables.
    pub dim_dir: PathBuf,
    /// Output directory for fact tables.
    pub fact_dir: PathBuf,
}

impl WarehouseConfig {
    /// Build a config from an input directory and a warehouse root.
    pub fn new(input_dir: impl AsRef<Path>, warehouse_dir: impl AsRef<Path>) -> Self {
        let warehouse = warehouse_dir.as_ref();
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            dim_dir: warehouse.join(DIM_SUBDIR),
            fact_dir: warehouse.join(FACT_SUBDIR),
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_WAREHOUSE_DIR)
    }
}
