//! Starmill CLI - build a star-schema warehouse from raw CSV extracts.
//!
//! ```bash
//! starmill                          # RAW/ -> warehouse/{dim,fact}
//! starmill --input extracts --output out
//! ```

use clap::Parser;
use starmill::{run, WarehouseConfig, DEFAULT_INPUT_DIR, DEFAULT_WAREHOUSE_DIR};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "starmill")]
#[command(about = "Transform normalized CSV extracts into a star-schema warehouse", long_about = None)]
struct Cli {
    /// Directory of raw CSV extracts, one file per table
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    input: PathBuf,

    /// Warehouse output root (dim/ and fact/ are created inside)
    #[arg(short, long, default_value = DEFAULT_WAREHOUSE_DIR)]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = build_warehouse(&cli) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn build_warehouse(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    println!("🏭 Starting warehouse build...");

    let config = WarehouseConfig::new(&cli.input, &cli.output);
    std::fs::create_dir_all(&config.dim_dir)?;
    std::fs::create_dir_all(&config.fact_dir)?;

    let report = run(&config)?;

    println!(
        "\n✨ Done! {} dimension tables and {} fact tables in: {}",
        report.dimensions.len(),
        report.facts.len(),
        cli.output.display()
    );
    Ok(())
}
