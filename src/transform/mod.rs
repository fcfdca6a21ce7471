//! Transformation core: date-key codec, dimension and fact builders, and the
//! pipeline that sequences them.

pub mod datekey;
pub mod dims;
pub mod facts;
pub mod pipeline;

use crate::table::Table;

/// Rebrand a derived table with its warehouse output name.
pub(crate) fn with_name(name: &str, mut table: Table) -> Table {
    table.name = name.to_string();
    table
}
