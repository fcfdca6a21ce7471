//! Raw extract loading with encoding and delimiter auto-detection.
//!
//! Reads every `*.csv` file of the input directory into a [`Table`] named
//! after the file stem. Cells arrive as strings; type interpretation happens
//! in the builders.

use serde_json::{json, Map};
use std::path::Path;

use crate::error::{CsvError, CsvResult, PipelineError, PipelineResult};
use crate::table::{RawTables, Table};

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV content into a table with explicit delimiter.
///
/// The first line names the columns; every data row becomes a JSON object
/// keyed by column name. Short rows pad with empty strings, extra cells are
/// ignored, blank lines are skipped.
pub fn parse_table(name: &str, content: &str, delimiter: char) -> CsvResult<Table> {
    let mut lines = content.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| CsvError::EmptyFile(name.to_string()))?;

    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders(name.to_string()));
    }

    let mut rows = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split(delimiter).collect();
        let mut row = Map::new();

        for (i, header) in headers.iter().enumerate() {
            let raw_value = values
                .get(i)
                .map(|s| s.trim().trim_matches('"'))
                .unwrap_or("");

            row.insert(header.clone(), json!(raw_value));
        }

        rows.push(row);
    }

    Ok(Table {
        name: name.to_string(),
        headers,
        rows,
    })
}

/// Load one CSV file with auto-detection of encoding and delimiter.
pub fn load_table_file(path: &Path) -> CsvResult<Table> {
    let bytes = std::fs::read(path)?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string();

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    parse_table(&name, &content, delimiter)
}

/// Load every CSV file of a directory into the raw table set.
///
/// Table name equals the file name minus its extension. Non-CSV files are
/// ignored. An input directory with no CSV file at all fails the run.
pub fn load_raw_dir(dir: &Path) -> PipelineResult<RawTables> {
    let mut raw = RawTables::new();

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
        .collect();
    entries.sort();

    for path in entries {
        raw.insert(load_table_file(&path).map_err(PipelineError::Csv)?);
    }

    if raw.is_empty() {
        return Err(PipelineError::NoRawTables(dir.display().to_string()));
    }

    Ok(raw)
}
