//! Unit table readers.
//!
//! Two formats are understood, picked by file extension:
//!
//! * `.json`: `{"kPa": {"scale": 1000.0, "dims": {"M": 1, "L": -1, "T": -2}}, ...}`
//! * `.csv` / `.tsv`: columns `symbol`, `scale`, `dims`, where `dims` uses the
//!   unit token grammar over dimension symbols (`M L-1 T-2`; empty when dimensionless).
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;

use crate::parser::tokenize;
use crate::table::{Dimensions, UnitDefinition, UnitTable};

/// Read a unit table from a JSON, CSV or TSV file.
pub fn load_unit_table<P: AsRef<Path>>(path: P) -> Result<UnitTable> {
    extend_unit_table(UnitTable::new(), path)
}

/// Read definitions from a file on top of `base`; entries from the file win.
pub fn extend_unit_table<P: AsRef<Path>>(mut base: UnitTable, path: P) -> Result<UnitTable> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    let definitions = match ext.as_deref() {
        Some("json") => read_json_definitions(path)?,
        Some("csv") => read_delimited_definitions(path, b',')?,
        Some("tsv") => read_delimited_definitions(path, b'\t')?,
        _ => bail!(
            "Unit table must have a .json, .csv or .tsv extension: {}",
            path.display()
        ),
    };

    let count = definitions.len();
    for (symbol, definition) in definitions {
        base.insert(&symbol, definition)
            .with_context(|| format!("Invalid definition for '{}' in {}", symbol, path.display()))?;
    }
    log::info!("Loaded {} unit definitions from {}", count, path.display());
    Ok(base)
}

fn read_json_definitions(path: &Path) -> Result<Vec<(String, UnitDefinition)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read unit table: {}", path.display()))?;
    let definitions: BTreeMap<String, UnitDefinition> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse unit table: {}", path.display()))?;
    Ok(definitions.into_iter().collect())
}

fn read_delimited_definitions(path: &Path, delimiter: u8) -> Result<Vec<(String, UnitDefinition)>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open unit table: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read unit table header row")?
        .clone();
    let symbol_idx = find_column(&headers, "symbol")?;
    let scale_idx = find_column(&headers, "scale")?;
    let dims_idx = headers.iter().position(|h| h.eq_ignore_ascii_case("dims"));

    let mut definitions = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let symbol = record
            .get(symbol_idx)
            .ok_or_else(|| anyhow!("Missing symbol at row {}", row_idx + 1))?
            .to_string();
        let scale = record
            .get(scale_idx)
            .ok_or_else(|| anyhow!("Missing scale at row {}", row_idx + 1))?
            .parse::<f64>()
            .with_context(|| format!("Invalid scale for '{}' at row {}", symbol, row_idx + 1))?;
        let dims = match dims_idx.and_then(|idx| record.get(idx)) {
            Some(text) => parse_dimensions(text)
                .with_context(|| format!("Invalid dims for '{}' at row {}", symbol, row_idx + 1))?,
            None => Dimensions::new(),
        };

        definitions.push((symbol, UnitDefinition { scale, dims }));
    }
    Ok(definitions)
}

/// `"M L-1 T-2"` -> `{L: -1, M: 1, T: -2}`. Repeated dimensions accumulate.
pub fn parse_dimensions(text: &str) -> Result<Dimensions> {
    let mut dims = Dimensions::new();
    for token in tokenize(text)? {
        let entry = dims.entry(token.symbol).or_insert(0);
        *entry = entry
            .checked_add(token.exponent)
            .ok_or_else(|| anyhow!("Dimension exponent overflow in '{}'", text.trim()))?;
    }
    dims.retain(|_, exp| *exp != 0);
    Ok(dims)
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("Missing '{}' column in unit table header", name))
}
