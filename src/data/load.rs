use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::parse::{parse_csv_records, parse_json_records};
use super::records::PassDataset;

pub fn load_pass_dataset(path: &str) -> Result<PassDataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read pass export {path}"))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let records = if is_json {
        parse_json_records(&raw).with_context(|| format!("failed to parse {path} as JSON"))?
    } else {
        parse_csv_records(&raw).with_context(|| format!("failed to parse {path} as CSV"))?
    };

    if records.is_empty() {
        return Err(anyhow!("pass export {path} contains no usable rows"));
    }

    Ok(PassDataset::from_records(records))
}
