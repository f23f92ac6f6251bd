use std::io::Read;
use std::path::Path;

use crate::error::{ProfileError, Result};

use super::model::Profile;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a profile from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / `.dat` (or no extension) – headerless delimited rows,
///   the first column holds the height samples
pub fn load_file(path: &Path) -> Result<Profile> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" | "dat" | "" => {
            let file = std::fs::File::open(path).map_err(|e| {
                ProfileError::data_format(format!("opening {}: {e}", path.display()))
            })?;
            load_profile(file)
        }
        other => Err(ProfileError::data_format(format!(
            "Unsupported file extension: .{other}"
        ))),
    }
}

/// Load a profile from an in-memory upload.
pub fn load_profile_bytes(bytes: &[u8]) -> Result<Profile> {
    load_profile(bytes)
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Table layout: no header row, comma separated, one sample per row.
/// Only the first column is read; extra columns and ragged rows are allowed.
pub fn load_profile<R: Read>(reader: R) -> Result<Profile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record =
            result.map_err(|e| ProfileError::data_format(format!("row {row}: {e}")))?;
        let field = record.get(0).unwrap_or("");
        samples.push(parse_sample(field, row)?);
    }

    if samples.is_empty() {
        return Err(ProfileError::data_format("no data rows in input"));
    }

    log::debug!("Loaded profile with {} samples", samples.len());
    Ok(Profile::new(samples))
}

fn parse_sample(field: &str, row: usize) -> Result<f64> {
    if field.is_empty() {
        return Err(ProfileError::data_format(format!(
            "row {row}: first column is empty"
        )));
    }
    let value = field.parse::<f64>().map_err(|_| {
        ProfileError::data_format(format!("row {row}: '{field}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(ProfileError::data_format(format!(
            "row {row}: '{field}' is not a finite number"
        )));
    }
    Ok(value)
}
