//! JSON configuration files for the command-line tools.
use crate::detector::GhtParams;
use crate::error::{GhtError, Result};
use std::fs;
use std::path::Path;

/// Read `GhtParams` from a JSON file; omitted fields keep their defaults.
pub fn load_config(path: &Path) -> Result<GhtParams> {
    let data = fs::read_to_string(path).map_err(|e| GhtError::io(path, e))?;
    let params: GhtParams = serde_json::from_str(&data).map_err(|e| {
        GhtError::InvalidInput(format!("failed to parse config {}: {e}", path.display()))
    })?;
    params.validate()?;
    Ok(params)
}
