//! JSON persistence of the r-table.
//!
//! Bucket order and per-bucket displacement order round-trip exactly; both
//! affect detection determinism. Loading never returns a partial table.
use super::{Displacement, RTable};
use crate::angle::DirectionQuantizer;
use crate::error::{GhtError, Result};
use crate::image::io::ensure_parent_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RTableFile {
    version: u32,
    direction_buckets: usize,
    centroid: [f32; 2],
    /// One entry per bucket, each a list of `[rx, ry]` pairs.
    buckets: Vec<Vec<[i32; 2]>>,
}

/// Encode `table` as JSON bytes.
pub fn save(table: &RTable) -> Result<Vec<u8>> {
    let file = RTableFile {
        version: FORMAT_VERSION,
        direction_buckets: table.bucket_count(),
        centroid: table.centroid(),
        buckets: table
            .buckets()
            .iter()
            .map(|b| b.iter().map(|d| [d.rx, d.ry]).collect())
            .collect(),
    };
    serde_json::to_vec(&file).map_err(|e| GhtError::Serialization(e.to_string()))
}

/// Decode a table produced by [`save`].
pub fn load(bytes: &[u8]) -> Result<RTable> {
    let file: RTableFile =
        serde_json::from_slice(bytes).map_err(|e| GhtError::Serialization(e.to_string()))?;
    if file.version != FORMAT_VERSION {
        return Err(GhtError::Serialization(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            file.version
        )));
    }
    let quantizer = DirectionQuantizer::new(file.direction_buckets).ok_or_else(|| {
        GhtError::Serialization("direction bucket count must be positive".to_string())
    })?;
    let buckets = file
        .buckets
        .into_iter()
        .map(|b| b.into_iter().map(|[rx, ry]| Displacement::new(rx, ry)).collect())
        .collect();
    RTable::from_parts(quantizer, file.centroid, buckets).map_err(|e| match e {
        GhtError::InvalidInput(msg) => GhtError::Serialization(msg),
        other => other,
    })
}

/// Write `table` to `path`, creating parent directories.
pub fn save_file(table: &RTable, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let bytes = save(table)?;
    fs::write(path, bytes).map_err(|e| GhtError::io(path, e))
}

/// Read a table from `path`.
pub fn load_file(path: &Path) -> Result<RTable> {
    let bytes = fs::read(path).map_err(|e| GhtError::io(path, e))?;
    load(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> RTable {
        let q = DirectionQuantizer::new(4).expect("quantizer");
        RTable::from_parts(
            q,
            [3.5, -1.25],
            vec![
                vec![Displacement::new(3, -1), Displacement::new(-7, 2)],
                vec![],
                vec![Displacement::new(0, 0)],
                vec![Displacement::new(5, 5), Displacement::new(1, 9), Displacement::new(-2, 0)],
            ],
        )
        .expect("table")
    }

    #[test]
    fn round_trip_preserves_buckets_and_order() {
        let table = sample_table();
        let bytes = save(&table).expect("save");
        assert!(!bytes.is_empty());
        let loaded = load(&bytes).expect("load");
        assert_eq!(loaded, table);
    }

    #[test]
    fn saved_bytes_follow_the_model_layout() {
        let bytes = save(&sample_table()).expect("save");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["version"], 1);
        assert_eq!(value["directionBuckets"], 4);
        assert_eq!(value["buckets"][0][1], serde_json::json!([-7, 2]));
        assert_eq!(value["buckets"][1], serde_json::json!([]));
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let bytes = save(&sample_table()).expect("save");
        let err = load(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, GhtError::Serialization(_)), "got {err:?}");
    }

    #[test]
    fn inconsistent_bucket_count_is_rejected() {
        let json = br#"{"version":1,"directionBuckets":8,"centroid":[0.0,0.0],"buckets":[[],[]]}"#;
        assert!(matches!(load(json), Err(GhtError::Serialization(_))));

        let json = br#"{"version":1,"directionBuckets":0,"centroid":[0.0,0.0],"buckets":[]}"#;
        assert!(matches!(load(json), Err(GhtError::Serialization(_))));

        let json = br#"{"version":2,"directionBuckets":1,"centroid":[0.0,0.0],"buckets":[[]]}"#;
        assert!(matches!(load(json), Err(GhtError::Serialization(_))));
    }

    #[test]
    fn file_round_trip() {
        let dir = std::env::temp_dir().join(format!("ght_model_{}", std::process::id()));
        let path = dir.join("nested").join("shape.json");
        let table = sample_table();
        save_file(&table, &path).expect("save");
        assert_eq!(load_file(&path).expect("load"), table);
        assert!(matches!(
            load_file(&dir.join("missing.json")),
            Err(GhtError::Io { .. })
        ));
        let _ = fs::remove_dir_all(dir);
    }
}
