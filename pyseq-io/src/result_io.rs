use crate::error::{PyseqError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes the per-read result mapping as a single JSON object, with keys
/// emitted in exactly the order `results` is given in — not read-name
/// order. This is what the concurrency model requires: when scoring is
/// parallelized across reads, the merged results must still serialize in
/// input-read order, and a plain key-sorted map would silently violate
/// that. Built via `serde_json`'s `preserve_order` feature so `Map`
/// preserves insertion order instead of re-sorting by key.
pub fn write_binned_reads<T, P>(path: P, results: &[(String, T)]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut map = Map::new();
    for (name, result) in results {
        let value = serde_json::to_value(result)
            .map_err(|e| PyseqError::Format(format!("encoding result for {name}: {e}")))?;
        map.insert(name.clone(), value);
    }

    let file = File::create(path).map_err(|e| PyseqError::io(path, e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &Value::Object(map))
        .map_err(|e| PyseqError::Format(format!("writing {}: {e}", path.display())))
}
