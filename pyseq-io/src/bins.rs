use crate::error::{PyseqError, Result};
use crate::reader::open_file;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Loads `bins.json`: a JSON object mapping reference-sequence name to bin-id.

pub fn load_bin_map<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let mut file = open_file(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PyseqError::io(path, e))?;
    serde_json::from_str(&contents)
        .map_err(|e| PyseqError::Format(format!("invalid bins.json at {}: {e}", path.display())))
}
