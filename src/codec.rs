//! The on-disk database format: newline-delimited JSON records, ZLIB
//! compressed (DEFLATE level 3, no header/footer/version field). Parameters
//! `(k, m, max_ambiguous)` are not stored — the caller must supply the same
//! ones used at build time.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{PyseqError, Result};
use crate::index::{BinCount, BinId, BinIndex};
use crate::kmer::KmerParams;

const COMPRESSION_LEVEL: u32 = 3;

#[derive(Serialize, Deserialize)]
struct BinEntry {
    bin_id: String,
    n: u64,
}

#[derive(Serialize, Deserialize)]
struct Record {
    kmer: String,
    bins: Vec<BinEntry>,
}

/// Writes the finalized index to `path` as a ZLIB-compressed stream of
/// newline-terminated JSON records, one per minimizer.
pub fn save_database<P: AsRef<Path>>(index: &BinIndex, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| PyseqError::io(path, e))?;
    let mut encoder = ZlibEncoder::new(BufWriter::new(file), Compression::new(COMPRESSION_LEVEL));

    for (kmer, bins) in index.minimizers() {
        let record = Record {
            kmer: kmer.clone(),
            bins: bins
                .values()
                .map(|b| BinEntry {
                    bin_id: b.bin_name.clone(),
                    n: b.unweighted,
                })
                .collect(),
        };
        let line = serde_json::to_string(&record)
            .map_err(|e| PyseqError::Format(format!("encoding database record: {e}")))?;
        encoder
            .write_all(line.as_bytes())
            .map_err(|e| PyseqError::io(path, e))?;
        encoder.write_all(b"\n").map_err(|e| PyseqError::io(path, e))?;
    }

    encoder.finish().map_err(|e| PyseqError::io(path, e))?;
    Ok(())
}

/// Loads a database file into a fresh, already-finalized index. `params`
/// must match the `(k, m, max_ambiguous)` used to build the database;
/// nothing in the file verifies this.
pub fn load_database<P: AsRef<Path>>(path: P, params: KmerParams) -> Result<BinIndex> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PyseqError::io(path, e))?;
    let mut decoder = ZlibDecoder::new(BufReader::new(file));
    let mut contents = String::new();
    decoder
        .read_to_string(&mut contents)
        .map_err(|e| PyseqError::io(path, e))?;

    let mut minimizers: HashMap<String, HashMap<BinId, BinCount>> = HashMap::new();
    for line in contents.split('\n') {
        if line.is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line).map_err(|e| {
            PyseqError::Format(format!("{}: malformed database record: {e}", path.display()))
        })?;
        let bin_map = minimizers.entry(record.kmer).or_default();
        for entry in record.bins {
            bin_map.insert(
                entry.bin_id.clone(),
                BinCount {
                    bin_name: entry.bin_id,
                    unweighted: entry.n,
                },
            );
        }
    }

    Ok(BinIndex::from_parts(params, minimizers))
}
