//! The two top-level flows named in the CLI: build a database from
//! references, or bin reads against a database (existing or rebuilt on the
//! fly). Argument parsing itself lives in the `pyseq` binary; this module
//! only sees already-validated parameters and paths.

use std::path::Path;

use rayon::prelude::*;

use pyseq_io::{load_bin_map, read_records, write_binned_reads};

use crate::codec::{load_database, save_database};
use crate::error::Result;
use crate::index::BinIndex;
use crate::kmer::KmerParams;
use crate::scorer::score_read;

pub struct BuildDbConfig<'a> {
    pub references_path: &'a Path,
    pub bins_path: &'a Path,
    pub output_path: &'a Path,
    pub params: KmerParams,
    pub bin_threshold: usize,
}

/// `build_db`: parse references -> construct index -> `add_references` ->
/// `finalize` -> serialize. A failed build leaves no database file, since
/// `save_database` only ever creates the output after the index is fully
/// finalized in memory.
pub fn build_db(config: &BuildDbConfig) -> Result<()> {
    let bin_map = load_bin_map(config.bins_path)?;
    let references = read_records(config.references_path)?;

    let mut index = BinIndex::new(config.params);
    index.add_references(&references, &bin_map);
    index.finalize(config.bin_threshold);

    save_database(&index, config.output_path)
}

/// Where `bin_reads` gets its index from: a pre-built database, or a fresh
/// build from references (mirroring `build_db`'s insert-then-finalize path).
pub enum ReferenceSource<'a> {
    Database(&'a Path),
    References {
        path: &'a Path,
        bin_threshold: usize,
    },
}

pub struct BinReadsConfig<'a> {
    pub source: ReferenceSource<'a>,
    pub reads_path: &'a Path,
    pub bins_path: &'a Path,
    pub output_path: &'a Path,
    pub params: KmerParams,
}

/// `bin_reads`: load or rebuild the index, score every query read against
/// it, and emit one JSON object keyed by read name. `bins_path` is always
/// loaded (the CLI requires it) but is only consulted when rebuilding from
/// references; a pre-built database already has bin assignments baked in.
pub fn bin_reads(config: &BinReadsConfig) -> Result<()> {
    let index = match &config.source {
        ReferenceSource::Database(db_path) => load_database(db_path, config.params)?,
        ReferenceSource::References { path, bin_threshold } => {
            let bin_map = load_bin_map(config.bins_path)?;
            let references = read_records(path)?;
            let mut index = BinIndex::new(config.params);
            index.add_references(&references, &bin_map);
            index.finalize(*bin_threshold);
            index
        }
    };

    let reads = read_records(config.reads_path)?;
    // Reads are independent, so scoring is the one safe seam to parallelize.
    // `par_iter().map(...).collect::<Vec<_>>()` is an indexed parallel
    // collect, so the result vector comes back in input-read order
    // regardless of which thread finishes first; that order is what gets
    // serialized, not a re-sort by read name.
    let scored: Vec<(String, crate::scorer::ReadResult)> = reads
        .par_iter()
        .map(|read| (read.name.clone(), score_read(&index, &read.sequence)))
        .collect();

    write_binned_reads(config.output_path, &scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Property 7: scoring directly off a freshly built index and scoring
    /// off the same index after a serialize/load round trip must agree,
    /// since the database format is exactly the finalized minimizer table.
    #[test]
    fn direct_and_round_tripped_index_score_identically() {
        let params = KmerParams::new(8, 4, 0.2).unwrap();
        let mut index = BinIndex::new(params);
        index.add_sequence("A", "ACGTACGTACGT");
        index.add_sequence("B", "TTTTACGTTTTT");
        index.finalize(2);

        let db_path =
            std::env::temp_dir().join(format!("pyseq-orchestrate-test-{}.dbi", std::process::id()));
        save_database(&index, &db_path).unwrap();
        let loaded = load_database(&db_path, params).unwrap();
        std::fs::remove_file(&db_path).unwrap();

        for query in ["ACGTACGTACGT", "TTTTACGTTTTT", "GGGGGGGGGGGG"] {
            let direct = score_read(&index, query);
            let round_tripped = score_read(&loaded, query);
            assert_eq!(direct.assigned_bin, round_tripped.assigned_bin);
            assert_eq!(direct.kmer_counts, round_tripped.kmer_counts);
        }
    }

    #[test]
    fn build_db_then_bin_reads_produces_expected_assignment() {
        let dir = std::env::temp_dir().join(format!("pyseq-orchestrate-e2e-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let references_path = dir.join("refs.fasta");
        std::fs::write(
            &references_path,
            ">r1\nACGTACGTACGTACGTACGTACGTACGTACG\n",
        )
        .unwrap();

        let bins_path = dir.join("bins.json");
        let mut bin_map = HashMap::new();
        bin_map.insert("r1".to_string(), "A".to_string());
        std::fs::write(&bins_path, serde_json::to_string(&bin_map).unwrap()).unwrap();

        let db_path = dir.join("database.pyseq.dbi");
        let params = KmerParams::new(31, 19, 0.2).unwrap();
        build_db(&BuildDbConfig {
            references_path: &references_path,
            bins_path: &bins_path,
            output_path: &db_path,
            params,
            bin_threshold: 2,
        })
        .unwrap();

        let reads_path = dir.join("reads.fasta");
        std::fs::write(
            &reads_path,
            ">q1\nACGTACGTACGTACGTACGTACGTACGTACG\n",
        )
        .unwrap();

        let output_path = dir.join("binned_reads.json");
        bin_reads(&BinReadsConfig {
            source: ReferenceSource::Database(&db_path),
            reads_path: &reads_path,
            bins_path: &bins_path,
            output_path: &output_path,
            params,
        })
        .unwrap();

        let output = std::fs::read_to_string(&output_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["q1"]["assigned_bin"], "A");
        assert_eq!(parsed["q1"]["kmer_counts"]["A"]["unweighted"], 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
