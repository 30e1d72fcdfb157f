//! Query-time scoring: extract a read's minimizers, accumulate per-bin
//! weighted/unweighted scores against a finalized index, and pick a winner.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::BinIndex;
use crate::kmer::extract_minimizers;

/// A bin's accumulated score for one query read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinScore {
    pub weighted: f64,
    pub unweighted: u64,
}

impl Default for BinScore {
    fn default() -> Self {
        Self {
            weighted: 0.0,
            unweighted: 0,
        }
    }
}

/// One query read's outcome. `kmer_counts` is a `BTreeMap` so emission order
/// is lexicographic by bin-id, matching the tie-break policy below and
/// giving deterministic JSON output regardless of hash-map iteration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadResult {
    pub assigned_bin: Option<String>,
    pub kmer_counts: BTreeMap<String, BinScore>,
}

/// Scores `sequence` against `index`. For each observed minimizer, every
/// bin entry `index.lookup` returns for it — including zero-valued bins left
/// behind by ambiguity collapse — receives `count / d` weighted credit and
/// `count` unweighted credit, where `d` is the number of entries present
/// (not the number of nonzero entries): `"ambiguous"` is treated as an
/// ordinary bin at query time, zero-valued entries included.
pub fn score_read(index: &BinIndex, sequence: &str) -> ReadResult {
    let multiset = extract_minimizers(sequence, &index.params());
    let mut kmer_counts: BTreeMap<String, BinScore> = BTreeMap::new();

    for (minimizer, count) in multiset {
        let Some(bins) = index.lookup(&minimizer) else {
            continue;
        };
        let d = bins.len();
        if d == 0 {
            continue;
        }
        for bin_id in bins.keys() {
            let entry = kmer_counts.entry(bin_id.clone()).or_default();
            entry.unweighted += count;
            entry.weighted += count as f64 / d as f64;
        }
    }

    let assigned_bin = argmax_weighted(&kmer_counts);
    ReadResult {
        assigned_bin,
        kmer_counts,
    }
}

/// Deterministic tie-break: ascending lexicographic order of `bin_id`.
/// `BTreeMap` iterates in that order already, so keeping the first strictly
/// greater score (not `>=`) is enough to prefer the lexicographically
/// smallest bin on a tie.
fn argmax_weighted(kmer_counts: &BTreeMap<String, BinScore>) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (bin_id, score) in kmer_counts {
        match best {
            Some((_, best_weighted)) if score.weighted <= best_weighted => {}
            _ => best = Some((bin_id, score.weighted)),
        }
    }
    best.map(|(bin_id, _)| bin_id.to_string())
}
