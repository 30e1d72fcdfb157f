//! The bin-annotated minimizer index: insert during build, collapse
//! over-ambiguous minimizers at `finalize`, then serve read-only lookups.

use std::collections::HashMap;

use pyseq_io::SeqRecord;

use crate::kmer::{extract_minimizers, KmerParams};

pub type BinId = String;

/// Observation count for one `(minimizer, bin)` pair. `weighted` is a
/// query-time quantity only; within the index itself it is always `0.0` and
/// is not serialized by the codec.
#[derive(Debug, Clone, PartialEq)]
pub struct BinCount {
    pub bin_name: BinId,
    pub unweighted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Empty,
    Building,
    Finalized,
}

/// `minimizer -> (bin_id -> BinCount)`, plus per-bin totals tracked during
/// build. Enforcement of the `Empty -> Building -> Finalized` lifecycle is
/// advisory: callers are expected to respect the ordering documented on each
/// method.
pub struct BinIndex {
    params: KmerParams,
    minimizers: HashMap<String, HashMap<BinId, BinCount>>,
    bin_totals: HashMap<BinId, u64>,
    state: State,
}

impl BinIndex {
    pub fn new(params: KmerParams) -> Self {
        Self {
            params,
            minimizers: HashMap::new(),
            bin_totals: HashMap::new(),
            state: State::Empty,
        }
    }

    pub fn params(&self) -> KmerParams {
        self.params
    }

    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    /// Extracts `sequence`'s minimizers and folds their counts into
    /// `bin_id`. Rejected (by assertion) once the index has been finalized.
    pub fn add_sequence(&mut self, bin_id: &str, sequence: &str) {
        debug_assert!(
            self.state != State::Finalized,
            "add_sequence called on a finalized index"
        );
        self.state = State::Building;

        let counts = extract_minimizers(sequence, &self.params);
        for (minimizer, count) in counts {
            *self.bin_totals.entry(bin_id.to_string()).or_insert(0) += count;

            let bin_entry = self
                .minimizers
                .entry(minimizer)
                .or_default()
                .entry(bin_id.to_string())
                .or_insert_with(|| BinCount {
                    bin_name: bin_id.to_string(),
                    unweighted: 0,
                });
            bin_entry.unweighted += count;
        }
    }

    /// Folds every record whose name is present in `bin_map` into the index
    /// under its assigned bin. Records absent from `bin_map` are silently
    /// skipped (`UnmappedReference`, not an error).
    pub fn add_references(&mut self, records: &[SeqRecord], bin_map: &HashMap<String, String>) {
        for record in records {
            match bin_map.get(&record.name) {
                Some(bin_id) => self.add_sequence(bin_id, &record.sequence),
                None => log::debug!("{}: no bin assignment, skipping", record.name),
            }
        }
    }

    /// Collapses every minimizer whose bin set exceeds `bin_threshold` into
    /// a single `"ambiguous"` entry holding the sum of the collapsed bins'
    /// `unweighted` counts, then zeroes those bins (they remain present in
    /// the map — lookup still returns them, per the scorer's `d` contract).
    /// Idempotent to call twice, but the lifecycle only expects one call.
    pub fn finalize(&mut self, bin_threshold: usize) {
        let mut collapsed_minimizers = 0usize;
        for bins in self.minimizers.values_mut() {
            if bins.len() > bin_threshold {
                let collapsed: u64 = bins.values().map(|b| b.unweighted).sum();
                for bin in bins.values_mut() {
                    bin.unweighted = 0;
                }
                bins.insert(
                    "ambiguous".to_string(),
                    BinCount {
                        bin_name: "ambiguous".to_string(),
                        unweighted: collapsed,
                    },
                );
                collapsed_minimizers += 1;
            }
        }
        log::debug!(
            "finalize: collapsed {collapsed_minimizers} minimizer(s) above bin_threshold={bin_threshold}"
        );
        self.state = State::Finalized;
    }

    /// Returns the bin map for `minimizer`, or `None` if it was never
    /// observed. No mutation; valid to call at any lifecycle stage.
    pub fn lookup(&self, minimizer: &str) -> Option<&HashMap<BinId, BinCount>> {
        self.minimizers.get(minimizer)
    }

    pub fn bin_totals(&self) -> &HashMap<BinId, u64> {
        &self.bin_totals
    }

    pub(crate) fn minimizers(&self) -> &HashMap<String, HashMap<BinId, BinCount>> {
        &self.minimizers
    }

    /// Reconstructs an already-finalized index from a loaded minimizer
    /// table (used by the codec). `bin_totals` is empty: it is a build-time
    /// bookkeeping structure not persisted by the database format.
    pub(crate) fn from_parts(
        params: KmerParams,
        minimizers: HashMap<String, HashMap<BinId, BinCount>>,
    ) -> Self {
        Self {
            params,
            minimizers,
            bin_totals: HashMap::new(),
            state: State::Finalized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> KmerParams {
        KmerParams::new(8, 4, 0.2).unwrap()
    }

    #[test]
    fn finalize_is_a_no_op_below_threshold() {
        let mut idx = BinIndex::new(params());
        idx.add_sequence("A", "ACGTACGTACGT");
        idx.finalize(2);
        for bins in idx.minimizers.values() {
            assert!(bins.len() <= 2);
            assert!(!bins.contains_key("ambiguous"));
        }
    }

    #[test]
    fn finalize_collapses_minimizers_above_threshold_and_conserves_mass() {
        let mut idx = BinIndex::new(params());
        // All three references share the same 8-mer so the shared minimizer
        // lands in three bins, exceeding bin_threshold=2.
        idx.add_sequence("A", "ACGTACGT");
        idx.add_sequence("B", "ACGTACGT");
        idx.add_sequence("C", "ACGTACGT");

        let before: u64 = idx
            .minimizers
            .values()
            .flat_map(|bins| bins.values())
            .map(|b| b.unweighted)
            .sum();

        idx.finalize(2);

        let after: u64 = idx
            .minimizers
            .values()
            .flat_map(|bins| bins.values())
            .map(|b| b.unweighted)
            .sum();
        assert_eq!(before, after);

        for bins in idx.minimizers.values() {
            if bins.len() > 2 {
                assert!(bins.contains_key("ambiguous"));
                for (bin_id, count) in bins {
                    if bin_id != "ambiguous" {
                        assert_eq!(count.unweighted, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn unmapped_references_are_skipped() {
        let mut idx = BinIndex::new(params());
        let records = vec![SeqRecord::new("r1", b"ACGTACGT")];
        let bin_map = HashMap::new();
        idx.add_references(&records, &bin_map);
        assert!(idx.minimizers.is_empty());
    }
}
