//! Canonicalized k-mer enumeration with ambiguity filtering, and minimizer
//! extraction. The minimizer is a literal subsequence — there is no hashing
//! or approximate matching here, deliberately, per the project's scope.

use crate::error::PyseqError;
use crate::nucleotide::{ambiguity_fraction, reverse_complement};
use std::collections::HashMap;

/// Validated `(k, m, max_ambiguous)` triple shared by index build and query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KmerParams {
    pub k: usize,
    pub m: usize,
    pub max_ambiguous: f64,
}

impl KmerParams {
    pub fn new(k: usize, m: usize, max_ambiguous: f64) -> Result<Self, PyseqError> {
        if k == 0 {
            return Err(PyseqError::InvalidParameter("k must be positive".into()));
        }
        if m == 0 {
            return Err(PyseqError::InvalidParameter("m must be positive".into()));
        }
        if m > k {
            return Err(PyseqError::InvalidParameter(format!(
                "m ({m}) must not exceed k ({k})"
            )));
        }
        if !(0.0..=1.0).contains(&max_ambiguous) {
            return Err(PyseqError::InvalidParameter(format!(
                "max_ambiguous ({max_ambiguous}) must lie in [0, 1]"
            )));
        }
        Ok(Self { k, m, max_ambiguous })
    }
}

/// The lexicographically smallest length-`m` substring across both `fwd` and
/// `rev` (`rev` being `fwd`'s reverse complement). Equivalent to scanning the
/// canonical k-mer and its reverse complement jointly, per the recommended
/// inner loop: the minimum over `fwd`'s substrings and over
/// `reverse_complement(fwd)`'s substrings equals the strand-canonical
/// minimum, without recomputing a whole-sequence reverse complement.
fn canonical_minimizer(fwd: &str, rev: &str, m: usize) -> String {
    let mut best: Option<&str> = None;
    for window in [fwd, rev] {
        for i in 0..=(window.len() - m) {
            let candidate = &window[i..i + m];
            if best.map_or(true, |b| candidate < b) {
                best = Some(candidate);
            }
        }
    }
    best.expect("k >= m guarantees at least one window").to_string()
}

/// Extracts the multiset (minimizer -> window count) of canonical minimizers
/// of `seq` under `params`. Windows where either strand exceeds
/// `max_ambiguous` are skipped entirely. Returns an empty multiset when
/// `seq` is shorter than `k`.
pub fn extract_minimizers(seq: &str, params: &KmerParams) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    let len = seq.len();
    if len < params.k {
        return counts;
    }

    for i in 0..=(len - params.k) {
        let fwd = &seq[i..i + params.k];
        if ambiguity_fraction(fwd) > params.max_ambiguous {
            continue;
        }
        let rev = reverse_complement(fwd);
        if ambiguity_fraction(&rev) > params.max_ambiguous {
            continue;
        }

        let minimizer = canonical_minimizer(fwd, &rev, params.m);
        *counts.entry(minimizer).or_insert(0) += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(k: usize, m: usize, max_ambiguous: f64) -> KmerParams {
        KmerParams::new(k, m, max_ambiguous).unwrap()
    }

    #[test]
    fn rejects_m_greater_than_k() {
        assert!(KmerParams::new(10, 20, 0.2).is_err());
    }

    #[test]
    fn rejects_out_of_range_max_ambiguous() {
        assert!(KmerParams::new(10, 5, 1.5).is_err());
        assert!(KmerParams::new(10, 5, -0.1).is_err());
    }

    #[test]
    fn short_sequence_yields_empty_multiset() {
        let p = params(31, 19, 0.2);
        assert!(extract_minimizers("ACGT", &p).is_empty());
    }

    #[test]
    fn fully_ambiguous_window_is_filtered() {
        let p = params(5, 3, 0.2);
        let seq = "N".repeat(31);
        assert!(extract_minimizers(&seq, &p).is_empty());
    }

    #[test]
    fn extraction_is_strand_invariant() {
        let p = params(15, 7, 0.2);
        let seq = "ACGTACGTTTGACCAGGTTACAGGTCAACGGT";
        let rc = reverse_complement(seq);

        let fwd_counts = extract_minimizers(seq, &p);
        let rev_counts = extract_minimizers(&rc, &p);
        assert_eq!(fwd_counts, rev_counts);
    }

    #[test]
    fn single_window_produces_one_minimizer() {
        let p = params(8, 4, 0.5);
        let seq = "ACGTACGT";
        let counts = extract_minimizers(seq, &p);
        assert_eq!(counts.values().sum::<u64>(), 1);
    }
}
