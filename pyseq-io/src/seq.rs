/// Maps any byte outside the nucleotide alphabet to `N`, uppercasing valid bases.
///
#[inline]
pub fn normalize_base(b: u8) -> u8 {
    match b {
        b'A' | b'a' => b'A',
        b'C' | b'c' => b'C',
        b'G' | b'g' => b'G',
        b'T' | b't' => b'T',
        b'N' | b'n' => b'N',
        _ => b'N',
    }
}

pub fn normalize_sequence(raw: &[u8]) -> String {
    let normalized: Vec<u8> = raw.iter().map(|&b| normalize_base(b)).collect();
    // Safe: normalize_base only ever produces ASCII bytes.
    unsafe { String::from_utf8_unchecked(normalized) }
}

/// Default quality character used when a FASTA record (or any record lacking
/// real quality scores) needs one synthesized.
pub const DEFAULT_QUALITY_CHAR: u8 = b'I';

/// A single sequencing read or reference sequence, already normalized to the
/// `{A, C, G, T, N}` alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub name: String,
    pub sequence: String,
    pub quality: String,
    pub comment: Option<String>,
}

impl SeqRecord {
    pub fn new(name: impl Into<String>, sequence: &[u8]) -> Self {
        let sequence = normalize_sequence(sequence);
        let quality = default_quality(sequence.len());
        Self {
            name: name.into(),
            sequence,
            quality,
            comment: None,
        }
    }

    /// Builds a record from raw FASTQ fields. Returns `None` when the quality
    /// string's length does not match the sequence's — such a record is
    /// invalid and must be dropped by the caller, per the FASTQ format rule.
    pub fn with_quality(
        name: impl Into<String>,
        sequence: &[u8],
        quality: &[u8],
        comment: Option<String>,
    ) -> Option<Self> {
        if quality.len() != sequence.len() {
            return None;
        }
        let sequence = normalize_sequence(sequence);
        let quality = String::from_utf8_lossy(quality).into_owned();
        Some(Self {
            name: name.into(),
            sequence,
            quality,
            comment,
        })
    }
}

fn default_quality(len: usize) -> String {
    std::iter::repeat(DEFAULT_QUALITY_CHAR as char)
        .take(len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_ambiguous_bases_to_n() {
        assert_eq!(normalize_sequence(b"acgtRYKM"), "ACGTNNNN");
    }

    #[test]
    fn synthesizes_quality_when_absent() {
        let rec = SeqRecord::new("r1", b"ACGT");
        assert_eq!(rec.quality, "IIII");
    }

    #[test]
    fn rejects_mismatched_quality_length() {
        assert!(SeqRecord::with_quality("r1", b"ACGT", b"II", None).is_none());
    }
}
