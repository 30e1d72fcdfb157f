use crate::error::{PyseqError, Result};
use crate::reader::{open_maybe_gzipped, BUFSIZE};
use crate::seq::SeqRecord;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Reads FASTA records: a `>` header line starts a record, and every
/// subsequent non-`>` line is concatenated into its sequence until the next
/// `>` or EOF.
pub struct FastaReader<R: Read> {
    reader: BufReader<R>,
    header: Vec<u8>,
    seq: Vec<u8>,
}

impl<R: Read> FastaReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::with_capacity(BUFSIZE, inner),
            header: Vec::new(),
            seq: Vec::new(),
        }
    }

    pub fn read_record(&mut self) -> Result<Option<SeqRecord>> {
        // The header for the *next* record is carried over from the previous
        // call's read_until(b'>'), except on the very first call.
        if self.header.is_empty() {
            let n = self
                .reader
                .read_until(b'\n', &mut self.header)
                .map_err(|e| PyseqError::Format(format!("reading FASTA header: {e}")))?;
            if n == 0 {
                return Ok(None);
            }
        }

        self.seq.clear();
        self.reader
            .read_until(b'>', &mut self.seq)
            .map_err(|e| PyseqError::Format(format!("reading FASTA body: {e}")))?;
        if self.seq.last() == Some(&b'>') {
            self.seq.pop();
        }
        // The body spans every non-header line up to the next record, so
        // line-wrap terminators land in the *middle* of the buffer, not just
        // at its end: strip every `\n`/`\r`, not only the trailing ones.
        self.seq.retain(|&b| b != b'\n' && b != b'\r');

        let name = header_name(&self.header);
        let record = SeqRecord::new(name, &self.seq);

        // Prime header for the next call: everything up to end-of-line after
        // the '>' we just consumed belongs to the next record's header.
        self.header.clear();
        self.header.push(b'>');
        self.reader
            .read_until(b'\n', &mut self.header)
            .map_err(|e| PyseqError::Format(format!("reading FASTA header: {e}")))?;
        if self.header.len() <= 1 {
            self.header.clear();
        }

        Ok(Some(record))
    }
}

impl FastaReader<Box<dyn Read + Send>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(open_maybe_gzipped(path)?))
    }
}

fn header_name(header: &[u8]) -> String {
    let header = header.strip_prefix(b">").unwrap_or(header);
    let header = std::str::from_utf8(header).unwrap_or_default().trim_end();
    header
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Reads every record in `path` into memory, in file order.
pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<SeqRecord>> {
    let mut reader = FastaReader::from_path(path)?;
    let mut records = Vec::new();
    while let Some(record) = reader.read_record()? {
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_multi_line_records() {
        let data = b">r1 description\nACGT\nACGT\n>r2\nTTTT\n".to_vec();
        let mut reader = FastaReader::new(Cursor::new(data));
        let r1 = reader.read_record().unwrap().unwrap();
        assert_eq!(r1.name, "r1");
        assert_eq!(r1.sequence, "ACGTACGT");
        let r2 = reader.read_record().unwrap().unwrap();
        assert_eq!(r2.name, "r2");
        assert_eq!(r2.sequence, "TTTT");
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn normalizes_ambiguous_bases() {
        let data = b">r1\nACGTXYZ\n".to_vec();
        let mut reader = FastaReader::new(Cursor::new(data));
        let r1 = reader.read_record().unwrap().unwrap();
        assert_eq!(r1.sequence, "ACGTNNN");
    }

    #[test]
    fn wrapped_lines_join_without_embedded_n_bases() {
        // Line-wrap terminators must not survive into the sequence (they'd
        // otherwise normalize to spurious `N` bases in the middle of it).
        let data = b">r1\nACGT\nACGT\nACGT\n".to_vec();
        let mut reader = FastaReader::new(Cursor::new(data));
        let r1 = reader.read_record().unwrap().unwrap();
        assert_eq!(r1.sequence, "ACGTACGTACGT");
        assert!(!r1.sequence.contains('N'));
    }

    #[test]
    fn wrapped_lines_with_crlf_join_cleanly() {
        let data = b">r1\r\nACGT\r\nACGT\r\n".to_vec();
        let mut reader = FastaReader::new(Cursor::new(data));
        let r1 = reader.read_record().unwrap().unwrap();
        assert_eq!(r1.sequence, "ACGTACGT");
    }
}
