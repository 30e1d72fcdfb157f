use crate::error::{PyseqError, Result};
use crate::reader::{open_maybe_gzipped, trim_end, BUFSIZE};
use crate::seq::SeqRecord;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Reads 4-line FASTQ records (`@name`, sequence, `+comment`, quality).
/// Records whose quality length differs from their sequence length are
/// invalid and are dropped; `invalid_records` tracks how many were skipped.
pub struct FastqReader<R: Read> {
    reader: BufReader<R>,
    header: Vec<u8>,
    seq: Vec<u8>,
    plus: Vec<u8>,
    quals: Vec<u8>,
    pub invalid_records: usize,
}

impl<R: Read> FastqReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::with_capacity(BUFSIZE, inner),
            header: Vec::new(),
            seq: Vec::new(),
            plus: Vec::new(),
            quals: Vec::new(),
            invalid_records: 0,
        }
    }

    fn fmt_err(e: std::io::Error) -> PyseqError {
        PyseqError::Format(format!("reading FASTQ record: {e}"))
    }

    /// Reads one raw 4-line block. `Ok(None)` means clean EOF between records.
    fn read_block(&mut self) -> Result<Option<()>> {
        self.header.clear();
        if self
            .reader
            .read_until(b'\n', &mut self.header)
            .map_err(Self::fmt_err)?
            == 0
        {
            return Ok(None);
        }

        self.seq.clear();
        if self
            .reader
            .read_until(b'\n', &mut self.seq)
            .map_err(Self::fmt_err)?
            == 0
        {
            return Err(PyseqError::Format(
                "truncated FASTQ record: missing sequence line".into(),
            ));
        }
        trim_end(&mut self.seq);

        self.plus.clear();
        if self
            .reader
            .read_until(b'\n', &mut self.plus)
            .map_err(Self::fmt_err)?
            == 0
        {
            return Err(PyseqError::Format(
                "truncated FASTQ record: missing '+' line".into(),
            ));
        }

        self.quals.clear();
        if self
            .reader
            .read_until(b'\n', &mut self.quals)
            .map_err(Self::fmt_err)?
            == 0
        {
            return Err(PyseqError::Format(
                "truncated FASTQ record: missing quality line".into(),
            ));
        }
        trim_end(&mut self.quals);

        Ok(Some(()))
    }

    /// Returns the next valid record, silently skipping (and counting) any
    /// record whose quality length does not match its sequence length.
    pub fn read_record(&mut self) -> Result<Option<SeqRecord>> {
        loop {
            if self.read_block()?.is_none() {
                return Ok(None);
            }

            let name = header_name(&self.header);
            let comment = comment_text(&self.plus);
            match SeqRecord::with_quality(name, &self.seq, &self.quals, comment) {
                Some(record) => return Ok(Some(record)),
                None => {
                    self.invalid_records += 1;
                    log::warn!(
                        "dropping FASTQ record with mismatched quality length: {}",
                        header_name(&self.header)
                    );
                }
            }
        }
    }
}

impl FastqReader<Box<dyn Read + Send>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(open_maybe_gzipped(path)?))
    }
}

fn header_name(header: &[u8]) -> String {
    let header = header.strip_prefix(b"@").unwrap_or(header);
    std::str::from_utf8(header)
        .unwrap_or_default()
        .trim_end()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn comment_text(plus: &[u8]) -> Option<String> {
    let mut plus = plus.to_vec();
    trim_end(&mut plus);
    let plus = plus.strip_prefix(b"+").unwrap_or(&plus);
    if plus.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(plus).into_owned())
    }
}

/// Reads every valid record in `path`, in file order.
pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<SeqRecord>> {
    let mut reader = FastqReader::from_path(path)?;
    let mut records = Vec::new();
    while let Some(record) = reader.read_record()? {
        records.push(record);
    }
    Ok(records)
}
