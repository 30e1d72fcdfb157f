mod bins;
mod error;
mod fasta;
mod fastq;
mod reader;
mod result_io;
mod seq;

pub use bins::load_bin_map;
pub use error::{PyseqError, Result};
pub use fasta::{read_all as read_all_fasta, FastaReader};
pub use fastq::{read_all as read_all_fastq, FastqReader};
pub use reader::open_maybe_gzipped;
pub use result_io::write_binned_reads;
pub use seq::{normalize_base, normalize_sequence, SeqRecord};

use std::path::Path;

/// Reads every record of a FASTA or FASTQ file (gzip-transparent), dispatched
/// on the first byte of the (decompressed) file content.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<SeqRecord>> {
    let path = path.as_ref();
    let mut reader = open_maybe_gzipped(path)?;
    let mut first_byte = [0u8; 1];
    use std::io::Read;
    let n = reader
        .read(&mut first_byte)
        .map_err(|e| PyseqError::io(path, e))?;
    if n == 0 {
        return Ok(Vec::new());
    }

    // Re-open rather than thread the already-consumed byte back through a
    // second reader type: both formats are re-parsed from the start.
    match first_byte[0] {
        b'>' => read_all_fasta(path),
        b'@' => read_all_fastq(path),
        other => Err(PyseqError::Format(format!(
            "{}: unrecognized sequence format (starts with {:?}, expected '>' or '@')",
            path.display(),
            other as char
        ))),
    }
}
