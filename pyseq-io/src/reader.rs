use crate::error::{PyseqError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

pub const BUFSIZE: usize = 1024 * 1024;

/// Opens `path`, auto-detecting gzip compression by the `1F 8B` magic bytes
/// in the first two bytes of the file, and transparently decompressing.
pub fn open_maybe_gzipped<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let mut file = open_file(path)?;
    if is_gzipped(&mut file).map_err(|e| PyseqError::io(path, e))? {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn is_gzipped(file: &mut File) -> std::io::Result<bool> {
    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => {
            file.rewind()?;
            Ok(magic == [0x1F, 0x8B])
        }
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            file.rewind()?;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

pub fn open_file<P: AsRef<Path>>(path: P) -> Result<File> {
    File::open(&path).map_err(|e| PyseqError::io(path.as_ref(), e))
}

/// Strips trailing `\n`/`\r` from a buffer read with `read_until`.
pub fn trim_end(buffer: &mut Vec<u8>) {
    while let Some(&b'\n' | &b'\r') = buffer.last() {
        buffer.pop();
    }
}
