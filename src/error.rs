//! The core crate shares a single error type with its I/O layer: there is no
//! value in wrapping `PyseqError` a second time just because the crate
//! boundary changed.

pub use pyseq_io::PyseqError;
pub use pyseq_io::Result;
