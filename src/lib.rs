//! K-mer/minimizer engine and bin-annotated index for read binning: extract
//! canonical minimizers from nucleotide sequences, fold them into a
//! bin-annotated index, collapse ambiguous minimizers at finalize, score
//! query reads, and persist the index in a compact on-disk format.

pub mod codec;
pub mod error;
pub mod index;
pub mod kmer;
pub mod nucleotide;
pub mod orchestrate;
pub mod scorer;

pub use error::{PyseqError, Result};
pub use index::{BinCount, BinId, BinIndex};
pub use kmer::{extract_minimizers, KmerParams};
pub use orchestrate::{bin_reads, build_db, BinReadsConfig, BuildDbConfig, ReferenceSource};
pub use scorer::{score_read, BinScore, ReadResult};
