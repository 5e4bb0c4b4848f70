//! # mtu-dict
//!
//! Extraction and lookup engine for the dictionary files of a 1990s 16-bit
//! Turkish dictionary application (MTU.TRK, MTU.TUR and siblings), making
//! the data usable on modern platforms without emulation.
//!
//! The pipeline: raw file bytes -> bounds-checked cursor -> schema-driven
//! format decoder -> legacy text codec (CP 857 / indexed alphabet, suffix
//! decompression) -> immutable [`DictionaryIndex`] serving exact, prefix
//! and fuzzy queries. [`extract`] runs the whole pipeline; [`export`] /
//! [`load`] round-trip the result through a portable versioned artifact so
//! the legacy binary is parsed only once.
//!
//! Indices are immutable after build and freely shared across threads;
//! independent dictionary kinds extract in parallel with no coordination.

pub mod mtu;

// Re-export the main types for convenience
pub use mtu::{
    error::{MtuError, Result},
    extract::{export, export_file, extract, extract_file, load, load_file},
    index::{DictionaryIndex, Entry, EntryId},
    schema::{DictionaryKind, FormatSchema},
    suggest::{suggest, suggest_default, Suggestion},
};
