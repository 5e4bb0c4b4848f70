//! Core extraction and lookup engine for the MTU dictionary binaries.

pub mod codec;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod extract;
pub mod index;
pub mod normalize;
pub mod schema;
pub mod suggest;
mod trie;

pub use error::{MtuError, Result};
