//! Custom error types for the mtu-dict crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Every parsing failure carries the offending byte offset or record index
/// where one exists; extraction never skips a malformed record silently,
/// since decode failures are the main feedback signal for refining the
/// reverse-engineered schemas.
#[derive(Debug, Error)]
pub enum MtuError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A read requested more bytes than remain in the blob.
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A seek target lies beyond the end of the blob.
    #[error("Seek target {offset} out of range (blob length {len})")]
    OutOfRange { offset: usize, len: usize },

    /// The file does not carry the expected magic signature or structure.
    #[error("Unrecognized format: {0}")]
    UnrecognizedFormat(String),

    /// A record's computed span or structure violates the schema.
    #[error("Malformed record at offset {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: String },

    /// A byte with no defined mapping in the text codec.
    #[error("Invalid code unit {byte:#04x} at offset {offset}")]
    InvalidCodeUnit { byte: u8, offset: usize },

    /// A compression token references out-of-range data or would expand
    /// beyond the sane maximum ratio.
    #[error("Corrupt compression: {0}")]
    CorruptCompression(String),

    /// A cross-reference id does not resolve within the same index.
    #[error("Dangling cross-reference to entry id {id}")]
    DanglingCrossReference { id: u32 },

    /// The exported artifact declares a version this loader does not read.
    #[error("Unsupported artifact version {found} (supported: {supported})")]
    UnsupportedArtifactVersion { found: u16, supported: u16 },

    /// A checksum validation failed, indicating data corruption.
    #[error("Checksum mismatch: expected {expected:#x}, got {actual:#x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// A declared count of items does not match the actual number found.
    #[error("Count mismatch for {item_type}: expected {expected}, but found {found}")]
    CountMismatch {
        item_type: &'static str,
        expected: u64,
        found: u64,
    },
}

/// A convenience `Result` type alias using the crate's `MtuError` type.
pub type Result<T> = std::result::Result<T, MtuError>;
