mod header;
mod parser;

/// LZF decompression for `binary_compressed` payloads.
pub mod lzf;

pub use header::{DataEncoding, FieldKind, PcdField, PcdHeader};
pub use parser::{parse_pcd_bytes, read_pcd};

/// Error types for the PCD module.
#[derive(Debug, thiserror::Error)]
pub enum PcdError {
    /// Failed to read PCD file
    #[error("Failed to read PCD file")]
    Io(#[from] std::io::Error),

    /// Invalid PCD file extension
    #[error("Invalid PCD file extension. Got:{0}")]
    InvalidFileExtension(String),

    /// Malformed PCD header
    #[error("Malformed PCD header: {0}")]
    MalformedHeader(String),

    /// `DATA` names an encoding this reader does not support
    #[error("Unsupported DATA encoding '{0}'")]
    UnsupportedEncoding(String),

    /// The LZF stream of a `binary_compressed` payload is corrupt
    #[error("Corrupt compressed payload")]
    CorruptCompressedPayload(#[from] lzf::LzfError),

    /// The payload holds fewer bytes than the header promises
    #[error("Truncated payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload {
        /// Bytes the header-declared point count requires.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// An ascii payload token failed numeric parsing
    #[error("Malformed numeric value for field '{field}' on line {line}")]
    MalformedAsciiValue {
        /// One-based payload line number.
        line: usize,
        /// Name of the field whose token failed to parse.
        field: String,
    },
}
