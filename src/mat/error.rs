use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File too short for a MAT-file header ({0} bytes)")]
    TruncatedHeader(usize),

    #[error("Unknown endian indicator {0:?}")]
    InvalidEndianIndicator([u8; 2]),

    // 0x0200 is the HDF5 based v7.3 format
    #[error("Unsupported MAT-file version 0x{0:04x}")]
    UnsupportedVersion(u16),

    #[error("Unexpected end of data: needed {needed} bytes at offset {offset}, {available} available")]
    UnexpectedEof {
        needed: usize,
        offset: usize,
        available: usize,
    },

    #[error("Unknown data element type {0}")]
    UnknownDataType(u32),

    #[error("Unexpected data element type {found}, expected {expected}")]
    UnexpectedDataType { expected: &'static str, found: u32 },

    #[error("Unsupported array class {0}")]
    UnsupportedClass(u8),

    #[error("Failed to decompress element: {0}")]
    Decompress(std::io::Error),

    #[error("Malformed MAT-file: {0}")]
    Malformed(String),
}
