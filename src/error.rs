#![allow(missing_docs)]

/// Convenience alias for results produced by this crate.
pub type OcfResult<T> = Result<T, OcfErr>;

/// Errors returned from the container file layer.
#[derive(thiserror::Error, Debug)]
pub enum OcfErr {
    // Encode errors
    #[error("Write failed")]
    EncodeFailed(#[source] std::io::Error),
    #[error("Failed building the Writer")]
    WriterBuildFailed,

    // Decode errors
    #[error("Read failed")]
    DecodeFailed(#[source] std::io::Error),
    #[error("Expected magic header: `Obj\x01`")]
    InvalidDataFile,
    #[error("Failed reading container file header")]
    HeaderDecodeFailed,
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),
    #[error("Schema must be bound before reading or writing records")]
    SchemaNotFound,
    #[error("Expected the avro schema to be one of json string, object or an array")]
    UnknownSchema,

    // Integrity errors
    #[error("Crc generation failed")]
    CRCGenFailed,
    #[error("Snappy Crc mismatch, found: {found}, expected: {expected}")]
    CRCMismatch { found: u32, expected: u32 },
}
