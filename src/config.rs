//! Constants and configuration parameters for container file writers and readers.

/// Synchronization marker length in bytes. Written once in the header and
/// repeated after every block.
pub const SYNC_MARKER_SIZE: usize = 16;
/// The magic header for recognizing a file as an avro object container file.
pub const MAGIC_BYTES: &[u8] = b"Obj\x01";
/// Checksum length appended to snappy compressed block payloads.
pub const CRC_CHECKSUM_LEN: usize = 4;
/// Minimum granularity for sizing block buffers.
pub const BLOCK_SIZE: usize = 4096;
/// Default sync interval. Once the pending block buffer reaches this many
/// bytes, the next record write triggers a block flush. Suggested values are
/// between 2K (bytes) and 2M.
pub const DEFAULT_SYNC_INTERVAL: usize = 16 * BLOCK_SIZE;
