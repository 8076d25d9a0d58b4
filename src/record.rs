//! The record codec seam between the container framing and schema-driven
//! record encoding.

use crate::error::OcfResult;

/// A schema-bound codec that turns one logical record into bytes and back.
///
/// The container layer never looks inside record bytes: it concatenates
/// encoded records into blocks on write and hands slices of the decompressed
/// block payload back on read. An implementation is expected to be bound to
/// one compiled schema for its whole lifetime; binding a codec to a
/// [`Writer`](crate::Writer) or [`Reader`](crate::Reader) is what the
/// container format calls attaching a schema.
///
/// Integer prefixes inside record encodings should use the same ZigZag
/// varint convention as the container framing; see
/// [`util::encode_long`](crate::util::encode_long) and
/// [`util::decode_long`](crate::util::decode_long).
pub trait RecordCodec {
    /// The logical record type this codec encodes and decodes.
    type Record;

    /// Encodes one record, appending its bytes to `buf`.
    fn encode_record(&self, record: &Self::Record, buf: &mut Vec<u8>) -> OcfResult<()>;

    /// Decodes one record from the head of `buf`, returning the record and
    /// the number of bytes consumed.
    fn decode_record(&self, buf: &[u8]) -> OcfResult<(Self::Record, usize)>;
}
