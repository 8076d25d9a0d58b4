//! Varint and raw byte primitives shared by the container framing and by
//! [`RecordCodec`](crate::RecordCodec) implementations.
//!
//! All integers on the wire are ZigZag-encoded signed varints, the same
//! convention record codecs use for avro `long` values.

use crate::error::{OcfErr, OcfResult};
use integer_encoding::VarIntReader;
use integer_encoding::VarIntWriter;
use std::io::{Error, ErrorKind, Read, Write};
use std::str;

/// Encodes `value` as a ZigZag varint into `writer`, returning the number of
/// bytes written.
pub fn encode_long<W: Write>(value: i64, writer: &mut W) -> OcfResult<usize> {
    writer.write_varint(value).map_err(OcfErr::EncodeFailed)
}

/// Decodes one ZigZag varint from the head of `buf`, returning the value and
/// the number of bytes consumed.
pub fn decode_long(buf: &[u8]) -> OcfResult<(i64, usize)> {
    let mut reader = buf;
    let value: i64 = reader.read_varint().map_err(OcfErr::DecodeFailed)?;
    Ok((value, buf.len() - reader.len()))
}

/// Writes `value` to `writer` as-is, with no length prefix.
pub fn encode_raw_bytes<W: Write>(value: &[u8], writer: &mut W) -> OcfResult<()> {
    writer
        .write_all(value)
        .map_err(OcfErr::EncodeFailed)
        .map(|_| ())
}

/// Reads a varint-length-prefixed byte string from `reader`.
pub fn decode_bytes<R: Read>(reader: &mut R) -> OcfResult<Vec<u8>> {
    let len: i64 = reader.read_varint().map_err(OcfErr::DecodeFailed)?;
    if len < 0 {
        let err = Error::new(ErrorKind::InvalidData, "negative byte string length");
        return Err(OcfErr::DecodeFailed(err));
    }
    let mut byte_buf = vec![0u8; len as usize];
    reader
        .read_exact(&mut byte_buf)
        .map_err(OcfErr::DecodeFailed)?;
    Ok(byte_buf)
}

/// Reads a varint-length-prefixed utf-8 string from `reader`.
pub fn decode_string<R: Read>(reader: &mut R) -> OcfResult<String> {
    let buf = decode_bytes(reader)?;
    let s = str::from_utf8(&buf).map_err(|_e| {
        let err = Error::new(ErrorKind::InvalidData, "Failed decoding string from bytes");
        OcfErr::DecodeFailed(err)
    })?;
    Ok(s.to_string())
}
