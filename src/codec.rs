use crate::config::CRC_CHECKSUM_LEN;
use crate::error::{OcfErr, OcfResult};
use crate::util::{encode_long, encode_raw_bytes};

use std::io::Write;

// Given a slice of bytes, generates a CRC-32 (of the uncompressed payload) for it
fn get_crc_uncompressed(pre_comp_buf: &[u8]) -> OcfResult<Vec<u8>> {
    use byteorder::{BigEndian, WriteBytesExt};
    use crc::crc32;

    let crc_checksum = crc32::checksum_ieee(pre_comp_buf);
    let mut checksum_bytes = Vec::with_capacity(CRC_CHECKSUM_LEN);
    checksum_bytes
        .write_u32::<BigEndian>(crc_checksum)
        .map_err(|_| OcfErr::CRCGenFailed)?;
    Ok(checksum_bytes)
}

// Given an uncompressed slice of bytes, returns a compressed vector of bytes using the snappy codec
fn compress_snappy(uncompressed_buffer: &[u8]) -> OcfResult<Vec<u8>> {
    let mut encoder = snap::Encoder::new();
    encoder
        .compress_vec(uncompressed_buffer)
        .map_err(|e| OcfErr::EncodeFailed(e.into()))
}

// Emits a raw deflate body: no zlib header bytes, no trailing adler checksum
fn compress_deflate(uncompressed_buffer: &[u8]) -> OcfResult<Vec<u8>> {
    use flate2::{write::DeflateEncoder, Compression};

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(uncompressed_buffer)
        .map_err(OcfErr::EncodeFailed)?;
    encoder.finish().map_err(OcfErr::EncodeFailed)
}

fn decompress_deflate(compressed_buffer: &[u8], uncompressed: &mut Vec<u8>) -> OcfResult<()> {
    use flate2::bufread::DeflateDecoder;
    use std::io::Read;

    let mut decoder = DeflateDecoder::new(compressed_buffer);
    uncompressed.clear();
    decoder
        .read_to_end(uncompressed)
        .map_err(OcfErr::DecodeFailed)?;
    Ok(())
}

fn decompress_snappy(compressed_buffer: &[u8], uncompressed: &mut Vec<u8>) -> OcfResult<()> {
    use byteorder::ByteOrder;

    if compressed_buffer.len() < CRC_CHECKSUM_LEN {
        return Err(OcfErr::DecodeFailed(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "snappy block payload shorter than its checksum",
        )));
    }

    let data_minus_cksum = &compressed_buffer[..compressed_buffer.len() - CRC_CHECKSUM_LEN];
    let decompressed_size =
        snap::decompress_len(data_minus_cksum).map_err(|e| OcfErr::DecodeFailed(e.into()))?;
    uncompressed.clear();
    uncompressed.resize(decompressed_size, 0);
    snap::Decoder::new()
        .decompress(data_minus_cksum, &mut uncompressed[..])
        .map_err(|e| OcfErr::DecodeFailed(e.into()))?;

    let expected = byteorder::BigEndian::read_u32(
        &compressed_buffer[compressed_buffer.len() - CRC_CHECKSUM_LEN..],
    );
    let found = crc::crc32::checksum_ieee(uncompressed);
    if expected != found {
        return Err(OcfErr::CRCMismatch { found, expected });
    }
    Ok(())
}

/// Defines codecs one can use when writing block payloads.
/// The codec in use is recorded in the header under the `avro.codec` key so
/// readers can recover it without prior knowledge.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Codec {
    /// The Null codec. When no codec is specified at the time of Writer creation, null is the default.
    Null,
    /// The Deflate codec. <br>Uses <https://docs.rs/flate2> as the underlying implementation.
    Deflate,
    /// The Snappy codec, with a trailing CRC-32 of the uncompressed payload.
    /// <br>Uses <https://docs.rs/snap> as the underlying implementation.
    Snappy,
}

impl AsRef<str> for Codec {
    fn as_ref(&self) -> &str {
        match self {
            Codec::Null => "null",
            Codec::Deflate => "deflate",
            Codec::Snappy => "snappy",
        }
    }
}

impl Codec {
    /// Frames one block payload into `out_stream`: a varint byte length
    /// followed by the (possibly compressed) payload. For snappy the CRC of
    /// the uncompressed payload follows the compressed bytes and is counted
    /// in the byte length.
    pub(crate) fn encode<W: Write>(&self, block_stream: &[u8], out_stream: &mut W) -> OcfResult<()> {
        match self {
            Codec::Null => {
                encode_long(block_stream.len() as i64, out_stream)?;
                encode_raw_bytes(block_stream, out_stream)?;
            }
            Codec::Snappy => {
                let checksum_bytes = get_crc_uncompressed(block_stream)?;
                let compressed_data = compress_snappy(block_stream)?;
                encode_long(
                    compressed_data.len() as i64 + CRC_CHECKSUM_LEN as i64,
                    out_stream,
                )?;
                encode_raw_bytes(&compressed_data, out_stream)?;
                encode_raw_bytes(&checksum_bytes, out_stream)?;
            }
            Codec::Deflate => {
                let compressed_data = compress_deflate(block_stream)?;
                encode_long(compressed_data.len() as i64, out_stream)?;
                encode_raw_bytes(&compressed_data, out_stream)?;
            }
        }
        Ok(())
    }

    /// Decompresses one block payload into `uncompressed`, verifying the
    /// snappy checksum when applicable.
    pub(crate) fn decode(&self, compressed: &[u8], uncompressed: &mut Vec<u8>) -> OcfResult<()> {
        match self {
            Codec::Null => {
                uncompressed.clear();
                uncompressed.extend_from_slice(compressed);
                Ok(())
            }
            Codec::Snappy => decompress_snappy(compressed, uncompressed),
            Codec::Deflate => decompress_deflate(compressed, uncompressed),
        }
    }
}

impl std::convert::TryFrom<&str> for Codec {
    type Error = OcfErr;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "null" => Ok(Codec::Null),
            "snappy" => Ok(Codec::Snappy),
            "deflate" => Ok(Codec::Deflate),
            o => Err(OcfErr::UnsupportedCodec(o.to_string())),
        }
    }
}
