//! Container file header encoding and decoding.
//!
//! The header is the first record of a container file: the 4 magic bytes, a
//! string-to-bytes metadata map carrying at least `avro.codec` and
//! `avro.schema`, and the 16 byte sync marker repeated after every block.

use crate::codec::Codec;
use crate::config::{MAGIC_BYTES, SYNC_MARKER_SIZE};
use crate::error::{OcfErr, OcfResult};
use crate::schema::{schema_from_header_bytes, Schema};
use crate::util::{decode_bytes, decode_string, encode_long, encode_raw_bytes};
use indexmap::IndexMap;
use integer_encoding::VarIntReader;
use std::convert::TryFrom;
use std::io::{Cursor, Read, Write};

/// Metadata key holding the codec name.
pub(crate) const META_CODEC: &str = "avro.codec";
/// Metadata key holding the writer's schema as JSON text.
pub(crate) const META_SCHEMA: &str = "avro.schema";

/// A parsed container file header.
#[derive(Debug)]
pub struct Header {
    /// Writer's schema as recorded under `avro.schema`.
    pub(crate) schema: Schema,
    /// The metadata map. Keys keep the order they were parsed (or inserted)
    /// in, so re-encoding a parsed header reproduces its bytes exactly.
    pub(crate) metadata: IndexMap<String, Vec<u8>>,
    /// The sync marker repeated after every block of this file.
    pub(crate) sync_marker: [u8; SYNC_MARKER_SIZE],
    /// Codec parsed from the `avro.codec` metadata entry.
    pub(crate) codec: Codec,
}

// The header layout is fixed, so the map is encoded as a single map block
// terminated by a zero count.
pub(crate) fn encode_header<W: Write>(
    metadata: &IndexMap<String, Vec<u8>>,
    sync_marker: &[u8; SYNC_MARKER_SIZE],
    out: &mut W,
) -> OcfResult<()> {
    encode_raw_bytes(MAGIC_BYTES, out)?;
    encode_long(metadata.len() as i64, out)?;
    for (key, value) in metadata {
        encode_long(key.len() as i64, out)?;
        encode_raw_bytes(key.as_bytes(), out)?;
        encode_long(value.len() as i64, out)?;
        encode_raw_bytes(value, out)?;
    }
    encode_long(0, out)?;
    encode_raw_bytes(sync_marker, out)?;
    Ok(())
}

fn decode_header_map<R>(reader: &mut R) -> OcfResult<IndexMap<String, Vec<u8>>>
where
    R: Read,
{
    let mut map = IndexMap::new();

    // the map may span several count-prefixed blocks, terminated by a zero
    loop {
        let count: i64 = reader.read_varint().map_err(OcfErr::DecodeFailed)?;
        if count == 0 {
            break;
        }
        if count < 0 {
            return Err(OcfErr::HeaderDecodeFailed);
        }

        for _ in 0..count {
            let key = decode_string(reader)?;
            let val = decode_bytes(reader)?;
            map.insert(key, val);
        }
    }

    Ok(map)
}

impl Header {
    /// Decodes a header from the start of `data`, returning the header and
    /// the number of bytes consumed so the caller can slice the remainder as
    /// block data.
    pub fn from_slice(data: &[u8]) -> OcfResult<(Self, usize)> {
        let mut reader = Cursor::new(data);

        let mut magic_buf = [0u8; 4];
        reader
            .read_exact(&mut magic_buf[..])
            .map_err(|_| OcfErr::HeaderDecodeFailed)?;

        if &magic_buf[..] != MAGIC_BYTES {
            return Err(OcfErr::InvalidDataFile);
        }

        let metadata = decode_header_map(&mut reader)?;

        let mut sync_marker = [0u8; SYNC_MARKER_SIZE];
        reader
            .read_exact(&mut sync_marker)
            .map_err(|_| OcfErr::HeaderDecodeFailed)?;

        let schema_bytes = metadata.get(META_SCHEMA).ok_or(OcfErr::HeaderDecodeFailed)?;
        let schema = schema_from_header_bytes(schema_bytes)?;

        let codec = if let Some(c) = metadata.get(META_CODEC) {
            match std::str::from_utf8(c) {
                Ok(s) => Codec::try_from(s)?,
                Err(_) => return Err(OcfErr::HeaderDecodeFailed),
            }
        } else {
            Codec::Null
        };

        let consumed = reader.position() as usize;
        let header = Header {
            schema,
            metadata,
            sync_marker,
            codec,
        };

        Ok((header, consumed))
    }

    /// Re-encodes this header. A parsed header re-encodes byte-for-byte.
    pub fn to_bytes(&self) -> OcfResult<Vec<u8>> {
        let mut out = Vec::new();
        encode_header(&self.metadata, &self.sync_marker, &mut out)?;
        Ok(out)
    }

    /// Returns a reference to the metadata map.
    pub fn metadata(&self) -> &IndexMap<String, Vec<u8>> {
        &self.metadata
    }

    /// Returns a reference to the writer's schema in this header.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the sync marker recorded in this header.
    pub fn sync_marker(&self) -> &[u8; SYNC_MARKER_SIZE] {
        &self.sync_marker
    }

    /// Returns the codec recorded in this header.
    pub fn codec(&self) -> Codec {
        self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::Header;
    use crate::codec::Codec;
    use crate::error::OcfErr;

    // A deflate-coded datafile with a `"bytes"` schema: header followed by
    // one block.
    fn deflate_datafile() -> Vec<u8> {
        vec![
            79, 98, 106, 1, 4, 22, 97, 118, 114, 111, 46, 115, 99, 104, 101, 109, 97, 32, 123, 34,
            116, 121, 112, 101, 34, 58, 34, 98, 121, 116, 101, 115, 34, 125, 20, 97, 118, 114, 111,
            46, 99, 111, 100, 101, 99, 14, 100, 101, 102, 108, 97, 116, 101, 0, 145, 85, 112, 15,
            87, 201, 208, 26, 183, 148, 48, 236, 212, 250, 38, 208, 2, 18, 227, 97, 96, 100, 98,
            102, 97, 5, 0, 145, 85, 112, 15, 87, 201, 208, 26, 183, 148, 48, 236, 212, 250, 38,
            208,
        ]
    }

    #[test]
    fn has_required_headers() {
        let data = deflate_datafile();
        let (header, consumed) = Header::from_slice(&data).unwrap();
        assert!(header.metadata().contains_key("avro.codec"));
        assert!(header.metadata().contains_key("avro.schema"));
        assert_eq!(header.codec(), Codec::Deflate);
        assert_eq!(header.schema().canonical_form(), r#"{"type":"bytes"}"#);
        // consumed stops at the end of the header, before the first block
        assert!(consumed < data.len());
        assert_eq!(&data[consumed - 16..consumed], header.sync_marker());
    }

    #[test]
    fn reencode_round_trips() {
        let data = deflate_datafile();
        let (header, consumed) = Header::from_slice(&data).unwrap();
        assert_eq!(header.to_bytes().unwrap(), &data[..consumed]);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut data = deflate_datafile();
        data[0] = b'X';
        assert!(matches!(
            Header::from_slice(&data),
            Err(OcfErr::InvalidDataFile)
        ));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let data = deflate_datafile();
        assert!(Header::from_slice(&data[..10]).is_err());
    }

    #[test]
    fn metadata_map_split_across_blocks_is_parsed_fully() {
        // a legal encoding may split the metadata map into several
        // count-prefixed blocks before the zero terminator
        let mut data = vec![79, 98, 106, 1];
        data.push(2); // first map block: one entry
        data.push(20);
        data.extend_from_slice(b"avro.codec");
        data.push(8);
        data.extend_from_slice(b"null");
        data.push(2); // second map block: one entry
        data.push(22);
        data.extend_from_slice(b"avro.schema");
        data.push(12);
        data.extend_from_slice(b"\"long\"");
        data.push(0);
        data.extend_from_slice(&[7u8; 16]);

        let (header, consumed) = Header::from_slice(&data).unwrap();
        assert_eq!(consumed, data.len());
        assert_eq!(header.metadata().len(), 2);
        assert_eq!(header.codec(), Codec::Null);
        assert_eq!(header.schema().canonical_form(), r#""long""#);
        assert_eq!(header.sync_marker(), &[7u8; 16]);
    }

    #[test]
    fn missing_schema_entry_is_rejected() {
        // magic + a map with only avro.codec + end marker + sync
        let mut data = vec![79, 98, 106, 1, 2];
        data.push(20);
        data.extend_from_slice(b"avro.codec");
        data.push(8);
        data.extend_from_slice(b"null");
        data.push(0);
        data.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            Header::from_slice(&data),
            Err(OcfErr::HeaderDecodeFailed)
        ));
    }
}
