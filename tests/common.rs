#![allow(dead_code)]

use avro_ocf::util::{decode_long, encode_long};
use avro_ocf::{OcfResult, Reader, RecordCodec, Schema, Writer};
use std::str::FromStr;

/// A row of the `{"type":"record","name":"R","fields":[{"name":"x","type":"long"}]}`
/// schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub x: i64,
}

/// Record codec for [`Row`]: one zigzag varint per record, the same bytes an
/// avro record codec produces for a single-long-field record.
pub struct RowCodec;

impl RecordCodec for RowCodec {
    type Record = Row;

    fn encode_record(&self, record: &Row, buf: &mut Vec<u8>) -> OcfResult<()> {
        encode_long(record.x, buf)?;
        Ok(())
    }

    fn decode_record(&self, buf: &[u8]) -> OcfResult<(Row, usize)> {
        let (x, consumed) = decode_long(buf)?;
        Ok((Row { x }, consumed))
    }
}

/// An entry of a two-field record schema: a long id and a utf-8 string.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: i64,
    pub text: String,
}

/// Record codec for [`Entry`]: varint id, then a varint-length-prefixed
/// string.
pub struct EntryCodec;

impl RecordCodec for EntryCodec {
    type Record = Entry;

    fn encode_record(&self, record: &Entry, buf: &mut Vec<u8>) -> OcfResult<()> {
        encode_long(record.id, buf)?;
        encode_long(record.text.len() as i64, buf)?;
        buf.extend_from_slice(record.text.as_bytes());
        Ok(())
    }

    fn decode_record(&self, buf: &[u8]) -> OcfResult<(Entry, usize)> {
        let (id, id_width) = decode_long(buf)?;
        let (text_len, len_width) = decode_long(&buf[id_width..])?;
        let start = id_width + len_width;
        let end = start + text_len as usize;
        let text = String::from_utf8(buf[start..end].to_vec())
            .expect("test entries always hold utf-8");
        Ok((Entry { id, text }, end))
    }
}

pub struct MockSchema;

impl MockSchema {
    pub fn prim(self, ty: &str) -> Schema {
        let schema_str = format!("{{\"type\": \"{}\"}}", ty);
        Schema::from_str(&schema_str).unwrap()
    }

    pub fn row(self) -> Schema {
        Schema::from_str(r#"{"type":"record","name":"R","fields":[{"name":"x","type":"long"}]}"#)
            .unwrap()
    }

    pub fn entry(self) -> Schema {
        Schema::from_str(
            r#"
        {
            "type": "record",
            "name": "Entry",
            "fields" : [
              {"name": "id", "type": "long"},
              {"name": "text", "type": "string"}
            ]
        }
        "#,
        )
        .unwrap()
    }
}

/// Writes `records` through a fresh writer and returns the whole container
/// file: header bytes followed by every block chunk in order.
pub fn entry_datafile(schema: &Schema, codec: &str, records: Vec<Entry>) -> Vec<u8> {
    let mut writer = Writer::with_codec(schema, EntryCodec, codec).unwrap();
    let mut file = writer.header().unwrap();
    for chunk in writer.write_blocks(records) {
        file.extend_from_slice(&chunk.unwrap());
    }
    file
}

pub fn entry_reader(buffer: &[u8]) -> Reader<'_, EntryCodec> {
    Reader::with_record_codec(buffer, EntryCodec).unwrap()
}
