//! avro-ocf implements the framing layer of the
//! [Avro object container file](https://avro.apache.org/docs/current/spec.html#Object+Container+Files)
//! format: header construction and parsing, sync-marker-delimited block
//! framing, and compression codec dispatch (`null`, `deflate`, `snappy`).
//!
//! Schema-driven record encoding is pluggable: the container never looks
//! inside record bytes, it only concatenates and splits them. Callers supply
//! a [`RecordCodec`] bound to their compiled schema, and the crate handles
//! everything around it. All operations work on in-memory byte buffers; file
//! and network I/O stay with the caller.
//!
//! ## A hello world example of framing and reading back records
//!
//!```rust
//! use avro_ocf::{util, OcfResult, Reader, RecordCodec, Schema, Writer};
//! use std::str::FromStr;
//!
//! // A record codec for a plain `"long"` schema.
//! struct LongCodec;
//!
//! impl RecordCodec for LongCodec {
//!     type Record = i64;
//!
//!     fn encode_record(&self, record: &i64, buf: &mut Vec<u8>) -> OcfResult<()> {
//!         util::encode_long(*record, buf)?;
//!         Ok(())
//!     }
//!
//!     fn decode_record(&self, buf: &[u8]) -> OcfResult<(i64, usize)> {
//!         util::decode_long(buf)
//!     }
//! }
//!
//! fn main() -> OcfResult<()> {
//!     // Writing: header bytes once, then one chunk per block
//!     let schema = Schema::from_str(r##""long""##)?;
//!     let mut writer = Writer::with_codec(&schema, LongCodec, "deflate")?;
//!     let mut file = writer.header()?;
//!     for chunk in writer.write_blocks(vec![1i64, 2, 3]) {
//!         file.extend_from_slice(&chunk?);
//!     }
//!
//!     // Reading: the header tells the reader which codec to use
//!     let mut reader = Reader::with_record_codec(&file, LongCodec)?;
//!     for record in reader.read_blocks()? {
//!         let record = record?;
//!         assert!(record >= 1 && record <= 3);
//!     }
//!
//!     Ok(())
//! }
//!```

#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(rust_2018_idioms)]

mod codec;
pub mod config;
mod error;
mod header;
mod reader;
mod record;
mod schema;
pub mod util;
mod writer;

pub use codec::Codec;
pub use error::OcfErr;
pub use error::OcfResult;
pub use header::Header;
pub use reader::Reader;
pub use reader::Records;
pub use record::RecordCodec;
pub use schema::Schema;
pub use writer::BlockChunks;
pub use writer::Writer;
pub use writer::WriterBuilder;
