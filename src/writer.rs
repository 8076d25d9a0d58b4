//! The Writer is the primary interface for framing encoded records into
//! container file blocks.

use crate::codec::Codec;
use crate::config::{DEFAULT_SYNC_INTERVAL, SYNC_MARKER_SIZE};
use crate::error::{OcfErr, OcfResult};
use crate::header::{encode_header, META_CODEC, META_SCHEMA};
use crate::record::RecordCodec;
use crate::schema::Schema;
use crate::util::{encode_long, encode_raw_bytes};
use rand::{thread_rng, Rng};
use indexmap::IndexMap;
use std::convert::TryFrom;
use std::default::Default;

fn sync_marker() -> [u8; SYNC_MARKER_SIZE] {
    let mut vec = [0u8; SYNC_MARKER_SIZE];
    thread_rng().fill_bytes(&mut vec[..]);
    vec
}

/// Convenient builder struct for configuring and instantiating a Writer.
pub struct WriterBuilder<'a, C> {
    metadata: IndexMap<String, Vec<u8>>,
    codec: Codec,
    schema: Option<&'a Schema>,
    record_codec: Option<C>,
    sync_interval: usize,
}

impl<'a, C: RecordCodec> WriterBuilder<'a, C> {
    /// Creates a builder instance to construct a Writer.
    pub fn new() -> Self {
        WriterBuilder {
            metadata: Default::default(),
            codec: Codec::Null,
            schema: None,
            record_codec: None,
            sync_interval: DEFAULT_SYNC_INTERVAL,
        }
    }

    /// Set any custom metadata for the datafile. The required `avro.codec`
    /// and `avro.schema` entries are always written and cannot be overridden.
    pub fn set_metadata(mut self, k: &str, v: &str) -> Self {
        self.metadata
            .insert(k.to_string(), v.as_bytes().to_vec());
        self
    }

    /// Set one of the available codecs.
    pub fn set_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Provide the writer with a reference to the schema recorded in the
    /// header.
    pub fn set_schema(mut self, schema: &'a Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Provide the schema-bound record codec used to encode records.
    pub fn set_record_codec(mut self, record_codec: C) -> Self {
        self.record_codec = Some(record_codec);
        self
    }

    /// Set the sync interval (in bytes). Once the pending block buffer has
    /// reached this size, the next record write flushes a block.
    /// Defaults to [`DEFAULT_SYNC_INTERVAL`](crate::config::DEFAULT_SYNC_INTERVAL).
    pub fn set_sync_interval(mut self, interval: usize) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Builds the `Writer` instance consuming this builder.
    pub fn build(self) -> OcfResult<Writer<'a, C>> {
        let schema = self.schema.ok_or(OcfErr::WriterBuildFailed)?;
        let record_codec = self.record_codec.ok_or(OcfErr::WriterBuildFailed)?;
        Ok(Writer::with_parts(
            schema,
            record_codec,
            self.codec,
            self.metadata,
            self.sync_interval,
        ))
    }
}

impl<'a, C: RecordCodec> Default for WriterBuilder<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// The Writer frames records into a container file: one header followed by
/// compressed, sync-marked blocks.
///
/// A writer owns one random sync marker and one codec choice for its whole
/// lifetime, normally one output file. It performs no I/O itself: the header
/// and each block are handed to the caller as byte chunks which, concatenated
/// in order, form the container file.
pub struct Writer<'a, C> {
    schema: &'a Schema,
    record_codec: C,
    metadata: IndexMap<String, Vec<u8>>,
    codec: Codec,
    sync_marker: [u8; SYNC_MARKER_SIZE],
    block_stream: Vec<u8>,
    block_count: usize,
    sync_interval: usize,
}

impl<'a, C: RecordCodec> Writer<'a, C> {
    /// Creates a writer with the default `null` codec.
    pub fn new(schema: &'a Schema, record_codec: C) -> OcfResult<Self> {
        Ok(Self::with_parts(
            schema,
            record_codec,
            Codec::Null,
            IndexMap::new(),
            DEFAULT_SYNC_INTERVAL,
        ))
    }

    /// Same as the `new` method, but additionally takes a codec name as
    /// parameter. The name is validated before any encoding work happens;
    /// anything outside `null`, `deflate` and `snappy` fails with
    /// [`OcfErr::UnsupportedCodec`].
    pub fn with_codec(schema: &'a Schema, record_codec: C, codec: &str) -> OcfResult<Self> {
        let codec = Codec::try_from(codec)?;
        Ok(Self::with_parts(
            schema,
            record_codec,
            codec,
            IndexMap::new(),
            DEFAULT_SYNC_INTERVAL,
        ))
    }

    fn with_parts(
        schema: &'a Schema,
        record_codec: C,
        codec: Codec,
        mut metadata: IndexMap<String, Vec<u8>>,
        sync_interval: usize,
    ) -> Self {
        metadata.insert(META_CODEC.to_string(), codec.as_ref().as_bytes().to_vec());
        metadata.insert(META_SCHEMA.to_string(), schema.as_bytes());
        Writer {
            schema,
            record_codec,
            metadata,
            codec,
            sync_marker: sync_marker(),
            block_stream: Vec::with_capacity(sync_interval),
            block_count: 0,
            sync_interval,
        }
    }

    /// Returns the header bytes for this writer: magic, metadata map
    /// (`avro.codec`, `avro.schema` and any custom entries) and the sync
    /// marker. The same writer always produces identical header bytes.
    pub fn header(&self) -> OcfResult<Vec<u8>> {
        let mut out = Vec::new();
        encode_header(&self.metadata, &self.sync_marker, &mut out)?;
        Ok(out)
    }

    /// Returns a reference to the schema recorded in this writer's header.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Encodes one record into the pending block buffer. No block is emitted
    /// here; call [`flush_block`](Writer::flush_block) or use
    /// [`write_blocks`](Writer::write_blocks) to obtain framed chunks.
    pub fn write_record(&mut self, record: &C::Record) -> OcfResult<()> {
        let before = self.block_stream.len();
        if let Err(e) = self.record_codec.encode_record(record, &mut self.block_stream) {
            // drop any partial encoding so the buffer stays a clean record sequence
            self.block_stream.truncate(before);
            return Err(e);
        }
        self.block_count += 1;
        Ok(())
    }

    /// Number of encoded-record bytes pending in the current block buffer.
    pub fn pending_size(&self) -> usize {
        self.block_stream.len()
    }

    /// Number of records pending in the current block buffer.
    pub fn pending_count(&self) -> usize {
        self.block_count
    }

    /// Flushes the pending records as one block and returns its bytes:
    /// `varint(count) + varint(byte_length) + payload + sync_marker`.
    /// Returns `None` when nothing is pending; an empty block is never
    /// emitted.
    pub fn flush_block(&mut self) -> OcfResult<Option<Vec<u8>>> {
        if self.block_count == 0 {
            return Ok(None);
        }
        let mut chunk = Vec::with_capacity(self.block_stream.len() + SYNC_MARKER_SIZE + 10);
        encode_long(self.block_count as i64, &mut chunk)?;
        self.codec.encode(&self.block_stream, &mut chunk)?;
        encode_raw_bytes(&self.sync_marker, &mut chunk)?;
        self.reset_block_buffer();
        Ok(Some(chunk))
    }

    /// Frames `records` into a lazy sequence of block chunks.
    ///
    /// The threshold check happens *before* each record is encoded: once the
    /// pending buffer has reached the sync interval, the current block is
    /// flushed and the incoming record starts the next one. A block may
    /// therefore slightly exceed the interval. After the input is exhausted a
    /// final, possibly undersized, block is flushed if anything is pending.
    pub fn write_blocks<I>(&mut self, records: I) -> BlockChunks<'_, 'a, C, I::IntoIter>
    where
        I: IntoIterator<Item = C::Record>,
    {
        BlockChunks {
            writer: self,
            records: records.into_iter(),
            done: false,
        }
    }

    fn reset_block_buffer(&mut self) {
        self.block_count = 0;
        self.block_stream.clear();
    }
}

/// Lazy iterator of framed block chunks produced by
/// [`Writer::write_blocks`]. Callers control backpressure by pulling chunks
/// at their own pace.
pub struct BlockChunks<'w, 'a, C: RecordCodec, I> {
    writer: &'w mut Writer<'a, C>,
    records: I,
    done: bool,
}

impl<'w, 'a, C, I> Iterator for BlockChunks<'w, 'a, C, I>
where
    C: RecordCodec,
    I: Iterator<Item = C::Record>,
{
    type Item = OcfResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for record in &mut self.records {
            let mut chunk = None;
            if self.writer.block_stream.len() >= self.writer.sync_interval {
                match self.writer.flush_block() {
                    Ok(c) => chunk = c,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
            // the record that crossed the threshold lands in the next block
            if let Err(e) = self.writer.write_record(&record) {
                self.done = true;
                return Some(Err(e));
            }
            if let Some(c) = chunk {
                return Some(Ok(c));
            }
        }
        self.done = true;
        match self.writer.flush_block() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
