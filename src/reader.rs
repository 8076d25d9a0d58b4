//! The Reader walks a container file byte buffer: header first, then
//! sync-marked blocks of encoded records.

use crate::config::SYNC_MARKER_SIZE;
use crate::error::{OcfErr, OcfResult};
use crate::header::Header;
use crate::record::RecordCodec;
use crate::util::decode_long;
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Reader is the primary interface for reading records back out of a
/// container file buffer.
///
/// The header is parsed eagerly on construction; the codec and sync marker
/// are derived from it. Records are produced lazily through
/// [`read_blocks`](Reader::read_blocks), which requires a schema-bound
/// [`RecordCodec`] first.
///
/// Framing is permissive by design: a negative leading block count, or a
/// remainder too short to hold a block header, is treated as end-of-stream
/// rather than an error, and the trailing sync marker of each block is
/// skipped by width without comparing its value.
pub struct Reader<'a, C> {
    data: &'a [u8],
    pos: usize,
    header: Header,
    record_codec: Option<C>,
    block_buffer: Vec<u8>,
}

impl<'a, C> Reader<'a, C>
where
    C: RecordCodec,
{
    /// Parses the header at the start of `data` and positions the reader at
    /// the first block. A record codec must be [`bind`](Reader::bind)-ed
    /// before records can be read.
    pub fn new(data: &'a [u8]) -> OcfResult<Self> {
        let (header, consumed) = Header::from_slice(data)?;
        Ok(Reader {
            data,
            pos: consumed,
            header,
            record_codec: None,
            block_buffer: Vec::new(),
        })
    }

    /// Creates a reader with a record codec already bound.
    pub fn with_record_codec(data: &'a [u8], record_codec: C) -> OcfResult<Self> {
        let mut reader = Self::new(data)?;
        reader.bind(record_codec);
        Ok(reader)
    }

    /// Binds the schema-bound record codec used to decode records.
    pub fn bind(&mut self, record_codec: C) {
        self.record_codec = Some(record_codec);
    }

    /// Returns the parsed header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Retrieves a reference to the header metadata map.
    pub fn meta(&self) -> &IndexMap<String, Vec<u8>> {
        self.header.metadata()
    }

    /// Returns a lazy iterator over the records of all remaining blocks,
    /// in order. Fails with [`OcfErr::SchemaNotFound`] until a record codec
    /// has been bound.
    pub fn read_blocks(&mut self) -> OcfResult<Records<'_, 'a, C>> {
        if self.record_codec.is_none() {
            return Err(OcfErr::SchemaNotFound);
        }
        Ok(Records {
            reader: self,
            pending: VecDeque::new(),
            done: false,
        })
    }

    // Parses one block and materializes its records. Ok(None) marks
    // end-of-stream.
    fn next_block(&mut self) -> OcfResult<Option<VecDeque<C::Record>>> {
        let data = self.data;
        let remaining = &data[self.pos..];
        if remaining.is_empty() {
            return Ok(None);
        }

        let (block_count, count_width) = match decode_long(remaining) {
            Ok(decoded) => decoded,
            // too short for a block header: silent stop
            Err(_) => return Ok(None),
        };
        if block_count < 0 {
            return Ok(None);
        }
        let remaining = &remaining[count_width..];

        let (byte_length, length_width) = match decode_long(remaining) {
            Ok(decoded) => decoded,
            Err(_) => return Ok(None),
        };
        if byte_length < 0 {
            return Ok(None);
        }
        let remaining = &remaining[length_width..];

        if remaining.len() < byte_length as usize {
            // truncated payload: silent stop
            return Ok(None);
        }
        let payload = &remaining[..byte_length as usize];

        let codec = self.header.codec;
        codec.decode(payload, &mut self.block_buffer)?;

        let record_codec = self.record_codec.as_ref().ok_or(OcfErr::SchemaNotFound)?;
        // the count is untrusted input: cap the preallocation by the payload
        // size so a bogus count fails in decode_record instead of aborting
        let capacity = (block_count as usize).min(self.block_buffer.len());
        let mut records = VecDeque::with_capacity(capacity);
        let mut offset = 0usize;
        for _ in 0..block_count {
            let (record, used) = record_codec.decode_record(&self.block_buffer[offset..])?;
            offset += used;
            records.push_back(record);
        }

        self.pos += count_width + length_width + byte_length as usize;
        // skip the sync marker by width only; its value is not validated
        let skip = SYNC_MARKER_SIZE.min(self.data.len() - self.pos);
        self.pos += skip;

        Ok(Some(records))
    }
}

/// Lazy iterator over decoded records, produced by
/// [`Reader::read_blocks`]. One block's records are materialized at a time,
/// bounding peak memory by the largest decompressed block.
pub struct Records<'r, 'a, C: RecordCodec> {
    reader: &'r mut Reader<'a, C>,
    pending: VecDeque<C::Record>,
    done: bool,
}

impl<'r, 'a, C> Iterator for Records<'r, 'a, C>
where
    C: RecordCodec,
{
    type Item = OcfResult<C::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            match self.reader.next_block() {
                Ok(Some(records)) => self.pending = records,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    // the cursor did not advance past the failing block, so
                    // further pulls would retry it; fuse instead
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
