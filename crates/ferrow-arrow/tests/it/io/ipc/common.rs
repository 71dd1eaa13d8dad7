use std::io::{self, Write};
use std::sync::Arc;

use ferrow_arrow::datatypes::{DataType, Field, Schema, SchemaRef};

pub fn u16_at(bytes: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap())
}

pub fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap())
}

pub fn u64_at(bytes: &[u8], pos: usize) -> u64 {
    u64::from_le_bytes(bytes[pos..pos + 8].try_into().unwrap())
}

/// A message framed as `u32 metadata length | metadata | body`.
#[derive(Debug)]
pub struct Message<'a> {
    pub offset: usize,
    pub metadata: &'a [u8],
    pub body: &'a [u8],
}

impl Message<'_> {
    pub fn kind(&self) -> u8 {
        self.metadata[0]
    }

    pub fn rows(&self) -> u64 {
        u64_at(self.metadata, 3)
    }

    /// `(null_count, validity_offset, validity_len, values_offset, values_len)` of `column`.
    pub fn column(&self, column: usize) -> [u64; 5] {
        let start = 23 + column * 40;
        std::array::from_fn(|i| u64_at(self.metadata, start + i * 8))
    }
}

/// Reads the message starting at `offset`. Returns `None` for the end-of-stream marker.
pub fn read_message(bytes: &[u8], offset: usize) -> Option<Message<'_>> {
    let metadata_len = u32_at(bytes, offset) as usize;
    if metadata_len == 0 {
        return None;
    }
    let metadata = &bytes[offset + 4..offset + 4 + metadata_len];
    let body_len = match metadata[0] {
        1 => 0,
        2 => u64_at(metadata, 11) as usize,
        kind => panic!("unknown message kind {kind}"),
    };
    let body_start = offset + 4 + metadata_len;
    Some(Message {
        offset,
        metadata,
        body: &bytes[body_start..body_start + body_len],
    })
}

/// Reads messages starting at `offset` up to the end-of-stream marker, returning them and
/// the position right after the marker.
pub fn read_stream(bytes: &[u8], mut offset: usize) -> (Vec<Message<'_>>, usize) {
    let mut messages = vec![];
    while let Some(message) = read_message(bytes, offset) {
        offset += 4 + message.metadata.len() + message.body.len();
        messages.push(message);
    }
    (messages, offset + 4)
}

pub fn ts_schema() -> SchemaRef {
    Arc::new(Schema::try_new(vec![Field::new("ts", DataType::Int64, true)]).unwrap())
}

/// A sink that accepts `capacity` bytes and fails every write after that.
#[derive(Debug, Default)]
pub struct FailingSink {
    pub data: Vec<u8>,
    pub capacity: usize,
}

impl FailingSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![],
            capacity,
        }
    }
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.data.len();
        if room == 0 && !buf.is_empty() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink is full"));
        }
        let n = room.min(buf.len());
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
