use std::io::Write;

use ferrow_error::{ferrow_err, FerrowResult};

use super::super::{Block, FERROW_MAGIC};
use super::common::WriteOptions;
use super::schema::footer_to_bytes;
use super::stream::{Mode, StreamWriter};
use crate::datatypes::{Schema, SchemaRef};
use crate::record_batch::RecordBatchT;
use crate::vector::FixedWidthVector;

/// Writes record batches to a [`Write`] sink as an IPC file.
///
/// The file is the magic, two bytes of padding, an IPC stream, the footer, the footer's
/// length as a little-endian `i32` and the magic again. The footer holds the schema and the
/// [`Block`] of every record batch, so readers can seek straight to any batch.
#[derive(Debug)]
pub struct FileWriter<W: Write> {
    stream: StreamWriter<W>,
    schema_block: Block,
    /// Record batch blocks, in write order.
    record_blocks: Vec<Block>,
}

impl<W: Write> FileWriter<W> {
    /// Creates a new [`FileWriter`] and writes the header and the schema message.
    pub fn try_new(writer: W, schema: SchemaRef, options: WriteOptions) -> FerrowResult<Self> {
        let mut header = [0u8; 8];
        header[..FERROW_MAGIC.len()].copy_from_slice(&FERROW_MAGIC);
        let (stream, schema_block) = StreamWriter::start(writer, schema, options, Mode::File, &header)?;
        Ok(Self {
            stream,
            schema_block,
            record_blocks: vec![],
        })
    }

    /// Writes `batch` and records where it starts.
    /// See [`StreamWriter::write`] for the errors.
    pub fn write<V: AsRef<FixedWidthVector>>(&mut self, batch: &RecordBatchT<V>) -> FerrowResult<()> {
        let block = self.stream.write_block(batch)?;
        self.record_blocks.push(block);
        Ok(())
    }

    /// Writes the end-of-stream marker, the footer and the trailing magic, then flushes.
    ///
    /// # Errors
    /// `WriterClosed` iff the writer was already closed or poisoned, `IO` iff the sink fails.
    pub fn close(&mut self) -> FerrowResult<()> {
        // build the whole trailer first so a failure here writes nothing
        let footer = footer_to_bytes(self.stream.schema(), &self.record_blocks)?;
        let footer_len = i32::try_from(footer.len()).map_err(
            |_| ferrow_err!(ComputeError: "footer of {} bytes is too large", footer.len()),
        )?;

        let mut trailer = footer;
        trailer.extend_from_slice(&footer_len.to_le_bytes());
        trailer.extend_from_slice(&FERROW_MAGIC);
        self.stream.finish(&trailer)
    }

    /// Location of the schema message.
    pub fn schema_block(&self) -> Block {
        self.schema_block
    }

    /// Locations of the record batch messages written so far.
    pub fn record_blocks(&self) -> &[Block] {
        &self.record_blocks
    }

    pub fn schema(&self) -> &Schema {
        self.stream.schema()
    }

    pub fn bytes_written(&self) -> u64 {
        self.stream.bytes_written()
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    pub fn get_ref(&self) -> &W {
        self.stream.get_ref()
    }

    /// Mutable access to the sink. Writing to it directly corrupts the file.
    pub fn get_mut(&mut self) -> &mut W {
        self.stream.get_mut()
    }

    /// Returns the sink of a closed writer.
    /// See [`StreamWriter::into_inner`].
    pub fn into_inner(self) -> FerrowResult<W> {
        self.stream.into_inner()
    }
}
