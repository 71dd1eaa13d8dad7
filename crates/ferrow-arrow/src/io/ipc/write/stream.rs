//! Arrow-style IPC streams.
//!
//! A stream is a schema message, record batch messages and an end-of-stream marker, written in
//! that order. See [`FileWriter`](super::FileWriter) for the seekable variant.

use std::io::Write;

use ferrow_error::{ferrow_bail, ferrow_ensure, ferrow_err, ErrString, FerrowError, FerrowResult};

use super::super::Block;
use super::common::{encode_record_batch, EncodedData, WriteOptions};
use super::common_sync::{write_eos, write_message};
use super::schema::schema_to_bytes;
use crate::datatypes::{Schema, SchemaRef};
use crate::record_batch::RecordBatchT;
use crate::vector::FixedWidthVector;

fn block(offset: u64, meta_data_length: usize, body_length: usize) -> FerrowResult<Block> {
    let meta_data_length = u32::try_from(meta_data_length).map_err(|_| {
        ferrow_err!(ComputeError: "metadata of {} bytes does not fit in a block", meta_data_length)
    })?;
    Ok(Block {
        offset,
        meta_data_length,
        body_length: body_length as u64,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Stream,
    File,
}

impl Mode {
    fn as_str(&self) -> &'static str {
        match self {
            Mode::Stream => "stream",
            Mode::File => "file",
        }
    }
}

#[derive(Debug)]
enum State {
    Writable,
    /// A write to the sink failed; the sink holds an unknown prefix of the last message.
    Failed(ErrString),
    Closed,
}

/// Lifecycle of one writer. Kept apart from the sink so `into_inner` can move the sink out.
#[derive(Debug)]
struct Session {
    mode: Mode,
    state: State,
}

impl Session {
    fn tag(&self, phase: &str) -> ErrString {
        format!("[ipc][{}-writer][{}]", self.mode.as_str(), phase).into()
    }

    fn ensure_writable(&self) -> FerrowResult<()> {
        match &self.state {
            State::Writable => Ok(()),
            State::Failed(msg) => ferrow_bail!(
                WriterClosed: "{} writer is unusable after an earlier failure: {}", self.mode.as_str(), msg
            ),
            State::Closed => ferrow_bail!(WriterClosed: "{} writer is already closed", self.mode.as_str()),
        }
    }

    /// Records a sink failure and tags it with the phase it happened in.
    fn poison(&mut self, error: FerrowError, phase: &str) -> FerrowError {
        let error = error.context(self.tag(phase));
        self.state = State::Failed(error.to_string().into());
        error
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let State::Writable = self.state {
            tracing::warn!(
                mode = self.mode.as_str(),
                "IPC writer dropped without being closed, the sink holds a truncated {}",
                self.mode.as_str()
            );
        }
    }
}

/// Writes record batches to a [`Write`] sink as an IPC stream.
///
/// The schema message is written when the writer is created. Call [`close`](Self::close)
/// exactly once to write the end-of-stream marker; a writer dropped before that leaves a
/// truncated stream behind.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ferrow_arrow::datatypes::{DataType, Field, Schema};
/// use ferrow_arrow::io::ipc::write::StreamWriter;
/// use ferrow_arrow::record_batch::RecordBatchT;
/// use ferrow_arrow::vector::Int32Vector;
///
/// let schema = Arc::new(Schema::try_new(vec![Field::new("x", DataType::Int32, false)])?);
/// let mut writer = StreamWriter::new(Vec::<u8>::new(), schema.clone())?;
///
/// let x = Int32Vector::from_slice("x", &[1, 2, 3])?;
/// writer.write(&RecordBatchT::try_new(schema, vec![x.as_vector()])?)?;
/// writer.close()?;
/// assert!(writer.close().is_err());
///
/// let bytes = writer.into_inner()?;
/// assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
/// # Ok::<(), ferrow_error::FerrowError>(())
/// ```
#[derive(Debug)]
pub struct StreamWriter<W: Write> {
    writer: W,
    schema: SchemaRef,
    options: WriteOptions,
    session: Session,
    /// Bytes written to the sink, which is also where the next message starts.
    bytes_written: u64,
    batches_written: usize,
}

impl<W: Write> StreamWriter<W> {
    /// Creates a new [`StreamWriter`] with default [`WriteOptions`] and writes the schema.
    pub fn new(writer: W, schema: SchemaRef) -> FerrowResult<Self> {
        Self::try_new(writer, schema, WriteOptions::default())
    }

    /// Creates a new [`StreamWriter`] and writes the schema message to `writer`.
    ///
    /// # Errors
    /// Errors iff `options` are invalid or the sink fails; the writer is not created then.
    pub fn try_new(writer: W, schema: SchemaRef, options: WriteOptions) -> FerrowResult<Self> {
        Ok(Self::start(writer, schema, options, Mode::Stream, &[])?.0)
    }

    /// Writes `header` and the schema message, returning the writer and the schema message's
    /// location.
    pub(crate) fn start(
        mut writer: W,
        schema: SchemaRef,
        options: WriteOptions,
        mode: Mode,
        header: &[u8],
    ) -> FerrowResult<(Self, Block)> {
        options.validate()?;
        let encoded = EncodedData {
            metadata: schema_to_bytes(&schema)?,
            body: vec![],
        };

        let result = writer
            .write_all(header)
            .map_err(FerrowError::from)
            .and_then(|_| write_message(&mut writer, &encoded, options.alignment));
        let (meta_data_length, body_length) = match result {
            Ok(lengths) => lengths,
            Err(err) => {
                return Err(err.context(format!("[ipc][{}-writer][open]", mode.as_str()).into()))
            },
        };

        let block = block(header.len() as u64, meta_data_length, body_length)?;
        tracing::debug!(
            mode = mode.as_str(),
            fields = schema.len(),
            schema_len = meta_data_length,
            "opened IPC writer"
        );
        let out = Self {
            writer,
            schema,
            options,
            session: Session {
                mode,
                state: State::Writable,
            },
            bytes_written: (header.len() + meta_data_length + body_length) as u64,
            batches_written: 0,
        };
        Ok((out, block))
    }

    /// Writes `batch` as a record batch message.
    ///
    /// # Errors
    /// * `SchemaMismatch` iff `batch` does not have the writer's field count and per-field
    ///   layout, or has nulls in a column the writer's schema declares non-nullable.
    ///   Nothing is written and the writer stays usable.
    /// * `WriterClosed` iff the writer was closed or poisoned by an earlier sink failure.
    /// * `IO` iff the sink fails. The writer is poisoned afterwards.
    pub fn write<V: AsRef<FixedWidthVector>>(&mut self, batch: &RecordBatchT<V>) -> FerrowResult<()> {
        self.write_block(batch).map(|_| ())
    }

    /// Same as [`write`](Self::write), returning where the message was written.
    pub(crate) fn write_block<V: AsRef<FixedWidthVector>>(
        &mut self,
        batch: &RecordBatchT<V>,
    ) -> FerrowResult<Block> {
        self.session.ensure_writable()?;
        self.schema.ensure_structurally_equal(batch.schema())?;
        for (field, column) in self.schema.iter().zip(batch.columns()) {
            ferrow_ensure!(
                field.is_nullable || column.as_ref().null_count() == 0,
                SchemaMismatch: "field '{}' is not nullable, but its column has {} nulls",
                field.name, column.as_ref().null_count()
            );
        }
        let encoded = encode_record_batch(batch, &self.options)?;

        let offset = self.bytes_written;
        let (meta_data_length, body_length) =
            match write_message(&mut self.writer, &encoded, self.options.alignment) {
                Ok(lengths) => lengths,
                Err(err) => return Err(self.session.poison(err, "write-record-batch")),
            };
        self.bytes_written += (meta_data_length + body_length) as u64;
        self.batches_written += 1;

        tracing::debug!(
            mode = self.session.mode.as_str(),
            rows = batch.len(),
            offset,
            meta_data_length,
            body_length,
            "wrote record batch"
        );
        block(offset, meta_data_length, body_length)
    }

    /// Writes the end-of-stream marker and flushes the sink.
    ///
    /// # Errors
    /// `WriterClosed` iff the writer was already closed or poisoned, `IO` iff the sink fails.
    pub fn close(&mut self) -> FerrowResult<()> {
        self.finish(&[])
    }

    /// Writes the end-of-stream marker followed by `trailer`, then flushes.
    pub(crate) fn finish(&mut self, trailer: &[u8]) -> FerrowResult<()> {
        self.session.ensure_writable()?;
        let result = write_eos(&mut self.writer).and_then(|eos| {
            self.writer.write_all(trailer)?;
            self.writer.flush()?;
            Ok(eos + trailer.len())
        });
        match result {
            Ok(written) => {
                self.bytes_written += written as u64;
                self.session.state = State::Closed;
                tracing::debug!(
                    mode = self.session.mode.as_str(),
                    batches = self.batches_written,
                    bytes = self.bytes_written,
                    "closed IPC writer"
                );
                Ok(())
            },
            Err(err) => Err(self.session.poison(err, "close")),
        }
    }

    /// The schema every written batch must match.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Bytes written to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of record batches written so far.
    pub fn batches_written(&self) -> usize {
        self.batches_written
    }

    /// Whether [`close`](Self::close) completed.
    pub fn is_closed(&self) -> bool {
        matches!(self.session.state, State::Closed)
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Mutable access to the sink. Writing to it directly corrupts the stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Returns the sink of a closed writer.
    ///
    /// # Errors
    /// `WriterClosed` iff the writer was not closed successfully; the sink is dropped then.
    pub fn into_inner(self) -> FerrowResult<W> {
        match &self.session.state {
            State::Closed => Ok(self.writer),
            State::Writable => Err(ferrow_err!(
                WriterClosed: "{} writer is still open, close it before taking its sink", self.session.mode.as_str()
            )),
            State::Failed(msg) => Err(ferrow_err!(
                WriterClosed: "{} writer failed and was never closed: {}", self.session.mode.as_str(), msg
            )),
        }
    }
}
