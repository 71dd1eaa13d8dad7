//! APIs to write to Ferrow's IPC format.
pub(crate) mod common;
mod schema;
mod serialize;
mod stream;
pub(crate) mod writer;

pub use common::{encode_record_batch, EncodedData, WriteOptions};
use ferrow_error::FerrowResult;
pub use schema::{footer_to_bytes, schema_to_bytes};
pub use stream::StreamWriter;
pub use writer::FileWriter;

pub(crate) mod common_sync;

pub use common_sync::{write_eos, write_message};

use crate::record_batch::RecordBatchT;
use crate::vector::FixedWidthVector;

/// A sink of record batches that must be closed once every batch was written.
pub trait RecordBatchWriter {
    /// Writes a single record batch.
    fn write<V: AsRef<FixedWidthVector>>(&mut self, batch: &RecordBatchT<V>) -> FerrowResult<()>;

    /// Writes whatever ends the output and flushes it. Fails when called twice.
    fn close(&mut self) -> FerrowResult<()>;
}

impl<W: std::io::Write> RecordBatchWriter for StreamWriter<W> {
    fn write<V: AsRef<FixedWidthVector>>(&mut self, batch: &RecordBatchT<V>) -> FerrowResult<()> {
        StreamWriter::write(self, batch)
    }

    fn close(&mut self) -> FerrowResult<()> {
        StreamWriter::close(self)
    }
}

impl<W: std::io::Write> RecordBatchWriter for FileWriter<W> {
    fn write<V: AsRef<FixedWidthVector>>(&mut self, batch: &RecordBatchT<V>) -> FerrowResult<()> {
        FileWriter::write(self, batch)
    }

    fn close(&mut self) -> FerrowResult<()> {
        FileWriter::close(self)
    }
}
