//! APIs to write record batches to Ferrow's IPC format.
//!
//! The format comes in two flavours that share the same message framing:
//!
//! * a *stream* is a schema message, any number of record batch messages and an
//!   end-of-stream marker. It can only be consumed front to back.
//! * a *file* wraps a stream between a leading magic and a trailing footer. The footer lists
//!   where every record batch message starts, so a reader can seek to the end, read the footer
//!   length and the magic, and jump to any batch without scanning.
//!
//! Every message is a little-endian `u32` metadata length, the metadata and the body.
//! The end-of-stream marker is a metadata length of zero.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use ferrow_arrow::datatypes::{DataType, Field, Schema};
//! use ferrow_arrow::io::ipc::write::{FileWriter, WriteOptions};
//! use ferrow_arrow::record_batch::RecordBatchT;
//! use ferrow_arrow::vector::Int64Vector;
//!
//! let schema = Arc::new(Schema::try_new(vec![Field::new("ts", DataType::Int64, true)])?);
//! let mut writer = FileWriter::try_new(Vec::<u8>::new(), schema.clone(), WriteOptions::default())?;
//!
//! let ts = Int64Vector::from_options("ts", &[Some(100), None, Some(300)])?;
//! let batch = RecordBatchT::try_new(schema, vec![ts.as_vector()])?;
//! for _ in 0..3 {
//!     writer.write(&batch)?;
//! }
//! writer.close()?;
//!
//! assert_eq!(writer.record_blocks().len(), 3);
//! let bytes = writer.into_inner()?;
//! assert_eq!(&bytes[bytes.len() - 6..], b"FERROW");
//! # Ok::<(), ferrow_error::FerrowError>(())
//! ```

pub mod write;

/// Magic bytes that open and close every IPC file.
pub const FERROW_MAGIC: [u8; 6] = *b"FERROW";

/// Version of the metadata layout written by this crate.
pub const METADATA_VERSION: u16 = 1;

/// Metadata length of the end-of-stream marker.
pub(crate) const EOS_MARKER: [u8; 4] = [0; 4];

/// The kind of message, the first byte of every metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    Schema = 1,
    RecordBatch = 2,
}

/// Location of a message inside an IPC file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block {
    /// Position of the message's metadata length prefix, from the start of the sink.
    pub offset: u64,
    /// Length of the prefix plus the (padded) metadata.
    pub meta_data_length: u32,
    /// Length of the body following the metadata.
    pub body_length: u64,
}
