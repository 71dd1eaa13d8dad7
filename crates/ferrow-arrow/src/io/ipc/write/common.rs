use std::env;

use ferrow_error::{ferrow_ensure, ferrow_err, FerrowResult};

use super::schema::record_batch_to_bytes;
use super::serialize::write;
use crate::bitmap::utils::bytes_for;
use crate::record_batch::RecordBatchT;
use crate::vector::FixedWidthVector;

/// Options declaring the behaviour of writing to IPC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Every body buffer is zero-padded to a multiple of this many bytes, and the metadata
    /// block is padded so the body starts at such a multiple, counted from the start of the
    /// message. Must be a power of two. `1` writes buffers back to back.
    pub alignment: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { alignment: 1 }
    }
}

impl WriteOptions {
    /// Options with the alignment read from `FERROW_IPC_ALIGNMENT`, falling back to the
    /// default when the variable is not set.
    pub fn from_env() -> FerrowResult<Self> {
        let mut options = Self::default();
        if let Ok(value) = env::var("FERROW_IPC_ALIGNMENT") {
            options.alignment = value.parse().map_err(|_| {
                ferrow_err!(ComputeError: "FERROW_IPC_ALIGNMENT must be an integer, got '{}'", value)
            })?;
        }
        options.validate()?;
        Ok(options)
    }

    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    pub(crate) fn validate(&self) -> FerrowResult<()> {
        ferrow_ensure!(
            self.alignment.is_power_of_two(),
            ComputeError: "IPC alignment must be a power of two, got {}", self.alignment
        );
        Ok(())
    }
}

/// Number of zero bytes needed to round `len` up to a multiple of `alignment`.
#[inline]
pub(crate) fn pad_to_alignment(len: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    ((len + alignment - 1) & !(alignment - 1)) - len
}

/// Stores the encoded data, which is the metadata block and the body of an IPC message.
#[derive(Debug, Default)]
pub struct EncodedData {
    /// The metadata block, without its length prefix or padding.
    pub metadata: Vec<u8>,
    /// The body, already padded buffer by buffer.
    pub body: Vec<u8>,
}

/// Encodes `batch` into its metadata block and body. Nothing is written anywhere.
///
/// # Errors
/// Errors with `OutOfMemory` iff the body cannot be allocated.
pub fn encode_record_batch<V: AsRef<FixedWidthVector>>(
    batch: &RecordBatchT<V>,
    options: &WriteOptions,
) -> FerrowResult<EncodedData> {
    let rows = batch.len();
    let alignment = options.alignment;

    let body_len: usize = batch
        .columns()
        .iter()
        .map(|column| {
            let validity = bytes_for(rows);
            let values = rows * column.as_ref().width();
            validity
                + pad_to_alignment(validity, alignment)
                + values
                + pad_to_alignment(values, alignment)
        })
        .sum();
    let mut body = Vec::new();
    body.try_reserve_exact(body_len)?;

    let mut nodes = Vec::with_capacity(batch.columns().len());
    let mut buffers = Vec::with_capacity(batch.columns().len() * 2);
    let mut offset = 0;
    for column in batch.columns() {
        write(
            column.as_ref(),
            &mut buffers,
            &mut body,
            &mut nodes,
            &mut offset,
            alignment,
        );
    }
    debug_assert_eq!(body.len(), body_len);

    let metadata = record_batch_to_bytes(rows, body.len(), &nodes, &buffers)?;
    Ok(EncodedData { metadata, body })
}
