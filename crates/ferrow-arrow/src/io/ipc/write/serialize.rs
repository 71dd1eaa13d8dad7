use super::common::pad_to_alignment;
use crate::bitmap::utils::{bytes_for, mask_trailing_bits};
use crate::bitmap::ValidityBitmap;
use crate::vector::FixedWidthVector;

/// Row and null count of one column of a record batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldNode {
    pub length: u64,
    pub null_count: u64,
}

/// Position of one buffer inside a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IpcBuffer {
    /// From the start of the body.
    pub offset: u64,
    /// Without padding.
    pub length: u64,
}

/// Writes `vector` to `body`: its validity buffer followed by its value buffer.
pub(crate) fn write(
    vector: &FixedWidthVector,
    buffers: &mut Vec<IpcBuffer>,
    body: &mut Vec<u8>,
    nodes: &mut Vec<FieldNode>,
    offset: &mut u64,
    alignment: usize,
) {
    let length = vector.len();
    nodes.push(FieldNode {
        length: length as u64,
        null_count: vector.null_count() as u64,
    });
    write_bitmap(vector.validity(), length, buffers, body, offset, alignment);
    write_bytes(vector.value_bytes(), buffers, body, offset, alignment);
}

/// Writes the first `length` bits of `bitmap`. Bits past `length` in the last byte are
/// written as zero.
fn write_bitmap(
    bitmap: &ValidityBitmap,
    length: usize,
    buffers: &mut Vec<IpcBuffer>,
    body: &mut Vec<u8>,
    offset: &mut u64,
    alignment: usize,
) {
    let start = body.len();
    body.extend_from_slice(&bitmap.as_slice()[..bytes_for(length)]);
    mask_trailing_bits(&mut body[start..], length);
    buffers.push(finish_buffer(body, start, offset, alignment));
}

/// writes `bytes` to `body` updating `buffers` and `offset` and guaranteeing an `alignment` byte boundary.
fn write_bytes(
    bytes: &[u8],
    buffers: &mut Vec<IpcBuffer>,
    body: &mut Vec<u8>,
    offset: &mut u64,
    alignment: usize,
) {
    let start = body.len();
    body.extend_from_slice(bytes);
    buffers.push(finish_buffer(body, start, offset, alignment));
}

fn finish_buffer(body: &mut Vec<u8>, start: usize, offset: &mut u64, alignment: usize) -> IpcBuffer {
    let buffer_len = body.len() - start;

    body.resize(body.len() + pad_to_alignment(buffer_len, alignment), 0);
    let total_len = (body.len() - start) as u64;

    let buffer = IpcBuffer {
        offset: *offset,
        length: buffer_len as u64,
    };
    *offset += total_len;
    buffer
}
