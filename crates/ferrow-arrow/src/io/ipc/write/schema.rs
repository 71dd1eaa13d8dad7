use ferrow_error::{ferrow_err, FerrowResult};

use super::super::{Block, MessageKind, METADATA_VERSION};
use super::serialize::{FieldNode, IpcBuffer};
use crate::datatypes::{DataType, Field, Schema, TimeUnit};

fn u32_len(len: usize, what: &str) -> FerrowResult<u32> {
    u32::try_from(len).map_err(|_| ferrow_err!(ComputeError: "{} of {} does not fit in the IPC format", what, len))
}

fn time_unit_to_byte(unit: TimeUnit) -> u8 {
    match unit {
        TimeUnit::Second => 0,
        TimeUnit::Millisecond => 1,
        TimeUnit::Microsecond => 2,
        TimeUnit::Nanosecond => 3,
    }
}

/// Writes the tag of `dtype` followed by its parameters, if any.
fn serialize_type(dtype: &DataType, buf: &mut Vec<u8>) -> FerrowResult<()> {
    use DataType::*;
    let tag: u8 = match dtype {
        Int8 => 1,
        Int16 => 2,
        Int32 => 3,
        Int64 => 4,
        UInt8 => 5,
        UInt16 => 6,
        UInt32 => 7,
        UInt64 => 8,
        Float32 => 9,
        Float64 => 10,
        Date32 => 11,
        Date64 => 12,
        Time32(_) => 13,
        Time64(_) => 14,
        Timestamp(_) => 15,
        Duration(_) => 16,
        Decimal(_, _) => 17,
        FixedSizeBinary(_) => 18,
    };
    buf.push(tag);
    match dtype {
        Time32(unit) | Time64(unit) | Timestamp(unit) | Duration(unit) => {
            buf.push(time_unit_to_byte(*unit))
        },
        Decimal(precision, scale) => buf.extend_from_slice(&[*precision, *scale]),
        FixedSizeBinary(size) => {
            buf.extend_from_slice(&u32_len(*size, "fixed-size binary width")?.to_le_bytes())
        },
        _ => {},
    }
    Ok(())
}

fn serialize_field(field: &Field, buf: &mut Vec<u8>) -> FerrowResult<()> {
    buf.extend_from_slice(&u32_len(field.name.len(), "field name length")?.to_le_bytes());
    buf.extend_from_slice(field.name.as_bytes());
    buf.push(field.is_nullable as u8);
    serialize_type(&field.dtype, buf)
}

fn serialize_schema(schema: &Schema, buf: &mut Vec<u8>) -> FerrowResult<()> {
    buf.push(MessageKind::Schema as u8);
    buf.extend_from_slice(&METADATA_VERSION.to_le_bytes());
    buf.extend_from_slice(&u32_len(schema.len(), "field count")?.to_le_bytes());
    for field in schema {
        serialize_field(field, buf)?;
    }
    Ok(())
}

/// Converts a [`Schema`] to the metadata block of a schema message.
pub fn schema_to_bytes(schema: &Schema) -> FerrowResult<Vec<u8>> {
    let mut buf = vec![];
    serialize_schema(schema, &mut buf)?;
    Ok(buf)
}

/// The metadata block of a record batch message.
pub(crate) fn record_batch_to_bytes(
    rows: usize,
    body_len: usize,
    nodes: &[FieldNode],
    buffers: &[IpcBuffer],
) -> FerrowResult<Vec<u8>> {
    debug_assert_eq!(buffers.len(), nodes.len() * 2);
    let mut buf = Vec::with_capacity(1 + 2 + 8 + 8 + 4 + nodes.len() * 40);
    buf.push(MessageKind::RecordBatch as u8);
    buf.extend_from_slice(&METADATA_VERSION.to_le_bytes());
    buf.extend_from_slice(&(rows as u64).to_le_bytes());
    buf.extend_from_slice(&(body_len as u64).to_le_bytes());
    buf.extend_from_slice(&u32_len(nodes.len(), "column count")?.to_le_bytes());
    for (node, pair) in nodes.iter().zip(buffers.chunks_exact(2)) {
        let (validity, values) = (pair[0], pair[1]);
        for x in [
            node.null_count,
            validity.offset,
            validity.length,
            values.offset,
            values.length,
        ] {
            buf.extend_from_slice(&x.to_le_bytes());
        }
    }
    Ok(buf)
}

/// The footer of an IPC file: the schema and the location of every record batch message,
/// in the order they were written.
pub fn footer_to_bytes(schema: &Schema, record_blocks: &[Block]) -> FerrowResult<Vec<u8>> {
    let mut buf = vec![];
    buf.extend_from_slice(&METADATA_VERSION.to_le_bytes());
    serialize_schema(schema, &mut buf)?;
    buf.extend_from_slice(&u32_len(record_blocks.len(), "record batch count")?.to_le_bytes());
    for block in record_blocks {
        buf.extend_from_slice(&block.offset.to_le_bytes());
        buf.extend_from_slice(&block.meta_data_length.to_le_bytes());
        buf.extend_from_slice(&block.body_length.to_le_bytes());
    }
    Ok(buf)
}
