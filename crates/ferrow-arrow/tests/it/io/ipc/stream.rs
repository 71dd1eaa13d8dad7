use std::sync::Arc;

use ferrow_arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use ferrow_arrow::io::ipc::write::{schema_to_bytes, RecordBatchWriter, StreamWriter, WriteOptions};
use ferrow_arrow::record_batch::RecordBatchT;
use ferrow_arrow::vector::{Int32Vector, Int64Vector, PrimitiveVector};
use ferrow_error::{FerrowError, FerrowResult};

use super::common::*;

fn write_batches<W: RecordBatchWriter>(writer: &mut W, n: usize) -> FerrowResult<()> {
    let schema = ts_schema();
    for i in 0..n {
        let values: Vec<i64> = (0..i as i64 + 1).collect();
        let ts = Int64Vector::from_slice("ts", &values)?;
        writer.write(&RecordBatchT::try_new(schema.clone(), vec![ts.as_vector()])?)?;
    }
    writer.close()
}

#[test]
fn round_trip_framing() -> FerrowResult<()> {
    let mut writer = StreamWriter::new(Vec::<u8>::new(), ts_schema())?;
    write_batches(&mut writer, 5)?;
    assert!(writer.is_closed());
    assert_eq!(writer.batches_written(), 5);
    let bytes = writer.into_inner()?;

    let (messages, end) = read_stream(&bytes, 0);
    assert_eq!(end, bytes.len());
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[0].kind(), 1);
    assert_eq!(messages[0].metadata, schema_to_bytes(&ts_schema())?.as_slice());
    assert!(messages[0].body.is_empty());
    for (i, message) in messages[1..].iter().enumerate() {
        assert_eq!(message.kind(), 2);
        assert_eq!(message.rows(), i as u64 + 1);
        assert_eq!(message.body.len(), 1 + (i + 1) * 8);
    }
    // the marker has no body
    assert_eq!(&bytes[end - 4..], &[0, 0, 0, 0]);
    Ok(())
}

#[test]
fn nullable_int64_batch() -> FerrowResult<()> {
    let schema = ts_schema();
    let mut ts = Int64Vector::new("ts");
    ts.set_safe(0, 100)?;
    ts.set_null_safe(1)?;
    ts.set_safe(2, 300)?;
    let batch = RecordBatchT::try_new(schema.clone(), vec![ts.as_vector()])?;

    let mut writer = StreamWriter::new(Vec::<u8>::new(), schema)?;
    writer.write(&batch)?;
    writer.close()?;
    let bytes = writer.into_inner()?;

    let (messages, _) = read_stream(&bytes, 0);
    let batch = &messages[1];
    assert_eq!(batch.rows(), 3);
    assert_eq!(u64_at(batch.metadata, 11), 25);
    assert_eq!(batch.body.len(), 25);
    assert_eq!(batch.body[0], 0b0000_0101);
    assert_eq!(batch.column(0), [1, 0, 1, 1, 24]);
    assert_eq!(u64_at(batch.body, 1), 100);
    assert_eq!(u64_at(batch.body, 17), 300);
    Ok(())
}

#[test]
fn aligned_buffers() -> FerrowResult<()> {
    let schema = Arc::new(Schema::try_new(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("t", DataType::Time64(TimeUnit::Nanosecond), true),
    ])?);
    let a = Int32Vector::from_options("a", &[Some(1), None, Some(3)])?;
    let mut t = PrimitiveVector::<i64>::try_new("t", DataType::Time64(TimeUnit::Nanosecond))?;
    t.set_value_count(3)?;
    let batch = RecordBatchT::try_new(schema.clone(), vec![a.as_vector(), t.as_vector()])?;

    let options = WriteOptions::default().with_alignment(8);
    let mut writer = StreamWriter::try_new(Vec::<u8>::new(), schema, options)?;
    writer.write(&batch)?;
    writer.close()?;
    let bytes = writer.into_inner()?;

    let (messages, _) = read_stream(&bytes, 0);
    for message in &messages {
        assert_eq!((4 + message.metadata.len()) % 8, 0);
    }
    let batch = &messages[1];
    // validity 1 -> 8, values 12 -> 16, validity 1 -> 8, values 24
    assert_eq!(batch.body.len(), 56);
    assert_eq!(batch.column(0), [1, 0, 1, 8, 12]);
    assert_eq!(batch.column(1), [3, 24, 1, 32, 24]);
    assert_eq!(batch.body[24], 0);
    Ok(())
}

#[test]
fn invalid_alignment() {
    let options = WriteOptions::default().with_alignment(3);
    let err = StreamWriter::try_new(Vec::<u8>::new(), ts_schema(), options).unwrap_err();
    assert!(matches!(err, FerrowError::ComputeError(_)));
}

#[test]
fn close_twice() -> FerrowResult<()> {
    let mut writer = StreamWriter::new(Vec::<u8>::new(), ts_schema())?;
    writer.close()?;
    let len = writer.get_ref().len();
    assert!(matches!(writer.close(), Err(FerrowError::WriterClosed(_))));
    assert_eq!(writer.get_ref().len(), len);
    Ok(())
}

#[test]
fn write_after_close() -> FerrowResult<()> {
    let schema = ts_schema();
    let ts = Int64Vector::from_slice("ts", &[1])?;
    let batch = RecordBatchT::try_new(schema.clone(), vec![ts.as_vector()])?;

    let mut writer = StreamWriter::new(Vec::<u8>::new(), schema)?;
    writer.close()?;
    assert!(matches!(writer.write(&batch), Err(FerrowError::WriterClosed(_))));
    Ok(())
}

#[test]
fn mismatched_schema_writes_nothing() -> FerrowResult<()> {
    let mut writer = StreamWriter::new(Vec::<u8>::new(), ts_schema())?;
    let before = writer.get_ref().len();

    let other = Arc::new(Schema::try_new(vec![Field::new("x", DataType::Int32, true)])?);
    let x = Int32Vector::from_slice("x", &[1, 2])?;
    let err = writer
        .write(&RecordBatchT::try_new(other, vec![x.as_vector()])?)
        .unwrap_err();
    assert!(matches!(err, FerrowError::SchemaMismatch(_)));
    assert_eq!(writer.get_ref().len(), before);

    // same layout under another name is accepted
    let renamed = Arc::new(Schema::try_new(vec![Field::new(
        "when",
        DataType::Timestamp(TimeUnit::Second),
        false,
    )])?);
    let when = PrimitiveVector::<i64>::try_new("when", DataType::Timestamp(TimeUnit::Second))?;
    writer.write(&RecordBatchT::try_new(renamed, vec![when.as_vector()])?)?;
    writer.close()?;
    Ok(())
}

#[test]
fn nulls_under_non_nullable_field_are_rejected() -> FerrowResult<()> {
    let required = Arc::new(Schema::try_new(vec![Field::new("ts", DataType::Int64, false)])?);
    let mut writer = StreamWriter::new(Vec::<u8>::new(), required)?;
    let before = writer.get_ref().len();

    let ts = Int64Vector::from_options("ts", &[Some(1), None])?;
    let batch = RecordBatchT::try_new(ts_schema(), vec![ts.as_vector()])?;
    let err = writer.write(&batch).unwrap_err();
    assert!(matches!(err, FerrowError::SchemaMismatch(_)));
    assert_eq!(writer.get_ref().len(), before);

    // the same nullable schema without nulls is fine
    let ts = Int64Vector::from_slice("ts", &[1, 2])?;
    writer.write(&RecordBatchT::try_new(ts_schema(), vec![ts.as_vector()])?)?;
    writer.close()?;
    assert_eq!(writer.batches_written(), 1);
    Ok(())
}

#[test]
fn failed_open() {
    let err = StreamWriter::new(FailingSink::new(3), ts_schema()).unwrap_err();
    assert!(err.is_io());
    assert!(err.to_string().contains("[ipc][stream-writer][open]"));
}

#[test]
fn sink_failure_poisons_the_writer() -> FerrowResult<()> {
    let schema = ts_schema();
    let schema_len = 4 + schema_to_bytes(&schema)?.len();
    let ts = Int64Vector::from_slice("ts", &[1, 2, 3])?;
    let batch = RecordBatchT::try_new(schema.clone(), vec![ts.as_vector()])?;

    let mut writer = StreamWriter::new(FailingSink::new(schema_len + 10), schema)?;
    let err = writer.write(&batch).unwrap_err();
    assert!(err.is_io());
    assert!(err.to_string().contains("[ipc][stream-writer][write-record-batch]"));

    let err = writer.write(&batch).unwrap_err();
    assert!(matches!(err, FerrowError::WriterClosed(_)));
    assert!(err.to_string().contains("sink is full"));
    assert!(matches!(writer.close(), Err(FerrowError::WriterClosed(_))));
    assert!(!writer.is_closed());
    assert!(writer.into_inner().is_err());
    Ok(())
}

#[test]
fn into_inner_requires_close() -> FerrowResult<()> {
    let writer = StreamWriter::new(Vec::<u8>::new(), ts_schema())?;
    assert!(matches!(writer.into_inner(), Err(FerrowError::WriterClosed(_))));
    Ok(())
}
