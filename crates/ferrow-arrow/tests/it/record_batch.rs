use std::sync::Arc;

use ferrow_arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use ferrow_arrow::record_batch::{RecordBatch, RecordBatchT};
use ferrow_arrow::vector::{Int32Vector, Int64Vector};
use ferrow_error::FerrowError;

fn schema() -> Arc<Schema> {
    Arc::new(
        Schema::try_new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("ts", DataType::Timestamp(TimeUnit::Millisecond), true),
        ])
        .unwrap(),
    )
}

#[test]
fn basics() {
    let id = Int32Vector::from_slice("id", &[1, 2]).unwrap().into_vector();
    let mut ts = Int64Vector::try_new("ts", DataType::Timestamp(TimeUnit::Millisecond)).unwrap();
    ts.set_safe(0, 1_700_000_000_000).unwrap();
    ts.set_null_safe(1).unwrap();

    let batch = RecordBatch::try_new(schema(), vec![id, ts.into_vector()]).unwrap();
    assert_eq!(batch.len(), 2);
    assert!(!batch.is_empty());
    assert_eq!(batch.schema().len(), 2);
    assert_eq!(batch.columns()[1].null_count(), 1);
    assert_eq!(batch.into_columns().len(), 2);
}

#[test]
fn unequal_lengths() {
    let id = Int32Vector::from_slice("id", &[1, 2]).unwrap();
    let ts = Int64Vector::try_new("ts", DataType::Timestamp(TimeUnit::Millisecond)).unwrap();
    let err = RecordBatchT::try_new(schema(), vec![id.as_vector(), ts.as_vector()]).unwrap_err();
    assert!(matches!(err, FerrowError::ShapeMismatch(_)));
}

#[test]
fn logical_type_must_match_field() {
    let id = Int32Vector::from_slice("id", &[1]).unwrap();
    // same width, different logical type
    let ts = Int64Vector::from_slice("ts", &[1]).unwrap();
    let err = RecordBatchT::try_new(schema(), vec![id.as_vector(), ts.as_vector()]).unwrap_err();
    assert!(matches!(err, FerrowError::SchemaMismatch(_)));
}

#[test]
fn empty_schema() {
    let batch = RecordBatch::try_new(Arc::new(Schema::default()), vec![]).unwrap();
    assert_eq!(batch.len(), 0);
    assert!(batch.is_empty());
}
