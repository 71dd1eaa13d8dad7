//! Contains [`RecordBatchT`], a container of [`FixedWidthVector`]s bound to a [`Schema`]
//! where every vector has the same length.

use ferrow_error::{ferrow_bail, ferrow_ensure, FerrowResult};

use crate::datatypes::{Schema, SchemaRef};
use crate::vector::FixedWidthVector;

/// A [`Schema`] and one vector per field, all of the same length, [`RecordBatchT::len`].
///
/// The batch only needs to borrow its columns: `RecordBatchT<&FixedWidthVector>` lets a
/// caller serialize vectors it keeps mutating afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatchT<V: AsRef<FixedWidthVector>> {
    schema: SchemaRef,
    columns: Vec<V>,
}

pub type RecordBatch = RecordBatchT<FixedWidthVector>;

impl<V: AsRef<FixedWidthVector>> RecordBatchT<V> {
    /// Creates a new [`RecordBatchT`].
    /// # Error
    /// * `SchemaMismatch` iff the number of columns differs from the number of fields or a
    ///   column's logical type differs from its field's
    /// * `ShapeMismatch` iff the columns do not have the same length
    /// * `ComputeError` iff a non-nullable field is bound to a column holding nulls
    pub fn try_new(schema: SchemaRef, columns: Vec<V>) -> FerrowResult<Self> {
        ferrow_ensure!(
            columns.len() == schema.len(),
            SchemaMismatch: "record batch has {} columns but its schema has {} fields", columns.len(), schema.len()
        );
        let len = columns.first().map(|c| c.as_ref().len()).unwrap_or_default();
        for (field, column) in schema.iter().zip(columns.iter()) {
            let column = column.as_ref();
            ferrow_ensure!(
                column.dtype() == field.dtype(),
                SchemaMismatch: "column for field '{}' is {:?}, expected {:?}", field.name, column.dtype(), field.dtype
            );
            if column.len() != len {
                ferrow_bail!(
                    ShapeMismatch: "record batch requires all its columns to have an equal number of rows; '{}' has {}, expected {}",
                    field.name, column.len(), len
                );
            }
            if !field.is_nullable && column.null_count() > 0 {
                ferrow_bail!(
                    ComputeError: "non-nullable field '{}' holds {} nulls", field.name, column.null_count()
                );
            }
        }
        Ok(Self { schema, columns })
    }

    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[inline]
    pub fn schema_ref(&self) -> &SchemaRef {
        &self.schema
    }

    /// returns the vectors in [`RecordBatchT`]
    pub fn columns(&self) -> &[V] {
        &self.columns
    }

    /// returns the number of rows of every column
    pub fn len(&self) -> usize {
        self.columns
            .first()
            .map(|x| x.as_ref().len())
            .unwrap_or_default()
    }

    /// returns whether the columns have any rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes [`RecordBatchT`] into its underlying columns.
    /// The columns are guaranteed to have the same length
    pub fn into_columns(self) -> Vec<V> {
        self.columns
    }
}

impl<V: AsRef<FixedWidthVector>> std::ops::Deref for RecordBatchT<V> {
    type Target = [V];

    #[inline]
    fn deref(&self) -> &[V] {
        self.columns()
    }
}
