use std::sync::Arc;

use ferrow_error::{ferrow_bail, ferrow_ensure, FerrowResult};

use super::Field;

/// An ordered sequence of [`Field`]s.
///
/// Field order is significant: columns of a record batch are matched to fields by
/// position, never by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

pub type SchemaRef = Arc<Schema>;

impl Schema {
    /// Creates a new [`Schema`].
    ///
    /// # Errors
    /// Errors iff a field name is empty or appears more than once, or a field's
    /// [`DataType`](super::DataType) fails [`try_check`](super::DataType::try_check).
    pub fn try_new(fields: Vec<Field>) -> FerrowResult<Self> {
        for (i, field) in fields.iter().enumerate() {
            field.dtype.try_check()?;
            ferrow_ensure!(
                !field.name.is_empty(),
                ComputeError: "field at position {} has an empty name", i
            );
            if fields[..i].iter().any(|f| f.name == field.name) {
                ferrow_bail!(ComputeError: "duplicate field name '{}' in schema", field.name);
            }
        }
        Ok(Self { fields })
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Checks that `other` has the same number of fields, in the same order, with the
    /// same physical layout (and therefore byte width) per field as `self`.
    /// Names and nullability are not compared.
    pub fn ensure_structurally_equal(&self, other: &Schema) -> FerrowResult<()> {
        ferrow_ensure!(
            self.len() == other.len(),
            SchemaMismatch: "expected {} fields, got {}", self.len(), other.len()
        );
        for (i, (lhs, rhs)) in self.fields.iter().zip(other.fields.iter()).enumerate() {
            ferrow_ensure!(
                lhs.dtype.to_physical_type() == rhs.dtype.to_physical_type(),
                SchemaMismatch: "field {} ('{}'): expected {:?}, got {:?}", i, lhs.name, lhs.dtype, rhs.dtype
            );
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
