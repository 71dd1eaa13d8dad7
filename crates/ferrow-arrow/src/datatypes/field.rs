use super::DataType;

/// Represents a column of a [`Schema`](super::Schema): a name, a [`DataType`]
/// and whether the column may contain nulls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Its name
    pub name: String,
    /// Its logical [`DataType`]
    pub dtype: DataType,
    /// Its nullability
    pub is_nullable: bool,
}

impl Field {
    /// Creates a new [`Field`].
    pub fn new(name: impl Into<String>, dtype: DataType, is_nullable: bool) -> Self {
        Field {
            name: name.into(),
            dtype,
            is_nullable,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn dtype(&self) -> &DataType {
        &self.dtype
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }
}
