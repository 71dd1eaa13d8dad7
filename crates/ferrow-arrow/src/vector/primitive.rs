use std::marker::PhantomData;

use ferrow_error::{ferrow_ensure, FerrowError, FerrowResult};

use super::FixedWidthVector;
use crate::datatypes::DataType;
use crate::types::NativeType;

/// A typed view over a [`FixedWidthVector`] whose slots hold values of type `T`.
///
/// The logical type is checked against `T` once at construction; after that every
/// accessor is infallible with respect to types. Converting to and from
/// [`FixedWidthVector`] is `O(1)`.
///
/// # Examples
/// ```
/// use ferrow_arrow::datatypes::{DataType, TimeUnit};
/// use ferrow_arrow::vector::PrimitiveVector;
///
/// let mut v = PrimitiveVector::<i64>::try_new("ts", DataType::Time64(TimeUnit::Microsecond))?;
/// v.set_safe(0, 100)?;
/// v.set_null_safe(1)?;
/// v.set_safe(2, 300)?;
/// assert_eq!(v.iter().collect::<Vec<_>>(), vec![Some(100), None, Some(300)]);
/// # Ok::<(), ferrow_error::FerrowError>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct PrimitiveVector<T: NativeType> {
    inner: FixedWidthVector,
    phantom: PhantomData<T>,
}

pub type Int8Vector = PrimitiveVector<i8>;
pub type Int16Vector = PrimitiveVector<i16>;
pub type Int32Vector = PrimitiveVector<i32>;
pub type Int64Vector = PrimitiveVector<i64>;
pub type UInt8Vector = PrimitiveVector<u8>;
pub type UInt16Vector = PrimitiveVector<u16>;
pub type UInt32Vector = PrimitiveVector<u32>;
pub type UInt64Vector = PrimitiveVector<u64>;
pub type Float32Vector = PrimitiveVector<f32>;
pub type Float64Vector = PrimitiveVector<f64>;

fn check_dtype<T: NativeType>(dtype: &DataType) -> FerrowResult<()> {
    dtype.try_check()?;
    ferrow_ensure!(
        dtype.to_physical_type().eq_primitive(T::PRIMITIVE),
        TypeMismatch: "a vector of {:?} cannot hold values of type {}", dtype, std::any::type_name::<T>()
    );
    Ok(())
}

impl<T: NativeType> PrimitiveVector<T> {
    /// Creates an empty vector whose logical type is the default one for `T`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: FixedWidthVector::new(name, T::PRIMITIVE.into()),
            phantom: PhantomData,
        }
    }

    /// Creates an empty vector of logical type `dtype`.
    ///
    /// # Errors
    /// Errors with `TypeMismatch` iff `dtype` is not physically represented by `T`, and
    /// with `ComputeError` iff `dtype` fails [`DataType::try_check`].
    pub fn try_new(name: impl Into<String>, dtype: DataType) -> FerrowResult<Self> {
        check_dtype::<T>(&dtype)?;
        Ok(Self {
            inner: FixedWidthVector::new(name, dtype),
            phantom: PhantomData,
        })
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> FerrowResult<Self> {
        let mut out = Self::new(name);
        out.reallocate_exact(capacity)?;
        Ok(out)
    }

    /// Creates a vector holding `values`, all valid.
    pub fn from_slice(name: impl Into<String>, values: &[T]) -> FerrowResult<Self> {
        let mut out = Self::with_capacity(name, values.len())?;
        if cfg!(target_endian = "little") {
            // in native endianness we can use the bytes directly.
            out.inner.values.copy_from_slice(bytemuck::cast_slice(values));
            for i in 0..values.len() {
                out.inner.validity.set_valid(i);
            }
            out.inner.value_count = values.len();
        } else {
            for (i, value) in values.iter().enumerate() {
                out.set(i, *value);
            }
        }
        Ok(out)
    }

    /// Creates a vector from optional values, `None` becoming null.
    pub fn from_options(name: impl Into<String>, values: &[Option<T>]) -> FerrowResult<Self> {
        let mut out = Self::with_capacity(name, values.len())?;
        for (i, value) in values.iter().enumerate() {
            out.set_from_nullable(i, *value);
        }
        Ok(out)
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    #[inline]
    pub fn dtype(&self) -> &DataType {
        self.inner.dtype()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn null_count(&self) -> usize {
        self.inner.null_count()
    }

    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        self.inner.is_null(index)
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    /// Errors with `NullValue` iff the slot is null.
    #[inline]
    pub fn get(&self, index: usize) -> FerrowResult<T> {
        self.inner.get(index).map(T::from_le_slice)
    }

    /// Returns the value at `index`, or `None` if the slot is null.
    #[inline]
    pub fn get_nullable(&self, index: usize) -> Option<T> {
        self.inner.get_nullable(index).map(T::from_le_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        (0..self.len()).map(|i| self.get_nullable(i))
    }

    /// Iterator over the values, reading nulls as whatever bytes their slots hold.
    pub fn values_iter(&self) -> impl Iterator<Item = T> + '_ {
        self.inner
            .value_bytes()
            .chunks_exact(std::mem::size_of::<T>())
            .map(T::from_le_slice)
    }

    /// # Panics
    /// Panics iff `index >= self.capacity()`; see [`set_safe`](Self::set_safe).
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        self.inner.write_value(index, value.to_le_bytes().as_ref());
    }

    pub fn set_safe(&mut self, index: usize, value: T) -> FerrowResult<()> {
        self.inner.handle_safe(index)?;
        self.set(index, value);
        Ok(())
    }

    /// # Panics
    /// Panics iff `index >= self.capacity()`.
    #[inline]
    pub fn set_null(&mut self, index: usize) {
        self.inner.set_null(index)
    }

    pub fn set_null_safe(&mut self, index: usize) -> FerrowResult<()> {
        self.inner.set_null_safe(index)
    }

    /// Sets slot `index` to `value`, or to null when `value` is `None`.
    /// # Panics
    /// Panics iff `index >= self.capacity()`.
    pub fn set_from_nullable(&mut self, index: usize, value: Option<T>) {
        match value {
            Some(value) => self.set(index, value),
            None => self.set_null(index),
        }
    }

    pub fn set_from_nullable_safe(&mut self, index: usize, value: Option<T>) -> FerrowResult<()> {
        self.inner.handle_safe(index)?;
        self.set_from_nullable(index, value);
        Ok(())
    }

    /// Copies slot `from_index` of `source` into slot `to_index` if the source slot is valid.
    /// A null source slot leaves the destination untouched.
    /// # Panics
    /// Panics iff `to_index >= self.capacity()`.
    pub fn copy_from(&mut self, from_index: usize, to_index: usize, source: &Self) {
        self.inner.copy_slot(from_index, to_index, &source.inner)
    }

    pub fn copy_from_safe(
        &mut self,
        from_index: usize,
        to_index: usize,
        source: &Self,
    ) -> FerrowResult<()> {
        self.inner.handle_safe(to_index)?;
        self.copy_from(from_index, to_index, source);
        Ok(())
    }

    /// Moves the buffers of `self` into `to`. See [`FixedWidthVector::transfer_to`].
    pub fn transfer_to(&mut self, to: &mut Self) {
        self.inner.move_buffers_to(&mut to.inner)
    }

    /// Copies `[start, start + length)` into `to`. See [`FixedWidthVector::split_and_transfer`].
    pub fn split_and_transfer(
        &self,
        start: usize,
        length: usize,
        to: &mut Self,
    ) -> FerrowResult<()> {
        self.inner.split_into(start, length, &mut to.inner)
    }

    pub fn reallocate_exact(&mut self, capacity: usize) -> FerrowResult<()> {
        self.inner.reallocate_exact(capacity)
    }

    pub fn allocate_new(&mut self) -> FerrowResult<()> {
        self.inner.allocate_new()
    }

    pub fn set_value_count(&mut self, value_count: usize) -> FerrowResult<()> {
        self.inner.set_value_count(value_count)
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    #[inline]
    pub fn as_vector(&self) -> &FixedWidthVector {
        &self.inner
    }

    #[inline]
    pub fn into_vector(self) -> FixedWidthVector {
        self.inner
    }
}

impl<T: NativeType> TryFrom<FixedWidthVector> for PrimitiveVector<T> {
    type Error = FerrowError;

    fn try_from(inner: FixedWidthVector) -> FerrowResult<Self> {
        check_dtype::<T>(inner.dtype())?;
        Ok(Self {
            inner,
            phantom: PhantomData,
        })
    }
}

impl<T: NativeType> From<PrimitiveVector<T>> for FixedWidthVector {
    fn from(value: PrimitiveVector<T>) -> Self {
        value.inner
    }
}

impl<T: NativeType> AsRef<FixedWidthVector> for PrimitiveVector<T> {
    fn as_ref(&self) -> &FixedWidthVector {
        &self.inner
    }
}
