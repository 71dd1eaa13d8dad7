//! Nullable fixed-width vectors.
//!
//! A vector owns two buffers: a [`ValidityBitmap`] and a value buffer holding `W` bytes per
//! slot. [`FixedWidthVector`] is width-erased and works on byte slices, which lets a single
//! implementation serve every logical type. [`PrimitiveVector`] is its typed counterpart.
//!
//! Mutating calls come in two flavours:
//! * `set`, `set_null`, `copy_from`, ... assume the slot is within [`capacity`](FixedWidthVector::capacity)
//!   and panic otherwise.
//! * `*_safe` variants first grow both buffers so the slot fits, then perform the plain call.
//!
//! Growth reallocates both buffers. Slices previously borrowed from a vector cannot outlive a
//! mutable call, so a stale buffer is never observable.
mod fmt;
mod primitive;
mod transfer;

use ferrow_error::{ferrow_bail, ferrow_ensure, ferrow_err, FerrowResult};
pub use primitive::*;
pub use transfer::TransferPair;

use crate::bitmap::ValidityBitmap;
use crate::datatypes::{DataType, Field};

/// Number of slots [`FixedWidthVector::allocate_new`] reserves unless told otherwise.
pub const INITIAL_VALUE_ALLOCATION: usize = 4096;

/// Returns the capacity a vector grows to so that slot `index` fits: the smallest power of
/// two that is at least `index + 1`.
#[inline]
pub fn grown_capacity(index: usize) -> FerrowResult<usize> {
    index
        .checked_add(1)
        .and_then(usize::checked_next_power_of_two)
        .ok_or_else(|| ferrow_err!(OutOfMemory: "cannot grow vector to hold index {}", index))
}

/// A nullable vector whose slots are all `width` bytes wide.
#[derive(Clone)]
pub struct FixedWidthVector {
    name: String,
    dtype: DataType,
    width: usize,
    validity: ValidityBitmap,
    /// `capacity * width` bytes, little-endian encoded values.
    values: Vec<u8>,
    value_count: usize,
    capacity: usize,
    initial_capacity: usize,
}

impl FixedWidthVector {
    /// Creates an empty vector. No memory is allocated until a slot is written or
    /// [`allocate_new`](Self::allocate_new) is called.
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        let width = dtype.byte_width();
        Self {
            name: name.into(),
            dtype,
            width,
            validity: ValidityBitmap::new(),
            values: Vec::new(),
            value_count: 0,
            capacity: 0,
            initial_capacity: INITIAL_VALUE_ALLOCATION,
        }
    }

    /// Same as [`new`](Self::new), rejecting invalid parameterized types.
    ///
    /// # Errors
    /// `ComputeError` iff `dtype` fails [`DataType::try_check`].
    pub fn try_new(name: impl Into<String>, dtype: DataType) -> FerrowResult<Self> {
        dtype.try_check()?;
        Ok(Self::new(name, dtype))
    }

    /// Creates an empty vector with room for exactly `capacity` slots.
    pub fn with_capacity(
        name: impl Into<String>,
        dtype: DataType,
        capacity: usize,
    ) -> FerrowResult<Self> {
        let mut out = Self::try_new(name, dtype)?;
        out.reallocate_exact(capacity)?;
        Ok(out)
    }

    /// Creates an empty vector with the same name and type as `self`.
    pub fn new_like(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.dtype.clone())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn dtype(&self) -> &DataType {
        &self.dtype
    }

    /// Size in bytes of one slot.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// A nullable [`Field`] describing this vector.
    pub fn field(&self) -> Field {
        Field::new(self.name.clone(), self.dtype.clone(), true)
    }

    /// The number of slots that are logically part of this vector: one past the highest
    /// index written.
    #[inline]
    pub fn len(&self) -> usize {
        self.value_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value_count == 0
    }

    /// The number of slots allocated.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn validity(&self) -> &ValidityBitmap {
        &self.validity
    }

    /// The value bytes of the first [`len`](Self::len) slots. Null slots hold unspecified bytes.
    #[inline]
    pub fn value_bytes(&self) -> &[u8] {
        &self.values[..self.value_count * self.width]
    }

    pub fn null_count(&self) -> usize {
        self.validity.unset_bits(self.value_count)
    }

    /// Whether slot `index` holds a value. Slots past the capacity are never valid.
    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        index < self.capacity && self.validity.get(index)
    }

    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        !self.is_valid(index)
    }

    #[inline]
    fn slot(&self, index: usize) -> &[u8] {
        &self.values[index * self.width..(index + 1) * self.width]
    }

    #[inline]
    fn check_width(&self, width: usize) -> FerrowResult<()> {
        ferrow_ensure!(self.width == width, width = self.width, got = width);
        Ok(())
    }

    /// Returns the bytes of slot `index`.
    ///
    /// # Errors
    /// Errors with `NullValue` iff the slot is null.
    pub fn get(&self, index: usize) -> FerrowResult<&[u8]> {
        match self.get_nullable(index) {
            Some(bytes) => Ok(bytes),
            None => ferrow_bail!(NullValue: "value at index {} of '{}' is null", index, self.name),
        }
    }

    /// Returns the bytes of slot `index`, or `None` if it is null.
    #[inline]
    pub fn get_nullable(&self, index: usize) -> Option<&[u8]> {
        self.is_valid(index).then(|| self.slot(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&[u8]>> + '_ {
        (0..self.value_count).map(|i| self.get_nullable(i))
    }

    /// Writes `value` into slot `index` and marks it valid.
    /// The value bytes are written before the validity bit so a panic leaves the bit untouched.
    #[inline]
    pub(crate) fn write_value(&mut self, index: usize, value: &[u8]) {
        assert!(
            index < self.capacity,
            "index {index} is out of capacity {} of '{}'",
            self.capacity,
            self.name
        );
        debug_assert_eq!(value.len(), self.width);
        self.values[index * self.width..(index + 1) * self.width].copy_from_slice(value);
        self.validity.set_valid(index);
        self.value_count = self.value_count.max(index + 1);
    }

    /// Sets slot `index` to `value`.
    ///
    /// # Errors
    /// Errors with `TypeMismatch` iff `value.len() != self.width()`.
    /// # Panics
    /// Panics iff `index >= self.capacity()`; see [`set_safe`](Self::set_safe).
    pub fn set(&mut self, index: usize, value: &[u8]) -> FerrowResult<()> {
        self.check_width(value.len())?;
        self.write_value(index, value);
        Ok(())
    }

    /// Same as [`set`](Self::set), growing the buffers first if `index` is past the capacity.
    pub fn set_safe(&mut self, index: usize, value: &[u8]) -> FerrowResult<()> {
        self.check_width(value.len())?;
        self.handle_safe(index)?;
        self.write_value(index, value);
        Ok(())
    }

    /// Marks slot `index` as null. The value bytes are left in place.
    /// # Panics
    /// Panics iff `index >= self.capacity()`.
    pub fn set_null(&mut self, index: usize) {
        assert!(
            index < self.capacity,
            "index {index} is out of capacity {} of '{}'",
            self.capacity,
            self.name
        );
        self.validity.set_null(index);
        self.value_count = self.value_count.max(index + 1);
    }

    pub fn set_null_safe(&mut self, index: usize) -> FerrowResult<()> {
        self.handle_safe(index)?;
        self.set_null(index);
        Ok(())
    }

    /// Sets slot `index` to `value`, or to null when `value` is `None`.
    pub fn set_from_nullable(&mut self, index: usize, value: Option<&[u8]>) -> FerrowResult<()> {
        match value {
            Some(value) => self.set(index, value),
            None => {
                self.set_null(index);
                Ok(())
            },
        }
    }

    pub fn set_from_nullable_safe(
        &mut self,
        index: usize,
        value: Option<&[u8]>,
    ) -> FerrowResult<()> {
        if let Some(value) = value {
            self.check_width(value.len())?;
        }
        self.handle_safe(index)?;
        self.set_from_nullable(index, value)
    }

    #[inline]
    pub(crate) fn copy_slot(&mut self, from_index: usize, to_index: usize, source: &Self) {
        if let Some(value) = source.get_nullable(from_index) {
            self.write_value(to_index, value);
        }
    }

    /// Copies slot `from_index` of `source` into slot `to_index` of `self` if the source slot
    /// is valid. A null source slot leaves the destination slot untouched.
    ///
    /// # Errors
    /// Errors with `TypeMismatch` iff the vectors differ in width.
    /// # Panics
    /// Panics iff `to_index >= self.capacity()`.
    pub fn copy_from(
        &mut self,
        from_index: usize,
        to_index: usize,
        source: &Self,
    ) -> FerrowResult<()> {
        self.check_width(source.width)?;
        self.copy_slot(from_index, to_index, source);
        Ok(())
    }

    pub fn copy_from_safe(
        &mut self,
        from_index: usize,
        to_index: usize,
        source: &Self,
    ) -> FerrowResult<()> {
        self.check_width(source.width)?;
        self.handle_safe(to_index)?;
        self.copy_slot(from_index, to_index, source);
        Ok(())
    }

    pub(crate) fn move_buffers_to(&mut self, to: &mut Self) {
        to.validity = std::mem::take(&mut self.validity);
        to.values = std::mem::take(&mut self.values);
        to.value_count = std::mem::take(&mut self.value_count);
        to.capacity = std::mem::take(&mut self.capacity);
    }

    /// Moves both buffers and the value count into `to`, whose previous buffers are released.
    /// `self` is left empty with zero capacity. No bytes are copied.
    ///
    /// # Errors
    /// Errors with `TypeMismatch` iff the vectors differ in width.
    pub fn transfer_to(&mut self, to: &mut Self) -> FerrowResult<()> {
        self.check_width(to.width)?;
        self.move_buffers_to(to);
        Ok(())
    }

    pub(crate) fn split_into(&self, start: usize, length: usize, to: &mut Self) -> FerrowResult<()> {
        let end = start.checked_add(length).ok_or_else(
            || ferrow_err!(OutOfBounds: "split range starting at {} overflows", start),
        )?;
        ferrow_ensure!(
            end <= self.value_count,
            OutOfBounds: "cannot split [{}, {}) out of '{}' with {} values", start, end, self.name, self.value_count
        );

        let validity = self.validity.sliced_repacked(start, length)?;
        let mut values = Vec::new();
        values.try_reserve_exact(length * self.width)?;
        values.extend_from_slice(&self.values[start * self.width..end * self.width]);

        to.validity = validity;
        to.values = values;
        to.value_count = length;
        to.capacity = length;
        Ok(())
    }

    /// Copies slots `[start, start + length)` into freshly allocated buffers of `to`, whose
    /// previous buffers are released. Validity bits are re-packed to start at bit 0. `self`
    /// keeps its data.
    ///
    /// # Errors
    /// Errors with `TypeMismatch` iff the vectors differ in width and with `OutOfBounds` iff the
    /// range extends past [`len`](Self::len). On error `to` is unchanged.
    pub fn split_and_transfer(
        &self,
        start: usize,
        length: usize,
        to: &mut Self,
    ) -> FerrowResult<()> {
        self.check_width(to.width)?;
        self.split_into(start, length, to)
    }

    #[inline]
    fn handle_safe(&mut self, index: usize) -> FerrowResult<()> {
        if index >= self.capacity {
            self.reallocate_exact(grown_capacity(index)?)?;
        }
        Ok(())
    }

    /// Grows both buffers to hold exactly `capacity` slots, preserving existing slots. New
    /// slots are null and zeroed. Does nothing if the vector already holds `capacity` slots.
    ///
    /// # Errors
    /// Errors with `OutOfMemory` if either buffer cannot be grown; the vector is then unchanged.
    pub fn reallocate_exact(&mut self, capacity: usize) -> FerrowResult<()> {
        if capacity <= self.capacity {
            return Ok(());
        }
        let new_len = capacity.checked_mul(self.width).ok_or_else(
            || ferrow_err!(OutOfMemory: "{} slots of {} bytes overflow", capacity, self.width),
        )?;
        // reserve first: a failure must not leave the buffers out of sync
        self.values.try_reserve_exact(new_len - self.values.len())?;
        self.validity.ensure_capacity(capacity)?;
        self.values.resize(new_len, 0);

        tracing::trace!(
            vector = %self.name,
            width = self.width,
            old_capacity = self.capacity,
            new_capacity = capacity,
            "grew vector"
        );
        self.capacity = capacity;
        Ok(())
    }

    /// Sets the capacity used by the next [`allocate_new`](Self::allocate_new).
    pub fn set_initial_capacity(&mut self, capacity: usize) {
        self.initial_capacity = capacity;
    }

    /// Releases the current buffers and allocates zeroed buffers for the initial capacity
    /// ([`INITIAL_VALUE_ALLOCATION`] unless changed with
    /// [`set_initial_capacity`](Self::set_initial_capacity)).
    pub fn allocate_new(&mut self) -> FerrowResult<()> {
        self.allocate_new_with(self.initial_capacity)
    }

    pub fn allocate_new_with(&mut self, capacity: usize) -> FerrowResult<()> {
        self.clear();
        self.reallocate_exact(capacity)
    }

    /// Sets the logical length, growing the buffers if `value_count` exceeds the capacity.
    /// Shrinking clears the validity of the dropped slots so they read as null if the length
    /// grows again.
    pub fn set_value_count(&mut self, value_count: usize) -> FerrowResult<()> {
        if value_count > 0 {
            self.handle_safe(value_count - 1)?;
        }
        for i in value_count..self.value_count {
            self.validity.set_null(i);
        }
        self.value_count = value_count;
        Ok(())
    }

    /// Releases both buffers.
    pub fn clear(&mut self) {
        self.validity.clear();
        self.values = Vec::new();
        self.value_count = 0;
        self.capacity = 0;
    }
}

impl AsRef<FixedWidthVector> for FixedWidthVector {
    fn as_ref(&self) -> &FixedWidthVector {
        self
    }
}

impl PartialEq for FixedWidthVector {
    /// Logical equality: same type, same length and the same value or null in every slot.
    fn eq(&self, other: &Self) -> bool {
        self.dtype == other.dtype && self.len() == other.len() && self.iter().eq(other.iter())
    }
}
