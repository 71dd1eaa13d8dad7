use ferrow_error::{ferrow_ensure, FerrowResult};

use super::FixedWidthVector;

/// A source and a destination vector of equal width.
///
/// The width check happens once, in [`try_new`](Self::try_new), so the operations on the pair
/// only fail on allocation or range errors.
pub struct TransferPair<'a> {
    from: &'a mut FixedWidthVector,
    to: &'a mut FixedWidthVector,
}

impl<'a> TransferPair<'a> {
    /// # Errors
    /// Errors with `TypeMismatch` iff the vectors differ in width.
    pub fn try_new(from: &'a mut FixedWidthVector, to: &'a mut FixedWidthVector) -> FerrowResult<Self> {
        ferrow_ensure!(from.width == to.width, width = to.width, got = from.width);
        Ok(Self { from, to })
    }

    #[inline]
    pub fn source(&self) -> &FixedWidthVector {
        self.from
    }

    #[inline]
    pub fn to(&self) -> &FixedWidthVector {
        self.to
    }

    /// Moves the buffers of the source into the destination.
    pub fn transfer(&mut self) {
        self.from.move_buffers_to(self.to)
    }

    /// Copies `[start, start + length)` of the source into the destination.
    pub fn split_and_transfer(&mut self, start: usize, length: usize) -> FerrowResult<()> {
        self.from.split_into(start, length, self.to)
    }

    /// Copies slot `from_index` of the source into slot `to_index` of the destination,
    /// growing the destination first. Null source slots are skipped.
    pub fn copy_value_safe(&mut self, from_index: usize, to_index: usize) -> FerrowResult<()> {
        self.to.handle_safe(to_index)?;
        self.to.copy_slot(from_index, to_index, self.from);
        Ok(())
    }
}
