//! Bit-packed validity tracking for vectors.
pub mod utils;

use std::fmt::{Debug, Formatter};

use ferrow_error::FerrowResult;

use self::utils::{bytes_for, copy_bits_to_start, count_zeros, get_bit, set_bit};

/// A growable, index-addressed bitmap where bit `i` (bit `i % 8` of byte `i / 8`)
/// records whether slot `i` holds a value (`true`) or is null (`false`).
///
/// Unlike a push-based builder, slots are written in any order. Newly added bits are
/// always zero, so every slot is null until explicitly set.
///
/// # Implementation
/// [`get`](Self::get), [`set_valid`](Self::set_valid) and [`set_null`](Self::set_null) do
/// not grow the bitmap. The owning vector calls [`ensure_capacity`](Self::ensure_capacity)
/// once per safe mutation instead of checking on every bit.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ValidityBitmap {
    buffer: Vec<u8>,
}

impl ValidityBitmap {
    /// Creates an empty bitmap without allocating.
    #[inline]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates a bitmap able to hold `bits` bits, all unset.
    pub fn with_capacity(bits: usize) -> FerrowResult<Self> {
        let mut bitmap = Self::new();
        bitmap.ensure_capacity(bits)?;
        Ok(bitmap)
    }

    /// Creates a bitmap from its packed bytes.
    pub fn from_vec(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }

    /// Number of bits the bitmap can address without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len() * 8
    }

    /// Returns whether slot `index` is valid.
    /// # Panics
    /// Panics iff `index >= self.capacity()`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        get_bit(&self.buffer, index)
    }

    /// Marks slot `index` as holding a value.
    /// # Panics
    /// Panics iff `index >= self.capacity()`.
    #[inline]
    pub fn set_valid(&mut self, index: usize) {
        set_bit(&mut self.buffer, index, true)
    }

    /// Marks slot `index` as null.
    /// # Panics
    /// Panics iff `index >= self.capacity()`.
    #[inline]
    pub fn set_null(&mut self, index: usize) {
        set_bit(&mut self.buffer, index, false)
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        set_bit(&mut self.buffer, index, value)
    }

    /// Grows the bitmap to hold at least `bits` bits. New bytes are zeroed.
    ///
    /// On allocation failure the bitmap is left unchanged.
    pub fn ensure_capacity(&mut self, bits: usize) -> FerrowResult<()> {
        let needed = bytes_for(bits);
        if needed > self.buffer.len() {
            self.buffer.try_reserve_exact(needed - self.buffer.len())?;
            self.buffer.resize(needed, 0);
        }
        Ok(())
    }

    /// The packed bytes of this bitmap.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of unset bits among the first `len` bits.
    /// # Panics
    /// Panics iff `len > self.capacity()`.
    pub fn unset_bits(&self, len: usize) -> usize {
        count_zeros(&self.buffer, len)
    }

    /// Returns a new bitmap holding the bits `[offset, offset + len)` of `self`,
    /// re-packed to start at bit 0.
    /// # Panics
    /// Panics iff `offset + len > self.capacity()`.
    pub fn sliced_repacked(&self, offset: usize, len: usize) -> FerrowResult<Self> {
        let mut out = Self::with_capacity(len)?;
        copy_bits_to_start(&self.buffer, offset, len, &mut out.buffer);
        Ok(out)
    }

    /// Releases the underlying buffer.
    pub fn clear(&mut self) {
        self.buffer = Vec::new();
    }

    /// Iterator over the first `len` bits.
    pub fn iter(&self, len: usize) -> impl Iterator<Item = bool> + '_ {
        assert!(len <= self.capacity());
        (0..len).map(move |i| self.get(i))
    }
}

impl Debug for ValidityBitmap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValidityBitmap {{ capacity: {}, bits: [", self.capacity())?;
        for (i, byte) in self.buffer.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:08b}")?;
        }
        write!(f, "] }}")
    }
}
