//! General utilities for bitmaps representing items where LSB is the first item.

/// Returns whether bit at position `i` in `byte` is set or not
#[inline]
pub fn is_set(byte: u8, i: usize) -> bool {
    debug_assert!(i < 8);
    byte & (1 << i) != 0
}

/// Sets bit at position `i` in `byte`.
#[inline]
pub fn set(byte: u8, i: usize, value: bool) -> u8 {
    debug_assert!(i < 8);

    let mask = !(1 << i);
    let insert = (value as u8) << i;
    (byte & mask) | insert
}

/// Sets bit at position `i` in `bytes`.
/// # Panics
/// This function panics iff `i >= bytes.len() * 8`.
#[inline]
pub fn set_bit(bytes: &mut [u8], i: usize, value: bool) {
    bytes[i / 8] = set(bytes[i / 8], i % 8, value);
}

/// Returns whether bit at position `i` in `bytes` is set.
/// # Panic
/// This function panics iff `i >= bytes.len() * 8`.
#[inline]
pub fn get_bit(bytes: &[u8], i: usize) -> bool {
    is_set(bytes[i / 8], i % 8)
}

/// Returns the number of bytes required to hold `bits` bits.
#[inline]
pub fn bytes_for(bits: usize) -> usize {
    bits.saturating_add(7) / 8
}

/// Clears every bit at position `>= len` in the last byte that holds bit `len - 1`.
#[inline]
pub fn mask_trailing_bits(bytes: &mut [u8], len: usize) {
    let rem = len % 8;
    if rem != 0 {
        if let Some(last) = bytes.get_mut(len / 8) {
            *last &= (1u8 << rem) - 1;
        }
    }
}

/// Returns the number of zero bits in `slice[0..len]` (in bits).
/// # Panics
/// This function panics iff `len > slice.len() * 8`.
pub fn count_zeros(slice: &[u8], len: usize) -> usize {
    assert!(len <= slice.len() * 8);
    let full = len / 8;
    let mut ones: usize = slice[..full].iter().map(|b| b.count_ones() as usize).sum();
    let rem = len % 8;
    if rem != 0 {
        ones += (slice[full] & ((1u8 << rem) - 1)).count_ones() as usize;
    }
    len - ones
}

/// Copies the bit range `[offset, offset + len)` of `src` into `dst` starting at bit 0.
///
/// `dst` must be at least [`bytes_for`]`(len)` bytes long. Bits of `dst` at positions
/// `>= len` inside the last written byte are cleared.
/// # Panics
/// This function panics iff `offset + len > src.len() * 8` or `dst` is too short.
pub fn copy_bits_to_start(src: &[u8], offset: usize, len: usize, dst: &mut [u8]) {
    if len == 0 {
        return;
    }
    assert!(offset + len <= src.len() * 8);
    let n_bytes = bytes_for(len);
    assert!(dst.len() >= n_bytes);

    let first = offset / 8;
    let shift = offset % 8;
    if shift == 0 {
        dst[..n_bytes].copy_from_slice(&src[first..first + n_bytes]);
    } else {
        // each destination byte straddles two source bytes
        for (j, out) in dst[..n_bytes].iter_mut().enumerate() {
            let low = src[first + j] >> shift;
            let high = src.get(first + j + 1).map_or(0, |b| b << (8 - shift));
            *out = low | high;
        }
    }
    mask_trailing_bits(dst, len);
}
