//! Sealed traits and implementations to handle all _physical types_ used in this crate.
//!
//! Most physical types used in this crate are native Rust types, such as `i32`.
//! The trait [`NativeType`] describes the interfaces required by this crate to be conformant
//! with the columnar layout: every value is stored as its little-endian byte representation,
//! `size_of::<T>()` bytes per slot.
use std::fmt::Debug;

use bytemuck::Pod;

/// The set of all implementations of the sealed trait [`NativeType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl PrimitiveType {
    /// Number of bytes a single value of this type occupies.
    pub const fn byte_width(&self) -> usize {
        use PrimitiveType::*;
        match self {
            Int8 | UInt8 => 1,
            Int16 | UInt16 => 2,
            Int32 | UInt32 | Float32 => 4,
            Int64 | UInt64 | Float64 => 8,
            Int128 => 16,
        }
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for i128 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Sealed trait implemented by all physical types that can be stored in a
/// [`PrimitiveVector`](crate::vector::PrimitiveVector).
///
/// All values are encoded little-endian regardless of the host.
pub trait NativeType:
    private::Sealed + Pod + Send + Sync + Sized + Debug + PartialEq + Default + 'static
{
    /// The corresponding variant of [`PrimitiveType`].
    const PRIMITIVE: PrimitiveType;

    /// Type denoting its representation as bytes.
    /// This is `[u8; N]` where `N = size_of::<T>`.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default + Copy + Debug;

    /// To bytes in little endian
    fn to_le_bytes(&self) -> Self::Bytes;

    /// From bytes in little endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Decodes a value from a slice of exactly `size_of::<Self>()` bytes.
    ///
    /// # Panics
    /// Panics iff `bytes.len() != size_of::<Self>()`.
    #[inline]
    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut buf = Self::Bytes::default();
        buf.as_mut().copy_from_slice(bytes);
        Self::from_le_bytes(buf)
    }
}

macro_rules! native_type {
    ($type:ty, $primitive_type:expr) => {
        impl NativeType for $type {
            const PRIMITIVE: PrimitiveType = $primitive_type;

            type Bytes = [u8; std::mem::size_of::<Self>()];

            #[inline]
            fn to_le_bytes(&self) -> Self::Bytes {
                Self::to_le_bytes(*self)
            }

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }
        }
    };
}

native_type!(u8, PrimitiveType::UInt8);
native_type!(u16, PrimitiveType::UInt16);
native_type!(u32, PrimitiveType::UInt32);
native_type!(u64, PrimitiveType::UInt64);
native_type!(i8, PrimitiveType::Int8);
native_type!(i16, PrimitiveType::Int16);
native_type!(i32, PrimitiveType::Int32);
native_type!(i64, PrimitiveType::Int64);
native_type!(i128, PrimitiveType::Int128);
native_type!(f32, PrimitiveType::Float32);
native_type!(f64, PrimitiveType::Float64);
