//! Contains all metadata, such as [`PhysicalType`], [`DataType`], [`Field`] and [`Schema`].
mod field;
mod schema;

pub use field::Field;
pub use schema::{Schema, SchemaRef};

use ferrow_error::{ferrow_ensure, FerrowResult};

use crate::types::PrimitiveType;

/// Largest decimal precision an `i128` can hold.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// The time units defined in Arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Time in seconds.
    Second,
    /// Time in milliseconds.
    Millisecond,
    /// Time in microseconds.
    Microsecond,
    /// Time in nanoseconds.
    Nanosecond,
}

/// The logical type of a fixed-width vector.
///
/// Every variant has a constant byte width per slot; variable-width and nested
/// layouts are not represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Days since the UNIX epoch, stored as `i32`.
    Date32,
    /// Milliseconds since the UNIX epoch, stored as `i64`.
    Date64,
    /// Time since midnight in seconds or milliseconds, stored as `i32`.
    Time32(TimeUnit),
    /// Time since midnight in microseconds or nanoseconds, stored as `i64`.
    Time64(TimeUnit),
    /// Time elapsed since the UNIX epoch, stored as `i64`.
    Timestamp(TimeUnit),
    /// Elapsed time, stored as `i64`.
    Duration(TimeUnit),
    /// Decimal value with precision and scale, stored as `i128`.
    Decimal(u8, u8),
    /// Opaque binary values of exactly `n` bytes each.
    FixedSizeBinary(usize),
}

/// The physical layout of a [`DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Primitive(PrimitiveType),
    FixedSizeBinary(usize),
}

impl PhysicalType {
    /// Whether this physical type equals [`PhysicalType::Primitive`] of type `primitive`.
    pub fn eq_primitive(&self, primitive: PrimitiveType) -> bool {
        matches!(self, Self::Primitive(p) if *p == primitive)
    }
}

impl DataType {
    /// the [`PhysicalType`] of this [`DataType`].
    pub fn to_physical_type(&self) -> PhysicalType {
        use DataType::*;
        use PrimitiveType as P;
        match self {
            Int8 => PhysicalType::Primitive(P::Int8),
            Int16 => PhysicalType::Primitive(P::Int16),
            Int32 | Date32 | Time32(_) => PhysicalType::Primitive(P::Int32),
            Int64 | Date64 | Time64(_) | Timestamp(_) | Duration(_) => {
                PhysicalType::Primitive(P::Int64)
            },
            UInt8 => PhysicalType::Primitive(P::UInt8),
            UInt16 => PhysicalType::Primitive(P::UInt16),
            UInt32 => PhysicalType::Primitive(P::UInt32),
            UInt64 => PhysicalType::Primitive(P::UInt64),
            Float32 => PhysicalType::Primitive(P::Float32),
            Float64 => PhysicalType::Primitive(P::Float64),
            Decimal(_, _) => PhysicalType::Primitive(P::Int128),
            FixedSizeBinary(size) => PhysicalType::FixedSizeBinary(*size),
        }
    }

    /// Checks the parameters of parameterized types.
    ///
    /// # Errors
    /// `ComputeError` iff a decimal's precision exceeds [`MAX_DECIMAL_PRECISION`] or its
    /// scale exceeds its precision.
    pub fn try_check(&self) -> FerrowResult<()> {
        if let DataType::Decimal(precision, scale) = self {
            ferrow_ensure!(
                *precision <= MAX_DECIMAL_PRECISION && scale <= precision,
                ComputeError: "invalid Decimal({}, {}): precision must be at most {} and scale at most the precision",
                precision, scale, MAX_DECIMAL_PRECISION
            );
        }
        Ok(())
    }

    /// Number of bytes one slot of this type occupies in the value buffer.
    pub fn byte_width(&self) -> usize {
        match self.to_physical_type() {
            PhysicalType::Primitive(primitive) => primitive.byte_width(),
            PhysicalType::FixedSizeBinary(size) => size,
        }
    }
}

impl From<PrimitiveType> for DataType {
    fn from(item: PrimitiveType) -> Self {
        match item {
            PrimitiveType::Int8 => DataType::Int8,
            PrimitiveType::Int16 => DataType::Int16,
            PrimitiveType::Int32 => DataType::Int32,
            PrimitiveType::Int64 => DataType::Int64,
            PrimitiveType::Int128 => DataType::Decimal(38, 0),
            PrimitiveType::UInt8 => DataType::UInt8,
            PrimitiveType::UInt16 => DataType::UInt16,
            PrimitiveType::UInt32 => DataType::UInt32,
            PrimitiveType::UInt64 => DataType::UInt64,
            PrimitiveType::Float32 => DataType::Float32,
            PrimitiveType::Float64 => DataType::Float64,
        }
    }
}
