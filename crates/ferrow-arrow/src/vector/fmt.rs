use std::fmt::{Debug, Formatter, Result, Write};

use super::{FixedWidthVector, PrimitiveVector};
use crate::datatypes::{DataType, PhysicalType, TimeUnit};
use crate::types::{NativeType, PrimitiveType};

/// Returns a function that writes the bytes of one slot of `vector` to a
/// formatter, decoded according to the vector's logical type.
fn get_write_value<'a, F: Write + 'a>(
    vector: &FixedWidthVector,
) -> Box<dyn Fn(&mut F, &[u8]) -> Result + 'a> {
    fn decoded<T: NativeType, F: Write>(f: &mut F, bytes: &[u8]) -> Result {
        write!(f, "{:?}", T::from_le_slice(bytes))
    }

    use DataType::*;
    match vector.dtype() {
        Decimal(_, scale) => {
            let scale = *scale as u32;
            Box::new(move |f: &mut F, bytes: &[u8]| {
                let value = i128::from_le_slice(bytes);
                let factor = match 10i128.checked_pow(scale) {
                    Some(factor) if scale > 0 => factor,
                    _ => return write!(f, "{value}"),
                };
                let fraction = (value % factor).unsigned_abs();
                let sign = if value < 0 && value / factor == 0 { "-" } else { "" };
                write!(
                    f,
                    "{sign}{}.{fraction:0width$}",
                    value / factor,
                    width = scale as usize
                )
            })
        },
        Time32(unit) | Time64(unit) | Timestamp(unit) | Duration(unit) => {
            let suffix = match unit {
                TimeUnit::Second => "s",
                TimeUnit::Millisecond => "ms",
                TimeUnit::Microsecond => "us",
                TimeUnit::Nanosecond => "ns",
            };
            if vector.width() == 4 {
                Box::new(move |f: &mut F, bytes: &[u8]| write!(f, "{}{suffix}", i32::from_le_slice(bytes)))
            } else {
                Box::new(move |f: &mut F, bytes: &[u8]| write!(f, "{}{suffix}", i64::from_le_slice(bytes)))
            }
        },
        dtype => match dtype.to_physical_type() {
            PhysicalType::Primitive(primitive) => match primitive {
                PrimitiveType::Int8 => Box::new(decoded::<i8, F>),
                PrimitiveType::Int16 => Box::new(decoded::<i16, F>),
                PrimitiveType::Int32 => Box::new(decoded::<i32, F>),
                PrimitiveType::Int64 => Box::new(decoded::<i64, F>),
                PrimitiveType::Int128 => Box::new(decoded::<i128, F>),
                PrimitiveType::UInt8 => Box::new(decoded::<u8, F>),
                PrimitiveType::UInt16 => Box::new(decoded::<u16, F>),
                PrimitiveType::UInt32 => Box::new(decoded::<u32, F>),
                PrimitiveType::UInt64 => Box::new(decoded::<u64, F>),
                PrimitiveType::Float32 => Box::new(decoded::<f32, F>),
                PrimitiveType::Float64 => Box::new(decoded::<f64, F>),
            },
            PhysicalType::FixedSizeBinary(_) => Box::new(|f: &mut F, bytes: &[u8]| {
                f.write_str("0x")?;
                bytes.iter().try_for_each(|b| write!(f, "{b:02x}"))
            }),
        },
    }
}

impl Debug for FixedWidthVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let writer = get_write_value(self);
        write!(f, "{:?} '{}' [", self.dtype(), self.name())?;
        for (i, slot) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(bytes) => writer(f, bytes)?,
                None => f.write_str("None")?,
            }
        }
        f.write_char(']')
    }
}

impl<T: NativeType> Debug for PrimitiveVector<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Debug::fmt(self.as_vector(), f)
    }
}
