//! Nullable fixed-width columnar vectors and the writers that serialize them.
//!
//! * [`bitmap::ValidityBitmap`] tracks which slots of a vector hold a value.
//! * [`vector::FixedWidthVector`] and its typed view [`vector::PrimitiveVector`] store
//!   `W` bytes per slot next to a validity bitmap.
//! * [`record_batch::RecordBatchT`] binds same-length vectors to a [`datatypes::Schema`].
//! * [`io::ipc::write`] frames record batches onto any [`std::io::Write`] sink, either as a
//!   stream or as a file with a trailing footer.

pub mod bitmap;
pub mod datatypes;
#[cfg(feature = "io_ipc")]
pub mod io;
pub mod record_batch;
pub mod types;
pub mod vector;

pub use ferrow_error::{FerrowError, FerrowResult};
