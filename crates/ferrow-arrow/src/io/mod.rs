//! Contains modules to interface with other formats.
#[cfg(feature = "io_ipc")]
pub mod ipc;
