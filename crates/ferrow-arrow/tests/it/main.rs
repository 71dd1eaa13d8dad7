mod bitmap;
#[cfg(feature = "io_ipc")]
mod io;
mod record_batch;
