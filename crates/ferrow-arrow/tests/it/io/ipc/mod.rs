mod common;
mod file;
mod stream;
