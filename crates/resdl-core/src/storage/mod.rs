//! Disk I/O for the destination file.
//!
//! Creates or reopens the output file, preallocates it (fallocate on Linux
//! when available, else set_len), and supports concurrent offset writes
//! (pwrite) from every worker through one shared handle.

mod builder;
mod positioned;
mod writer;

pub use builder::OutputFileBuilder;
pub use writer::OutputFile;

pub(crate) use positioned::{read_exact_at, write_all_at};
