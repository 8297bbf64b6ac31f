//! Range math and chunk planning.
//!
//! Splits a download of known size into fixed-size chunks addressed by
//! sequence number and computes the HTTP Range header for each.

mod range;

pub use range::{chunk_count, chunk_range, plan_chunks, ChunkRange, PlanError};
