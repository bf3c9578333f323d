//! Real-world scenario benchmarks.
//!
//! These model what the audio callback actually does: a full voice pool,
//! and the block renderer with events arriving through the collector.

mod poly;
mod source;

pub use poly::bench_poly;
pub use source::bench_source;
