//! Real-world scenario benchmarks: the voice bank and the processor entry
//! point with a realistic number of sounding notes.

mod processor;
mod voices;

pub use processor::bench_processor;
pub use voices::bench_voices;
