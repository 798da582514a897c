//! Audio loading, normalization, and chunk artifact I/O.

pub mod wav;

pub use wav::{duration_ms, read_mono_chunk, read_normalized, write_mono_wav};
