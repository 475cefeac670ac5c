// Purpose - read-only audio assets supplied by the surrounding application

pub mod samples;

pub use samples::{load_wav, resample_linear, SampleBank, SampleError, SampleSource};
