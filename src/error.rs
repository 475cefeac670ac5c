//! Errors that reach the caller.
//!
//! Only startup failures live here. Asset problems are handled inside
//! [`crate::io::samples`] and a full channel pool just drops the request, so
//! neither ever shows up as an `EngineError`.

use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// The host has no default output device.
    NoOutputDevice,
    /// The device exists but could not be queried or opened.
    Device(String),
    /// The device only offers a sample format the mixer can't write.
    UnsupportedSampleFormat(String),
    /// A configuration document could not be parsed.
    Config(String),
    /// The scheduler thread could not be started.
    Thread(std::io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NoOutputDevice => write!(f, "no default audio output device available"),
            EngineError::Device(msg) => write!(f, "audio output device error: {msg}"),
            EngineError::UnsupportedSampleFormat(format) => {
                write!(f, "unsupported output sample format: {format}")
            }
            EngineError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            EngineError::Thread(err) => write!(f, "could not start scheduler thread: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Thread(err) => Some(err),
            _ => None,
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for EngineError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        EngineError::Device(err.to_string())
    }
}

impl From<cpal::BuildStreamError> for EngineError {
    fn from(err: cpal::BuildStreamError) -> Self {
        EngineError::Device(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for EngineError {
    fn from(err: cpal::PlayStreamError) -> Self {
        EngineError::Device(err.to_string())
    }
}
