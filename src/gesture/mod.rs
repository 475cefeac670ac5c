//! Gesture signal processing: landmarks in, smoothed control signals out.

/// Binary per-frame classifiers (finger extension, fist, pointing).
pub mod classify;
/// Landmark geometry and the pose frame delivered each tick.
pub mod landmarks;
/// Smoothing, zone gating and the published per-hand signals.
pub mod processor;
/// Exponential moving average keyed by hand and signal.
pub mod smoothing;
/// Rectangular control regions.
pub mod zone;

pub use classify::FingerStates;
pub use landmarks::{Finger, Hand, HandLandmarks, HandPose, Landmark, PoseFrame};
pub use processor::{GestureConfig, GestureProcessor, HandPoseSnapshot, HandSignals, TrackingStats};
pub use zone::Zone;
