//! Exponential moving average over named per-hand signals.
//!
//! ```text
//!   smoothed = α·new + (1 − α)·smoothed_prev
//! ```
//!
//! Lower α = smoother output, more lag. Each `(hand, signal)` pair is seeded
//! with its first observation, so a freshly detected hand never ramps up from
//! zero. Forgetting a hand drops its entries; the next detection re-seeds.

use std::collections::HashMap;

use super::landmarks::Hand;

/// The continuous signals that get smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Height,
    Pinch,
    Openness,
}

#[derive(Debug, Clone, Default)]
pub struct SmoothingState {
    values: HashMap<(Hand, Signal), f32>,
}

impl SmoothingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `value` into the running average for `(hand, signal)` and return
    /// the smoothed result.
    pub fn smooth(&mut self, hand: Hand, signal: Signal, value: f32, alpha: f32) -> f32 {
        let alpha = alpha.clamp(0.0, 1.0);
        let smoothed = match self.values.get(&(hand, signal)) {
            Some(prev) => alpha * value + (1.0 - alpha) * prev,
            None => value,
        };
        self.values.insert((hand, signal), smoothed);
        smoothed
    }

    pub fn get(&self, hand: Hand, signal: Signal) -> Option<f32> {
        self.values.get(&(hand, signal)).copied()
    }

    /// Drop every signal belonging to `hand`.
    pub fn forget(&mut self, hand: Hand) {
        self.values.retain(|(h, _), _| *h != hand);
    }

    pub fn is_tracking(&self, hand: Hand) -> bool {
        self.values.keys().any(|(h, _)| *h == hand)
    }
}
