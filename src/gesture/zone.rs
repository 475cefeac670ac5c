//! Rectangular control zones in normalized image space.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::landmarks::Hand;

/// Largest margin a zone may be widened by.
pub const MAX_MARGIN: f32 = 0.2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Zone {
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Default zone for each hand: left half arpeggiates, right half drums.
    pub const fn default_for(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::new(0.0, 0.5, 0.1, 0.9),
            Hand::Right => Self::new(0.5, 1.0, 0.1, 0.9),
        }
    }

    /// True when `(x, y)` lies inside the zone grown by `margin` on every side.
    pub fn contains(&self, x: f32, y: f32, margin: f32) -> bool {
        let m = margin.clamp(0.0, MAX_MARGIN);
        (self.x_min - m..=self.x_max + m).contains(&x) && (self.y_min - m..=self.y_max + m).contains(&y)
    }
}
