//! Per-frame binary gesture classification.
//!
//! These work on the raw landmarks of a single frame. A finger is either
//! extended or it isn't; smoothing that decision would only add lag.

use super::landmarks::{Finger, Hand, HandLandmarks, INDEX_TIP, THUMB_TIP};

/// Extended/folded state of the five fingers, indexed by [`Finger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates(pub [bool; 5]);

impl FingerStates {
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&e| e).count()
    }

    /// Fist: at most one finger (usually the thumb) sticking out.
    pub fn is_fist(&self) -> bool {
        self.count() <= 1
    }

    /// Only the index finger among the long fingers is extended.
    pub fn is_pointing(&self) -> bool {
        self.is_extended(Finger::Index)
            && !self.is_extended(Finger::Middle)
            && !self.is_extended(Finger::Ring)
            && !self.is_extended(Finger::Pinky)
    }

    /// Index and middle extended, ring and pinky folded.
    pub fn is_peace(&self) -> bool {
        self.is_extended(Finger::Index)
            && self.is_extended(Finger::Middle)
            && !self.is_extended(Finger::Ring)
            && !self.is_extended(Finger::Pinky)
    }
}

/// Classify every finger of `hand`.
///
/// Long fingers are extended when the tip sits above the PIP joint (smaller
/// y, image y grows downward). The thumb is compared sideways against its IP
/// joint; which side counts as "out" depends on handedness.
pub fn fingers_extended(hand: &HandLandmarks) -> FingerStates {
    let mut states = [false; 5];
    for finger in Finger::ALL {
        let tip = hand.points[finger.tip()];
        let joint = hand.points[finger.joint()];
        states[finger as usize] = match finger {
            Finger::Thumb => match hand.hand {
                Hand::Right => tip.x < joint.x,
                Hand::Left => tip.x > joint.x,
            },
            _ => tip.y < joint.y,
        };
    }
    FingerStates(states)
}

/// Raw 3D thumb-tip to index-tip distance.
pub fn pinch_distance(hand: &HandLandmarks) -> f32 {
    hand.points[THUMB_TIP].distance(&hand.points[INDEX_TIP])
}

/// Raw height, inverted so a higher hand gives a larger value.
pub fn hand_height(hand: &HandLandmarks) -> f32 {
    (1.0 - hand.wrist().y).clamp(0.0, 1.0)
}

/// How spread the hand is, 0 = closed, 1 = fully open.
///
/// Mean planar distance from the landmark centroid to each fingertip, mapped
/// from the typical 0.05..0.15 range onto 0..1.
pub fn openness(hand: &HandLandmarks) -> f32 {
    let (cx, cy) = hand.centroid();
    let total: f32 = Finger::ALL
        .iter()
        .map(|f| {
            let tip = hand.points[f.tip()];
            ((tip.x - cx).powi(2) + (tip.y - cy).powi(2)).sqrt()
        })
        .sum();
    let mean = total / Finger::ALL.len() as f32;
    ((mean - 0.05) / 0.10).clamp(0.0, 1.0)
}
