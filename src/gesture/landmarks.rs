//! Per-hand landmark snapshots as delivered by the pose-estimation collaborator.
//!
//! Coordinates are normalized image coordinates: `x` grows to the right, `y`
//! grows downward, `z` is relative depth. Every tick the collaborator hands us
//! one [`PoseFrame`] holding zero, one or two [`HandLandmarks`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of landmarks tracked per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Which hand a snapshot belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    /// Drives the arpeggiator by default.
    Left,
    /// Drives the drum sequencer by default.
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub(crate) fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

/// The five fingers, in landmark order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        match self {
            Finger::Thumb => THUMB_TIP,
            Finger::Index => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring => RING_TIP,
            Finger::Pinky => PINKY_TIP,
        }
    }

    /// Landmark index of the joint the tip is compared against.
    pub fn joint(self) -> usize {
        match self {
            Finger::Thumb => THUMB_IP,
            Finger::Index => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring => RING_PIP,
            Finger::Pinky => PINKY_PIP,
        }
    }
}

/// A single normalized landmark position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in all three dimensions.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// One hand's landmarks at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    pub hand: Hand,
    pub points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(hand: Hand, points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { hand, points }
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }

    /// Geometric centre of all landmarks.
    pub fn centroid(&self) -> (f32, f32) {
        let n = LANDMARK_COUNT as f32;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        (sx / n, sy / n)
    }
}

/// Everything the pose collaborator saw during one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoseFrame {
    /// Capture time in seconds.
    pub timestamp: f64,
    pub hands: Vec<HandLandmarks>,
}

impl PoseFrame {
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp,
            hands: Vec::new(),
        }
    }

    pub fn with_hand(mut self, hand: HandLandmarks) -> Self {
        self.hands.push(hand);
        self
    }

    pub fn hand(&self, hand: Hand) -> Option<&HandLandmarks> {
        self.hands.iter().find(|h| h.hand == hand)
    }
}

/// Builds plausible landmark sets from a handful of high-level parameters.
///
/// The keyboard simulator in the `gestune` binary and the test-suite both use
/// this to stand in for a real pose estimator.
#[derive(Debug, Clone, Copy)]
pub struct HandPose {
    hand: Hand,
    wrist_x: f32,
    wrist_y: f32,
    pinch: f32,
    extended: [bool; 5],
}

impl HandPose {
    pub fn new(hand: Hand) -> Self {
        let wrist_x = match hand {
            Hand::Left => 0.25,
            Hand::Right => 0.75,
        };
        Self {
            hand,
            wrist_x,
            wrist_y: 0.6,
            pinch: 0.1,
            extended: [false; 5],
        }
    }

    /// Height in `0..=1`, higher hand = larger value.
    pub fn height(mut self, height: f32) -> Self {
        self.wrist_y = 1.0 - height;
        self
    }

    pub fn wrist_x(mut self, x: f32) -> Self {
        self.wrist_x = x;
        self
    }

    /// Distance between thumb tip and index tip.
    pub fn pinch(mut self, pinch: f32) -> Self {
        self.pinch = pinch.max(0.0);
        self
    }

    pub fn finger(mut self, finger: Finger, extended: bool) -> Self {
        self.extended[finger as usize] = extended;
        self
    }

    pub fn fingers(mut self, extended: [bool; 5]) -> Self {
        self.extended = extended;
        self
    }

    pub fn build(self) -> HandLandmarks {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        let wx = self.wrist_x;
        let wy = self.wrist_y;
        // Thumb points away from the palm: towards -x on the right hand.
        let outward = match self.hand {
            Hand::Right => -1.0,
            Hand::Left => 1.0,
        };

        points[WRIST] = Landmark::new(wx, wy, 0.0);

        // Four long fingers spread across the palm.
        let spreads = [(INDEX_PIP, -0.03), (MIDDLE_PIP, -0.01), (RING_PIP, 0.01), (PINKY_PIP, 0.03)];
        for (i, (pip, dx)) in spreads.iter().enumerate() {
            let x = wx + dx * outward;
            let extended = self.extended[i + 1];
            // mcp, pip, dip, tip live at pip-1 .. pip+2
            points[pip - 1] = Landmark::new(x, wy - 0.08, 0.0);
            points[*pip] = Landmark::new(x, wy - 0.12, 0.0);
            let (dip_y, tip_y) = if extended {
                (wy - 0.16, wy - 0.20)
            } else {
                (wy - 0.10, wy - 0.08)
            };
            points[pip + 1] = Landmark::new(x, dip_y, 0.0);
            points[pip + 2] = Landmark::new(x, tip_y, 0.0);
        }

        // Thumb chain: cmc 1, mcp 2, ip 3, tip 4.
        let ip = Landmark::new(wx + 0.05 * outward, wy - 0.06, 0.0);
        points[1] = Landmark::new(wx + 0.02 * outward, wy - 0.02, 0.0);
        points[2] = Landmark::new(wx + 0.04 * outward, wy - 0.04, 0.0);
        points[THUMB_IP] = ip;
        let tip_x = if self.extended[0] {
            ip.x + 0.03 * outward
        } else {
            ip.x - 0.02 * outward
        };
        points[THUMB_TIP] = Landmark::new(tip_x, wy - 0.07, 0.0);

        // Pinch is the thumb tip's distance to the index tip. Depth makes up
        // the difference when the planar gap is shorter than the pinch;
        // otherwise the thumb tip closes onto the index tip.
        let index_tip = points[INDEX_TIP];
        let thumb_tip = points[THUMB_TIP];
        let planar = ((thumb_tip.x - index_tip.x).powi(2) + (thumb_tip.y - index_tip.y).powi(2)).sqrt();
        points[THUMB_TIP] = if self.pinch >= planar {
            let depth = (self.pinch * self.pinch - planar * planar).sqrt();
            Landmark::new(thumb_tip.x, thumb_tip.y, index_tip.z + depth)
        } else {
            Landmark::new(index_tip.x, index_tip.y, index_tip.z + self.pinch)
        };

        HandLandmarks::new(self.hand, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 0.0);
        assert!((a.distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn frame_finds_hand_by_side() {
        let frame = PoseFrame::new(1.0).with_hand(HandPose::new(Hand::Right).build());
        assert!(frame.hand(Hand::Right).is_some());
        assert!(frame.hand(Hand::Left).is_none());
    }

    #[test]
    fn pose_builder_places_wrist_from_height() {
        let hand = HandPose::new(Hand::Left).height(0.8).build();
        assert!((hand.wrist().y - 0.2).abs() < 1e-6);
    }
}
