//! Turns raw per-hand landmarks into stable control signals.
//!
//! One [`PoseFrame`] goes in per tick. For every visible hand the processor
//! derives a raw [`HandPoseSnapshot`], smooths the continuous parts of it and
//! publishes the result as [`HandSignals`]. A hand missing from the frame has
//! its smoothing state dropped and reads back as `None`, which consumers treat
//! as a state of its own rather than "signal near zero".

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    classify::{self, FingerStates},
    landmarks::{Hand, HandLandmarks, PoseFrame},
    smoothing::{Signal, SmoothingState},
    zone::Zone,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// EMA weight of the newest sample (lower = smoother).
    pub alpha: f32,
    /// How far outside its zone a wrist may stray and still count as inside.
    pub zone_margin: f32,
    /// When false every present hand counts as in-zone.
    pub zones_enabled: bool,
    pub left_zone: Zone,
    pub right_zone: Zone,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            zone_margin: 0.05,
            zones_enabled: true,
            left_zone: Zone::default_for(Hand::Left),
            right_zone: Zone::default_for(Hand::Right),
        }
    }
}

impl GestureConfig {
    pub fn zone(&self, hand: Hand) -> &Zone {
        match hand {
            Hand::Left => &self.left_zone,
            Hand::Right => &self.right_zone,
        }
    }
}

/// Raw, unsmoothed reading of one hand for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPoseSnapshot {
    pub hand: Hand,
    /// Wrist height, 0..1, higher hand = larger value.
    pub height: f32,
    pub pinch: f32,
    pub openness: f32,
    pub fingers: FingerStates,
    pub fist: bool,
    pub in_zone: bool,
    pub timestamp: f64,
}

impl HandPoseSnapshot {
    pub fn capture(landmarks: &HandLandmarks, config: &GestureConfig, timestamp: f64) -> Self {
        let fingers = classify::fingers_extended(landmarks);
        let wrist = landmarks.wrist();
        let in_zone = !config.zones_enabled
            || config
                .zone(landmarks.hand)
                .contains(wrist.x, wrist.y, config.zone_margin);

        Self {
            hand: landmarks.hand,
            height: classify::hand_height(landmarks),
            pinch: classify::pinch_distance(landmarks),
            openness: classify::openness(landmarks),
            fingers,
            fist: fingers.is_fist(),
            in_zone,
            timestamp,
        }
    }
}

/// Smoothed control signals for a present hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSignals {
    pub hand: Hand,
    pub height: f32,
    pub pinch: f32,
    pub openness: f32,
    pub fingers: FingerStates,
    pub fist: bool,
    pub pointing: bool,
    pub peace: bool,
    pub in_zone: bool,
    pub timestamp: f64,
}

/// Running counters, mostly for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingStats {
    pub frames: u64,
    pub detections: u64,
}

impl TrackingStats {
    /// Hands detected per frame, 0 before the first frame. Up to 2.
    pub fn detection_rate(&self) -> f32 {
        if self.frames == 0 {
            0.0
        } else {
            self.detections as f32 / self.frames as f32
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureProcessor {
    config: GestureConfig,
    smoothing: SmoothingState,
    latest: [Option<HandSignals>; 2],
    stats: TrackingStats,
}

impl GestureProcessor {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            smoothing: SmoothingState::new(),
            latest: [None; 2],
            stats: TrackingStats::default(),
        }
    }

    /// Consume one frame from the pose collaborator.
    pub fn ingest(&mut self, frame: &PoseFrame) {
        self.stats.frames += 1;
        for hand in Hand::BOTH {
            let signals = match frame.hand(hand) {
                Some(landmarks) => {
                    self.stats.detections += 1;
                    let snapshot = HandPoseSnapshot::capture(landmarks, &self.config, frame.timestamp);
                    Some(self.update(snapshot))
                }
                None => {
                    self.smoothing.forget(hand);
                    None
                }
            };
            self.latest[hand.index()] = signals;
        }
    }

    /// Fold one snapshot into the smoothing state.
    pub fn update(&mut self, snapshot: HandPoseSnapshot) -> HandSignals {
        let alpha = self.config.alpha;
        let hand = snapshot.hand;
        let signals = HandSignals {
            hand,
            height: self.smoothing.smooth(hand, Signal::Height, snapshot.height, alpha),
            pinch: self.smoothing.smooth(hand, Signal::Pinch, snapshot.pinch, alpha),
            openness: self.smoothing.smooth(hand, Signal::Openness, snapshot.openness, alpha),
            fingers: snapshot.fingers,
            fist: snapshot.fist,
            pointing: snapshot.fingers.is_pointing(),
            peace: snapshot.fingers.is_peace(),
            in_zone: snapshot.in_zone,
            timestamp: snapshot.timestamp,
        };
        self.latest[hand.index()] = Some(signals);
        signals
    }

    /// Latest signals for `hand`, `None` when the hand is absent.
    pub fn signals(&self, hand: Hand) -> Option<&HandSignals> {
        self.latest[hand.index()].as_ref()
    }

    /// Latest signals for `hand` if it is present and inside its zone.
    pub fn active(&self, hand: Hand) -> Option<&HandSignals> {
        self.signals(hand).filter(|s| s.in_zone)
    }

    pub fn is_tracking(&self, hand: Hand) -> bool {
        self.smoothing.is_tracking(hand)
    }

    pub fn stats(&self) -> TrackingStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = TrackingStats::default();
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.config.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_zone_margin(&mut self, margin: f32) {
        self.config.zone_margin = margin.clamp(0.0, super::zone::MAX_MARGIN);
    }

    pub fn set_zones_enabled(&mut self, enabled: bool) {
        self.config.zones_enabled = enabled;
    }
}
