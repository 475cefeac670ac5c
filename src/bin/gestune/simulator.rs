//! Keyboard stand-in for a pose estimator.
//!
//! Holds a pose for each hand and nudges it on key presses. Every frame the
//! current poses are turned into landmarks with [`HandPose`] and handed to the
//! runtime, exactly as a camera pipeline would.
//!
//! ```text
//!   melody hand          drum hand              transport
//!   w / s  up / down     ↑ / ↓   up / down      n    next pattern
//!   a / d  pinch - / +   ← / →   pinch - / +    + -  tempo
//!   q      show / hide   1..5    toggle finger  [ ]  master gain
//!                        f       fist           esc  quit
//!                        e       show / hide
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gestune::gesture::{Hand, HandPose, PoseFrame};

const HEIGHT_STEP: f32 = 0.05;
const PINCH_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedHand {
    pub hand: Hand,
    pub present: bool,
    pub height: f32,
    pub pinch: f32,
    pub fingers: [bool; 5],
    /// Fingers to restore when a fist opens again.
    saved: [bool; 5],
}

impl SimulatedHand {
    fn new(hand: Hand, fingers: [bool; 5]) -> Self {
        Self {
            hand,
            present: true,
            height: 0.5,
            pinch: 0.08,
            fingers,
            saved: fingers,
        }
    }

    fn raise(&mut self, delta: f32) {
        // stay inside the default zones' vertical band
        self.height = (self.height + delta).clamp(0.1, 0.9);
    }

    fn widen(&mut self, delta: f32) {
        self.pinch = (self.pinch + delta).clamp(0.0, 0.2);
    }

    fn toggle_finger(&mut self, i: usize) {
        self.fingers[i] = !self.fingers[i];
        self.saved = self.fingers;
    }

    fn toggle_fist(&mut self) {
        if self.fingers.iter().any(|&f| f) {
            self.saved = self.fingers;
            self.fingers = [false; 5];
        } else {
            self.fingers = self.saved;
        }
    }

    fn pose(&self) -> HandPose {
        HandPose::new(self.hand)
            .height(self.height)
            .pinch(self.pinch)
            .fingers(self.fingers)
    }
}

/// What a key press asks the runtime to do beyond moving a hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    None,
    NextPattern,
    TempoBy(f32),
    GainBy(f32),
    Quit,
}

#[derive(Debug, Clone)]
pub struct KeyboardSimulator {
    melody: SimulatedHand,
    drums: SimulatedHand,
}

impl KeyboardSimulator {
    pub fn new(melody_hand: Hand) -> Self {
        let drum_hand = match melody_hand {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        };
        Self {
            melody: SimulatedHand::new(melody_hand, [true; 5]),
            // index finger only: kick
            drums: SimulatedHand::new(drum_hand, [false, true, false, false, false]),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Command::Quit;
        }
        match key.code {
            KeyCode::Esc => return Command::Quit,
            KeyCode::Char('w') => self.melody.raise(HEIGHT_STEP),
            KeyCode::Char('s') => self.melody.raise(-HEIGHT_STEP),
            KeyCode::Char('a') => self.melody.widen(-PINCH_STEP),
            KeyCode::Char('d') => self.melody.widen(PINCH_STEP),
            KeyCode::Char('q') => self.melody.present = !self.melody.present,
            KeyCode::Up => self.drums.raise(HEIGHT_STEP),
            KeyCode::Down => self.drums.raise(-HEIGHT_STEP),
            KeyCode::Left => self.drums.widen(-PINCH_STEP),
            KeyCode::Right => self.drums.widen(PINCH_STEP),
            KeyCode::Char(c @ '1'..='5') => {
                self.drums.toggle_finger(c as usize - '1' as usize);
            }
            KeyCode::Char('f') => self.drums.toggle_fist(),
            KeyCode::Char('e') => self.drums.present = !self.drums.present,
            KeyCode::Char('n') => return Command::NextPattern,
            KeyCode::Char('+') | KeyCode::Char('=') => return Command::TempoBy(5.0),
            KeyCode::Char('-') => return Command::TempoBy(-5.0),
            KeyCode::Char(']') => return Command::GainBy(0.05),
            KeyCode::Char('[') => return Command::GainBy(-0.05),
            _ => {}
        }
        Command::None
    }

    /// The frame a camera would have produced at `timestamp`.
    pub fn frame(&self, timestamp: f64) -> PoseFrame {
        [self.melody, self.drums]
            .iter()
            .filter(|h| h.present)
            .fold(PoseFrame::new(timestamp), |frame, h| frame.with_hand(h.pose().build()))
    }

    #[cfg(test)]
    pub fn drums(&self) -> &SimulatedHand {
        &self.drums
    }
}
