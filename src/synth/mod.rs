// Purpose: tone synthesis for the arpeggiator voice
// Buffers are rendered once at unit volume and shared through the cache

pub mod cache;
pub mod tone;

pub use cache::{CacheStats, ToneCache, ToneKey};
pub use tone::{ToneConfig, ToneSynth};

/// Convert a MIDI note number to frequency in Hz (A4 = 69 = 440 Hz).
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_440() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_note_to_freq(57) - 220.0).abs() < 1e-3);
    }
}
