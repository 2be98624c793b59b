use nih_plug::prelude::*;

use crate::pattern::MAX_DIVISION;

/**
 * The two values that shape a pattern. They are persisted by nih-plug as plain integers.
 */
#[derive(Params)]
pub struct BeatPeggiatorParams {
    #[id = "num_notes"]
    pub num_notes: IntParam,
    #[id = "beat_division"]
    pub beat_division: IntParam,
}

impl Default for BeatPeggiatorParams {
    fn default() -> Self {
        let range = IntRange::Linear {
            min: 1,
            max: MAX_DIVISION as i32,
        };
        Self {
            num_notes: IntParam::new("Number Of Notes", 1, range),
            beat_division: IntParam::new("Beat Division", 1, range),
        }
    }
}

/**
 * Parameter values sampled once at the top of a block, with the clamp policy applied.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSettings {
    pub num_notes: usize,
    pub beat_division: usize,
}

impl PatternSettings {
    /// Both values end up in `[1, MAX_DIVISION]` and there are never more notes than slots.
    pub fn new(num_notes: i32, beat_division: i32) -> Self {
        let beat_division = beat_division.clamp(1, MAX_DIVISION as i32) as usize;
        let num_notes = (num_notes.clamp(1, MAX_DIVISION as i32) as usize).min(beat_division);
        Self {
            num_notes,
            beat_division,
        }
    }

    pub fn from_params(params: &BeatPeggiatorParams) -> Self {
        Self::new(params.num_notes.value(), params.beat_division.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_are_clamped_to_valid_range() {
        assert_eq!(PatternSettings::new(0, 0), PatternSettings::new(1, 1));
        assert_eq!(PatternSettings::new(-3, 4).num_notes, 1);
        assert_eq!(PatternSettings::new(3, 42).beat_division, MAX_DIVISION);
    }

    #[test]
    fn more_notes_than_slots_fills_every_slot() {
        let settings = PatternSettings::new(7, 4);
        assert_eq!(settings.num_notes, 4);
        assert_eq!(settings.beat_division, 4);
    }

    #[test]
    fn default_params_give_a_single_note_per_beat() {
        let params = BeatPeggiatorParams::default();
        let settings = PatternSettings::from_params(&params);
        assert_eq!(settings.num_notes, 1);
        assert_eq!(settings.beat_division, 1);
    }
}
