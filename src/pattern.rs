use rand::{Rng, RngCore};

use crate::params::PatternSettings;

/// Upper bound for both the number of notes and the beat division.
pub const MAX_DIVISION: usize = 10;

/**
 * The only source of randomness of the engine.
 * It picks the onset slots of a pattern and the held note played at each onset.
 */
pub trait RandomSource {
    /// Uniform index in `[0, bound)`. `bound` is never 0.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/**
 * One slot per subdivision of the beat, `true` where a note starts.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeatMap {
    slots: Vec<bool>,
}

impl Default for BeatMap {
    fn default() -> Self {
        Self {
            slots: Vec::with_capacity(MAX_DIVISION),
        }
    }
}

impl BeatMap {
    pub fn slots(&self) -> &[bool] {
        &self.slots
    }

    pub fn division(&self) -> usize {
        self.slots.len()
    }

    pub fn onset_count(&self) -> usize {
        self.slots.iter().filter(|slot| **slot).count()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/**
 * Builds the beat map and its onset offsets for each pattern cycle.
 * Both buffers are reused from one cycle to the next.
 */
pub struct PatternGenerator<R: RandomSource> {
    rng: R,
    beat_map: BeatMap,
    offsets: Vec<f64>,
}

impl<R: RandomSource> PatternGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            beat_map: BeatMap::default(),
            offsets: Vec::with_capacity(MAX_DIVISION),
        }
    }

    pub fn beat_map(&self) -> &BeatMap {
        &self.beat_map
    }

    /// Fractional beat offsets in `[0, 1)`, ascending.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn clear(&mut self) {
        self.beat_map.clear();
        self.offsets.clear();
    }

    /**
     * Draw a new beat map and derive its offsets.
     */
    pub fn generate(&mut self, settings: PatternSettings) {
        generate_beat_map(&mut self.rng, settings, &mut self.beat_map);
        derive_offsets(&self.beat_map, &mut self.offsets);
    }

    /// Pick an index in `[0, len)`, or `None` when there is nothing to pick from.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.next_index(len))
    }
}

/**
 * Mark exactly `num_notes` distinct slots out of `beat_division`.
 * A slot that is already taken is drawn again, which always ends since the settings
 * guarantee there are at least as many slots as notes.
 */
pub fn generate_beat_map(
    rng: &mut impl RandomSource,
    settings: PatternSettings,
    beat_map: &mut BeatMap,
) {
    let division = settings.beat_division.clamp(1, MAX_DIVISION);
    let num_notes = settings.num_notes.clamp(1, division);

    beat_map.slots.clear();
    beat_map.slots.resize(division, false);

    for _ in 0..num_notes {
        let mut slot = rng.next_index(division);
        while beat_map.slots[slot] {
            slot = rng.next_index(division);
        }
        beat_map.slots[slot] = true;
    }
}

/**
 * Each onset slot `i` starts at `i / division` of the beat.
 */
pub fn derive_offsets(beat_map: &BeatMap, offsets: &mut Vec<f64>) {
    offsets.clear();
    let division = beat_map.division() as f64;
    offsets.extend(
        beat_map
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, onset)| **onset)
            .map(|(i, _)| i as f64 / division),
    );
}
