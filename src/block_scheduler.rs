use nih_plug::prelude::NoteEvent;
use nih_plug::{nih_debug_assert, nih_trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::held_notes::HeldNotes;
use crate::note_emitter;
use crate::note_info::NoteInfo;
use crate::params::PatternSettings;
use crate::pattern::{PatternGenerator, RandomSource, MAX_DIVISION};
use crate::timeline;
use crate::transport::TransportSnapshot;

/// A pending onset this far ahead of the playhead means the host jumped backwards.
const MAX_LOOKAHEAD_BEATS: f64 = 2.0;

pub struct BlockScheduler<R: RandomSource = StdRng> {
    /**
     * The notes that are currently held
     */
    held_notes: HeldNotes,

    /**
     * Draws the beat map of each cycle and picks the notes to play
     */
    generator: PatternGenerator<R>,

    /**
     * Positions of the onsets of the current cycle on the host timeline, in beats
     */
    positions: Vec<f64>,

    /**
     * The next onset due in `positions`
     */
    cursor: usize,

    /**
     * The current pattern is stale and a new one is drawn on the next playing block
     */
    new_beat: bool,

    sample_rate: f64,

    /**
     * The events generated during the current block
     */
    midi_events: Vec<NoteEvent<()>>,
}

impl Default for BlockScheduler<StdRng> {
    fn default() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: RandomSource> BlockScheduler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            held_notes: HeldNotes::default(),
            generator: PatternGenerator::new(rng),
            positions: Vec::with_capacity(MAX_DIVISION),
            cursor: 0,
            new_beat: true,
            sample_rate: 44100.0,
            // Each onset of a cycle produces a note on and a note off.
            midi_events: Vec::with_capacity(2 * MAX_DIVISION),
        }
    }

    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.reset();
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /**
     * Forget the held notes and the current pattern
     */
    pub fn reset(&mut self) {
        self.held_notes.clear();
        self.reset_pattern();
    }

    fn reset_pattern(&mut self) {
        self.generator.clear();
        self.positions.clear();
        self.cursor = 0;
        self.new_beat = true;
    }

    /**
     * Track note ons and note offs.
     * Nothing is forwarded, the output only holds the arpeggiated notes.
     */
    pub fn process_event(&mut self, event: &NoteEvent<()>) {
        match event {
            NoteEvent::NoteOn { note, channel, .. } => {
                self.held_notes.note_on(NoteInfo::new(*note, *channel))
            }
            NoteEvent::NoteOff { note, .. } => self.held_notes.note_off(*note),
            _ => (),
        }
    }

    /**
     * Schedule the onsets that fall inside the block.
     * All the incoming events of the block must have been processed first.
     */
    pub fn process_block(
        &mut self,
        transport: &TransportSnapshot,
        settings: PatternSettings,
        nb_samples: usize,
    ) {
        if !transport.playing {
            self.new_beat = true;
        }

        if !self.held_notes.is_empty() && transport.playing && nb_samples > 0 {
            if self.new_beat {
                self.start_cycle(settings, transport.pos_beats);
            }
            self.fire_onsets(transport, settings, nb_samples);
        }

        if self.held_notes.is_empty() {
            self.reset_pattern();
        }

        // Note offs cut at the end of the block can come after the next note on.
        // The sort is stable, so a note off moved onto a note on stays in front of it.
        self.midi_events.sort_by_key(|event| event.timing());
    }

    /**
     * Draw a new pattern and anchor it on the next beat.
     */
    fn start_cycle(&mut self, settings: PatternSettings, pos_beats: f64) {
        self.generator.generate(settings);
        timeline::project(self.generator.offsets(), pos_beats, &mut self.positions);
        self.cursor = 0;
        self.new_beat = false;

        nih_debug_assert!(!self.positions.is_empty());
        nih_trace!(
            "New beat at {pos_beats}: map {:?}, offsets {:?}, positions {:?}",
            self.generator.beat_map().slots(),
            self.generator.offsets(),
            self.positions
        );
    }

    /**
     * Play every onset of the current cycle inside `[block_start, block_end)`.
     * Every candidate is compared with its position on the host timeline.
     */
    fn fire_onsets(
        &mut self,
        transport: &TransportSnapshot,
        settings: PatternSettings,
        nb_samples: usize,
    ) {
        let block_start = transport.pos_beats;
        let block_end = transport.block_end_beats(nb_samples);
        // Half a sample of slack between the host position and the sample based block end.
        let tolerance = 0.5 / transport.samples_per_beat();

        while let Some(&onset) = self.positions.get(self.cursor) {
            if onset < block_start - tolerance || onset - block_start >= MAX_LOOKAHEAD_BEATS {
                // The new pattern is anchored at or after the block start, so this runs once.
                nih_trace!("Playhead moved to {block_start}, dropping onset at {onset}");
                self.start_cycle(settings, block_start);
                continue;
            }
            if onset >= block_end {
                break;
            }

            self.play_onset(onset, transport, nb_samples);

            if settings.num_notes == 1 || self.cursor + 1 >= self.positions.len() {
                self.cursor = 0;
                self.new_beat = true;
                break;
            }
            self.cursor += 1;
        }
    }

    /**
     * Play one of the held notes, picked at random.
     */
    fn play_onset(&mut self, onset: f64, transport: &TransportSnapshot, nb_samples: usize) {
        let Some(index) = self.generator.pick(self.held_notes.len()) else {
            return;
        };
        let Some(note_info) = self.held_notes.get(index) else {
            return;
        };

        let (note_on, note_off) = note_emitter::emit(note_info, onset, transport, nb_samples);
        let (note, channel) = (note_info.note, note_info.channel);
        self.release_before(note, channel, note_on.timing());
        self.midi_events.push(note_on);
        self.midi_events.push(note_off);
    }

    /**
     * A note played again before its previous note off is released right when it starts again.
     */
    fn release_before(&mut self, note: u8, channel: u8, timing: u32) {
        for event in self.midi_events.iter_mut() {
            if let NoteEvent::NoteOff {
                timing: off_timing,
                note: off_note,
                channel: off_channel,
                ..
            } = event
            {
                if *off_note == note && *off_channel == channel && *off_timing > timing {
                    *off_timing = timing;
                }
            }
        }
    }

    pub fn held_notes(&self) -> &HeldNotes {
        &self.held_notes
    }

    pub fn scheduled_positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_pattern_stale(&self) -> bool {
        self.new_beat
    }

    /**
     * Clear the processed events
     */
    pub fn clear_events(&mut self) {
        self.midi_events.clear();
    }

    /**
     * Return the events generated during the last block, ordered by timing
     */
    pub fn get_events(&self) -> &[NoteEvent<()>] {
        &self.midi_events
    }
}
