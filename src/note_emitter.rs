use nih_plug::prelude::NoteEvent;

use crate::note_info::NoteInfo;
use crate::transport::TransportSnapshot;

/// How long an arpeggiated note lasts, unless the block ends before.
pub const NOTE_LENGTH_SAMPLES: u32 = 1000;

/// Every arpeggiated note is played at full velocity.
pub const NOTE_VELOCITY: f32 = 1.0;

/**
 * Build the note on and note off for a note starting at the musical position `onset`.
 * The note on lands on the sample of the block matching the onset, clamped to the block.
 * The note off follows `NOTE_LENGTH_SAMPLES` later, or on the last sample of the block if
 * that comes first, so nothing is left hanging once the block is sent.
 */
pub fn emit(
    note_info: &NoteInfo,
    onset: f64,
    transport: &TransportSnapshot,
    nb_samples: usize,
) -> (NoteEvent<()>, NoteEvent<()>) {
    let last_sample = nb_samples.saturating_sub(1) as i64;
    let note_on_timing = transport
        .beats_to_block_offset(onset)
        .clamp(0, last_sample) as u32;
    let note_off_timing = note_on_timing
        .saturating_add(NOTE_LENGTH_SAMPLES)
        .min(last_sample as u32);

    (
        NoteEvent::NoteOn {
            timing: note_on_timing,
            voice_id: None,
            channel: note_info.channel,
            note: note_info.note,
            velocity: NOTE_VELOCITY,
        },
        NoteEvent::NoteOff {
            timing: note_off_timing,
            voice_id: None,
            channel: note_info.channel,
            note: note_info.note,
            velocity: 0.0,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_at(pos_samples: i64) -> TransportSnapshot {
        TransportSnapshot {
            playing: true,
            tempo: 120.0,
            pos_samples,
            pos_beats: pos_samples as f64 / 24000.0,
            sample_rate: 48000.0,
        }
    }

    fn timings(events: &(NoteEvent<()>, NoteEvent<()>)) -> (u32, u32) {
        (events.0.timing(), events.1.timing())
    }

    #[test]
    fn note_starts_on_the_onset_sample() {
        let note_info = NoteInfo::new(60, 2);
        let events = emit(&note_info, 1.25, &transport_at(24000), 24000);
        assert_eq!(timings(&events), (6000, 7000));

        match events.0 {
            NoteEvent::NoteOn {
                note,
                channel,
                velocity,
                ..
            } => {
                assert_eq!(note, 60);
                assert_eq!(channel, 2);
                assert_eq!(velocity, NOTE_VELOCITY);
            }
            _ => panic!("expected a note on, got {:?}", events.0),
        }
        assert!(matches!(events.1, NoteEvent::NoteOff { note: 60, channel: 2, .. }));
    }

    #[test]
    fn note_off_is_cut_at_the_end_of_the_block() {
        let events = emit(&NoteInfo::new(64, 0), 0.02, &transport_at(0), 512);
        assert_eq!(timings(&events), (480, 511));
    }

    #[test]
    fn timings_stay_inside_the_block() {
        let late = emit(&NoteInfo::new(64, 0), 2.0, &transport_at(0), 512);
        assert_eq!(timings(&late), (511, 511));

        let early = emit(&NoteInfo::new(64, 0), 0.0, &transport_at(100), 512);
        assert_eq!(timings(&early), (0, 511));
    }
}
