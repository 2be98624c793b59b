use nih_plug::context::process::Transport;

/**
 * What the engine needs to know about the host playhead for one block.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSnapshot {
    pub playing: bool,
    /// Beats per minute.
    pub tempo: f64,
    /// Absolute position of the first sample of the block.
    pub pos_samples: i64,
    /// Musical position of the first sample of the block, in quarter notes.
    pub pos_beats: f64,
    pub sample_rate: f64,
}

impl TransportSnapshot {
    pub fn from_transport(transport: &Transport, sample_rate: f64) -> Self {
        Self::new(
            transport.playing,
            transport.tempo,
            transport.pos_samples(),
            transport.pos_beats(),
            sample_rate,
        )
    }

    /**
     * Without a positive tempo, or without any position, there is nothing to sync to and the
     * snapshot reports a stopped transport. A missing position is derived from the other one.
     */
    pub fn new(
        playing: bool,
        tempo: Option<f64>,
        pos_samples: Option<i64>,
        pos_beats: Option<f64>,
        sample_rate: f64,
    ) -> Self {
        let stopped = Self::stopped(sample_rate);

        let Some(tempo) = tempo.filter(|tempo| *tempo > 0.0) else {
            return stopped;
        };
        let samples_per_beat = sample_rate * 60.0 / tempo;

        let (pos_samples, pos_beats) = match (pos_samples, pos_beats) {
            (Some(samples), Some(beats)) => (samples, beats),
            (Some(samples), None) => (samples, samples as f64 / samples_per_beat),
            (None, Some(beats)) => ((beats * samples_per_beat).round() as i64, beats),
            (None, None) => return stopped,
        };

        Self {
            playing,
            tempo,
            pos_samples,
            pos_beats,
            sample_rate,
        }
    }

    pub fn stopped(sample_rate: f64) -> Self {
        Self {
            playing: false,
            tempo: 120.0,
            pos_samples: 0,
            pos_beats: 0.0,
            sample_rate,
        }
    }

    pub fn samples_per_beat(&self) -> f64 {
        self.sample_rate * 60.0 / self.tempo
    }

    /**
     * Musical position right after the last sample of a block of `nb_samples`.
     */
    pub fn block_end_beats(&self, nb_samples: usize) -> f64 {
        (self.pos_samples + nb_samples as i64) as f64 / self.samples_per_beat()
    }

    /**
     * Offset in samples from the start of the block to the musical position `beats`.
     */
    pub fn beats_to_block_offset(&self, beats: f64) -> i64 {
        (beats * self.samples_per_beat()).round() as i64 - self.pos_samples
    }
}
