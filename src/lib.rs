use block_scheduler::BlockScheduler;
use nih_plug::prelude::*;
use std::sync::Arc;

pub mod block_scheduler;
pub mod held_notes;
pub mod note_emitter;
pub mod note_info;
pub mod params;
pub mod pattern;
pub mod timeline;
pub mod transport;

use crate::params::{BeatPeggiatorParams, PatternSettings};
use crate::transport::TransportSnapshot;

struct BeatPeggiator {
    params: Arc<BeatPeggiatorParams>,

    scheduler: BlockScheduler,
}

impl Default for BeatPeggiator {
    fn default() -> Self {
        Self {
            params: Arc::new(BeatPeggiatorParams::default()),
            scheduler: BlockScheduler::default(),
        }
    }
}

impl Plugin for BeatPeggiator {
    const NAME: &'static str = "Beat Peggiator";
    const VENDOR: &'static str = "Stfufane";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "albanese.stephane@gmail.com";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // This plugin doesn't have any audio IO
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[];

    const MIDI_INPUT: MidiConfig = MidiConfig::Basic;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::Basic;

    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        nih_log!("Initializing at {} Hz", buffer_config.sample_rate);
        self.scheduler.prepare(buffer_config.sample_rate as f64);
        true
    }

    fn reset(&mut self) {
        self.scheduler.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        // The parameters are sampled once for the whole block.
        let settings = PatternSettings::from_params(&self.params);
        let transport =
            TransportSnapshot::from_transport(context.transport(), self.scheduler.sample_rate());

        self.scheduler.clear_events();
        while let Some(event) = context.next_event() {
            self.scheduler.process_event(&event);
        }
        self.scheduler
            .process_block(&transport, settings, buffer.samples());

        // Send the arpeggiated notes.
        for event in self.scheduler.get_events() {
            context.send_event(*event);
        }

        ProcessStatus::Normal
    }
}

impl ClapPlugin for BeatPeggiator {
    const CLAP_ID: &'static str = "com.stfufane.beat-peggiator";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Plays the held notes on a random rhythm locked to the host tempo");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;

    const CLAP_FEATURES: &'static [ClapFeature] = &[ClapFeature::NoteEffect, ClapFeature::Utility];
}

impl Vst3Plugin for BeatPeggiator {
    const VST3_CLASS_ID: [u8; 16] = *b"BeatPeggiator!!!";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Tools, Vst3SubCategory::Fx];
}

nih_export_clap!(BeatPeggiator);
nih_export_vst3!(BeatPeggiator);
