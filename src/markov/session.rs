// Copyright (c) 2024 Mike Tsao

use super::{EventStreamRecorder, MelodyGenerator, TransitionMatrices, TransitionMatrixBuilder};
use crate::{error::MarkovError, prelude::*, types::u7};
use strum_macros::Display;

/// Whether a [MarkovSession] is listening for material to learn.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum SessionMode {
    /// Notes are ignored.
    #[default]
    Idle,
    /// Notes are recorded.
    Learning,
}

/// The commands that a performer sends as control-change messages.
///
/// | channel | controller | value | command                               |
/// |---------|------------|-------|---------------------------------------|
/// | 0       | 0          | 0     | [ControlCommand::StartLearning]       |
/// | 0       | 1          | 0     | [ControlCommand::StopLearning]        |
/// | 0       | 0          | n > 0 | [ControlCommand::Generate] n measures |
/// | 0       | 1          | n > 0 | [ControlCommand::SetTempo] n BPM      |
/// | 0       | 2          | n > 0 | [ControlCommand::SetTempo] n + 128    |
/// | 1       | m > 0      | n > 0 | [ControlCommand::SetTimeSignature] n/m |
///
/// Anything else means nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCommand {
    /// Forget the recorded stream and start recording a new one.
    StartLearning,
    /// Stop recording.
    StopLearning,
    /// Stop recording, learn from the recorded stream, and play this many
    /// measures of new material.
    Generate {
        #[allow(missing_docs)]
        measures: usize,
    },
    #[allow(missing_docs)]
    SetTempo(Tempo),
    #[allow(missing_docs)]
    SetTimeSignature(TimeSignature),
}
impl ControlCommand {
    /// Offset added to the value of a high-range tempo command.
    pub const HIGH_TEMPO_OFFSET: u16 = 128;

    /// Interprets a control-change message. Returns None if it isn't one of
    /// the recognized commands.
    pub fn from_midi(channel: MidiChannel, controller: u7, value: u7) -> Option<Self> {
        const TRANSPORT: u8 = MidiChannel::TRANSPORT.0;
        const METER: u8 = MidiChannel::METER.0;

        let (controller, value) = (controller.as_int(), value.as_int());
        match (channel.0, controller, value) {
            (TRANSPORT, 0, 0) => Some(Self::StartLearning),
            (TRANSPORT, 1, 0) => Some(Self::StopLearning),
            (TRANSPORT, 0, n) => Some(Self::Generate {
                measures: n as usize,
            }),
            (TRANSPORT, 1, n) => Some(Self::SetTempo(Tempo::from(n))),
            (TRANSPORT, 2, n) if n > 0 => Some(Self::SetTempo(Tempo::from(
                n as u16 + Self::HIGH_TEMPO_OFFSET,
            ))),
            (METER, m, n) if m > 0 && n > 0 => TimeSignature::new_with(n as usize, m as usize)
                .ok()
                .map(Self::SetTimeSignature),
            _ => None,
        }
    }
}

/// [MarkovSession] is the top-level driver. Feed it every incoming MIDI
/// message. While it's learning, notes go to an [EventStreamRecorder].
/// Control changes are interpreted as [ControlCommand]s; a
/// [ControlCommand::Generate] builds fresh [TransitionMatrices] from the
/// recording at the current meter and emits the generated melody.
///
/// Everything here runs to completion on the caller's thread, so a
/// generation request blocks further input until the melody has been handed
/// off.
#[derive(Debug)]
pub struct MarkovSession {
    mode: SessionMode,
    c: Configurables,
    recorder: EventStreamRecorder,
    matrices: Option<TransitionMatrices>,
    rng: Rng,
    velocity: u7,
}
impl Default for MarkovSession {
    fn default() -> Self {
        Self::new_with(&SessionSettings::default())
    }
}
impl Configurable for MarkovSession {
    fn tempo(&self) -> Tempo {
        self.c.tempo()
    }

    fn update_tempo(&mut self, tempo: Tempo) {
        if !Tempo::range().contains(&tempo.0) {
            log::warn!("ignoring tempo {tempo}; keeping {}", self.tempo());
            return;
        }
        self.c.update_tempo(tempo);
        self.recorder.update_tempo(tempo);
    }

    fn time_signature(&self) -> TimeSignature {
        self.c.time_signature()
    }

    fn update_time_signature(&mut self, time_signature: TimeSignature) {
        self.c.update_time_signature(time_signature);
    }

    fn reset(&mut self) {
        self.mode = SessionMode::Idle;
        self.recorder.clear();
        self.matrices = None;
    }
}
impl HandlesMidi for MarkovSession {
    fn handle_midi_message(
        &mut self,
        when: Seconds,
        channel: MidiChannel,
        message: MidiMessage,
        melody_events_fn: &mut MelodyEventsFn,
    ) {
        match message {
            MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. } => {
                if self.mode == SessionMode::Learning {
                    self.recorder
                        .handle_midi_message(when, channel, message, melody_events_fn);
                }
            }
            MidiMessage::Controller { controller, value } => {
                match ControlCommand::from_midi(channel, controller, value) {
                    Some(command) => self.handle_command(command, melody_events_fn),
                    None => log::debug!(
                        "ignoring controller {} = {} on channel {}",
                        controller.as_int(),
                        value.as_int(),
                        channel.0
                    ),
                }
            }
            _ => {}
        }
    }
}
impl MarkovSession {
    #[allow(missing_docs)]
    pub fn new_with(settings: &SessionSettings) -> Self {
        Self {
            mode: SessionMode::default(),
            c: Configurables::new_with(settings.tempo(), settings.time_signature()),
            recorder: EventStreamRecorder::new_with(settings.tempo()),
            matrices: None,
            rng: settings
                .seed()
                .map_or_else(Rng::default, Rng::new_with_seed),
            velocity: settings.velocity(),
        }
    }

    /// Carries out a command. A generated melody, if any, goes to
    /// `melody_events_fn`.
    pub fn handle_command(
        &mut self,
        command: ControlCommand,
        melody_events_fn: &mut MelodyEventsFn,
    ) {
        match command {
            ControlCommand::StartLearning => {
                self.recorder.clear();
                self.mode = SessionMode::Learning;
                log::info!("{} from a fresh recording", self.mode);
            }
            ControlCommand::StopLearning => {
                self.mode = SessionMode::Idle;
                log::info!(
                    "{} with {} notes recorded",
                    self.mode,
                    self.recorder.stream().len()
                );
            }
            ControlCommand::Generate { measures } => {
                self.mode = SessionMode::Idle;
                match self.generate(measures) {
                    Ok(melody) => melody.into_iter().for_each(|e| melody_events_fn(e)),
                    Err(e) => log::warn!("not generating: {e}"),
                }
            }
            ControlCommand::SetTempo(tempo) => {
                self.update_tempo(tempo);
                log::info!("tempo is now {tempo}");
            }
            ControlCommand::SetTimeSignature(time_signature) => {
                self.update_time_signature(time_signature);
                log::info!("meter is now {time_signature}");
            }
        }
    }

    /// Learns from the recorded stream at the current meter, replacing any
    /// previously learned matrices, and then generates `measures` measures.
    /// If the stream is too short to learn from, the previous matrices are
    /// left alone and nothing is generated.
    pub fn generate(&mut self, measures: usize) -> Result<Vec<MelodyEvent>, MarkovError> {
        let matrices =
            TransitionMatrixBuilder::new_with(self.time_signature()).build(self.recorder.stream())?;
        let matrices = self.matrices.insert(matrices);
        MelodyGenerator::new_with(matrices, &mut self.rng, self.velocity).generate_melody(measures)
    }

    /// Handles a message, then hands whatever it generated to `player` at
    /// the session's tempo.
    pub fn handle_and_play(
        &mut self,
        when: Seconds,
        channel: MidiChannel,
        message: MidiMessage,
        player: &mut dyn PlaysMelodies,
    ) {
        let mut melody = Vec::default();
        self.handle_midi_message(when, channel, message, &mut |e| melody.push(e));
        if !melody.is_empty() {
            player.play_all(&melody, self.tempo());
        }
    }

    #[allow(missing_docs)]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// The notes recorded in the current (or most recent) learning epoch.
    pub fn event_stream(&self) -> &[LearnedNote] {
        self.recorder.stream()
    }

    /// The most recently learned model, if any.
    pub fn matrices(&self) -> Option<&TransitionMatrices> {
        self.matrices.as_ref()
    }
}
