// Copyright (c) 2024 Mike Tsao

//! Provides MIDI interface services.

use crate::service::{CrossbeamChannel, ProvidesService};
use anyhow::anyhow;
use crossbeam::channel::Sender;
use ensnare_markov::{prelude::*, types::MidiPortDescriptor};
use midir::{
    Ignore, MidiInput, MidiInputConnection, MidiInputPort, MidiOutput, MidiOutputConnection,
    MidiOutputPort,
};

const CLIENT_NAME: &str = "ensnare-markov";

/// The client sends requests to the MIDI interface through [MidiServiceInput]
/// messages.
///
/// "input" and "output" are from the perspective of the MIDI interface. For
/// example, suppose MIDI keyboard K is connected to MIDI interface I, which is
/// connected to PC P, and MIDI synthesizer S is connected to I's output. When
/// the user presses a key on K, it goes *in* to I's *input* and then to P. When
/// P generates a MIDI message, it sends it *out* via I through I's *output* to
/// S.
#[derive(Clone, Debug)]
pub enum MidiServiceInput {
    /// Requests a rescan of the MIDI input/output ports.
    RefreshPorts,

    /// The user has picked a MIDI input, by its index in the most recent
    /// [MidiServiceEvent::InputPorts]. Switch to it.
    SelectInput(usize),

    /// The user has picked a MIDI output, by its index in the most recent
    /// [MidiServiceEvent::OutputPorts]. Switch to it.
    SelectOutput(usize),

    /// The application wants to send a MIDI message to external hardware.
    Midi(MidiChannel, MidiMessage),

    /// The app is ready to quit, so the service should end.
    Quit,
}

/// The service provides updates to the client through [MidiServiceEvent]
/// messages.
#[derive(Clone, Debug)]
pub enum MidiServiceEvent {
    /// The MIDI input ports have been updated.
    InputPorts(Vec<MidiPortDescriptor>),

    /// A new input port has been selected.
    InputPortSelected(MidiPortDescriptor),

    /// The MIDI output ports have been updated.
    OutputPorts(Vec<MidiPortDescriptor>),

    /// A new output port has been selected.
    OutputPortSelected(MidiPortDescriptor),

    /// A MIDI message has arrived from external hardware. The timestamp comes
    /// from the driver and is relative to when the input was connected.
    Midi(Seconds, MidiChannel, MidiMessage),

    /// Something went wrong while handling a [MidiServiceInput].
    Error(String),

    /// The MIDI engine has successfully processed [MidiServiceInput::Quit], and
    /// the service will go away shortly.
    Quit,
}

/// Wraps the [midir](https://crates.io/crates/midir) crate with a
/// crossbeam-channels interface.
#[derive(Debug)]
pub struct MidiService {
    inputs: CrossbeamChannel<MidiServiceInput>,
    events: CrossbeamChannel<MidiServiceEvent>,
}
impl Default for MidiService {
    fn default() -> Self {
        Self::new()
    }
}
impl MidiService {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
        };

        r.start_thread();
        r
    }

    fn start_thread(&self) {
        let receiver = self.inputs.receiver.clone();
        let sender = self.events.sender.clone();
        std::thread::spawn(move || {
            let mut interface = MidiInterface::new_with(sender.clone());
            while let Ok(input) = receiver.recv() {
                let result = match input {
                    MidiServiceInput::RefreshPorts => interface.refresh_ports(),
                    MidiServiceInput::SelectInput(index) => interface
                        .select_input(index)
                        .map(|port| interface.report(MidiServiceEvent::InputPortSelected(port))),
                    MidiServiceInput::SelectOutput(index) => interface
                        .select_output(index)
                        .map(|port| interface.report(MidiServiceEvent::OutputPortSelected(port))),
                    MidiServiceInput::Midi(channel, message) => interface.send(channel, message),
                    MidiServiceInput::Quit => {
                        interface.report(MidiServiceEvent::Quit);
                        break;
                    }
                };
                if let Err(e) = result {
                    log::warn!("MidiService: {e}");
                    interface.report(MidiServiceEvent::Error(e.to_string()));
                }
            }
        });
    }
}
impl ProvidesService<MidiServiceInput, MidiServiceEvent> for MidiService {
    fn sender(&self) -> &crossbeam::channel::Sender<MidiServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &crossbeam::channel::Receiver<MidiServiceEvent> {
        &self.events.receiver
    }
}

// Lives on the service thread. midir connections are created and dropped
// here.
struct MidiInterface {
    events: Sender<MidiServiceEvent>,
    input_ports: Vec<MidiInputPort>,
    output_ports: Vec<MidiOutputPort>,
    input_connection: Option<MidiInputConnection<()>>,
    output_connection: Option<MidiOutputConnection>,
}
impl MidiInterface {
    fn new_with(events: Sender<MidiServiceEvent>) -> Self {
        Self {
            events,
            input_ports: Default::default(),
            output_ports: Default::default(),
            input_connection: None,
            output_connection: None,
        }
    }

    fn report(&self, event: MidiServiceEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("MidiService: nobody is listening: {e:?}");
        }
    }

    fn refresh_ports(&mut self) -> anyhow::Result<()> {
        let midi_in = MidiInput::new(CLIENT_NAME)?;
        self.input_ports = midi_in.ports();
        let inputs = Self::describe(&self.input_ports, |p| midi_in.port_name(p).ok());
        self.report(MidiServiceEvent::InputPorts(inputs));

        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        self.output_ports = midi_out.ports();
        let outputs = Self::describe(&self.output_ports, |p| midi_out.port_name(p).ok());
        self.report(MidiServiceEvent::OutputPorts(outputs));
        Ok(())
    }

    fn describe<P>(ports: &[P], name_of: impl Fn(&P) -> Option<String>) -> Vec<MidiPortDescriptor> {
        ports
            .iter()
            .enumerate()
            .map(|(index, port)| MidiPortDescriptor {
                index,
                name: name_of(port).unwrap_or_else(|| format!("MIDI port {index}")),
            })
            .collect()
    }

    fn select_input(&mut self, index: usize) -> anyhow::Result<MidiPortDescriptor> {
        let port = self
            .input_ports
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("there is no MIDI input #{index}"))?;
        self.input_connection = None;

        let mut midi_in = MidiInput::new(CLIENT_NAME)?;
        midi_in.ignore(Ignore::All);
        let name = midi_in.port_name(&port)?;
        let sender = self.events.clone();
        let connection = midi_in
            .connect(
                &port,
                "ensnare-markov-input",
                move |stamp, bytes, _| {
                    if let Some((channel, message)) = MidiUtils::parse(bytes) {
                        let event =
                            MidiServiceEvent::Midi(Seconds::from_micros(stamp), channel, message);
                        if let Err(e) = sender.try_send(event) {
                            log::warn!("Failed to forward MIDI message: {e}");
                        }
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("couldn't connect to MIDI input {name}: {e}"))?;
        self.input_connection = Some(connection);
        log::info!("listening to {name}");
        Ok(MidiPortDescriptor { index, name })
    }

    fn select_output(&mut self, index: usize) -> anyhow::Result<MidiPortDescriptor> {
        let port = self
            .output_ports
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("there is no MIDI output #{index}"))?;
        self.output_connection = None;

        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let name = midi_out.port_name(&port)?;
        let connection = midi_out
            .connect(&port, "ensnare-markov-output")
            .map_err(|e| anyhow!("couldn't connect to MIDI output {name}: {e}"))?;
        self.output_connection = Some(connection);
        log::info!("playing to {name}");
        Ok(MidiPortDescriptor { index, name })
    }

    fn send(&mut self, channel: MidiChannel, message: MidiMessage) -> anyhow::Result<()> {
        let Some(connection) = self.output_connection.as_mut() else {
            return Err(anyhow!("no MIDI output is selected"));
        };
        let bytes = MidiUtils::to_bytes(channel, message)?;
        connection.send(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn midi_service() {
        let _s = MidiService::default();
    }

    #[test]
    fn bad_requests_are_reported() {
        let s = MidiService::default();

        // No ports have been scanned, so there's nothing to select.
        s.send_input(MidiServiceInput::SelectInput(3));
        assert!(matches!(
            s.receiver().recv_timeout(Duration::from_secs(5)),
            Ok(MidiServiceEvent::Error(_))
        ));

        s.send_input(MidiServiceInput::Midi(
            MidiChannel::default(),
            MidiUtils::new_note_on(60, 100),
        ));
        assert!(matches!(
            s.receiver().recv_timeout(Duration::from_secs(5)),
            Ok(MidiServiceEvent::Error(_))
        ));

        s.send_input(MidiServiceInput::Quit);
        assert!(matches!(
            s.receiver().recv_timeout(Duration::from_secs(5)),
            Ok(MidiServiceEvent::Quit)
        ));
    }
}
