// Copyright (c) 2024 Mike Tsao

//! The `markov-listener` example connects a MIDI keyboard to a
//! [MarkovSession]. Play something between a start-learning and a generate
//! command, and it plays back an improvisation in the same style.
//!
//! Control changes on channel 1 (channel 0 on the wire):
//!
//! * CC 0 = 0: start learning
//! * CC 1 = 0: stop learning
//! * CC 0 = n: learn, then play n measures
//! * CC 1 = n: tempo n BPM
//! * CC 2 = n: tempo n + 128 BPM
//!
//! Any CC m = n on channel 2 sets the meter to n/m.

use clap::Parser;
use ensnare_markov::{prelude::*, types::MidiPortDescriptor, util::SessionSettingsBuilder};
use ensnare_markov_services::prelude::*;

/// The program's command-line arguments.
#[derive(clap::Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    version: bool,

    /// List MIDI ports and exit
    #[clap(short = 'l', long, value_parser)]
    list: bool,

    /// Listen to the first MIDI input whose name contains this text
    #[clap(short = 'i', long)]
    input: Option<String>,

    /// Play to the first MIDI output whose name contains this text
    #[clap(short = 'o', long)]
    output: Option<String>,

    /// Starting tempo
    #[clap(short = 'b', long, default_value_t = 60)]
    bpm: u16,

    /// Starting meter, such as 3/4
    #[clap(short = 'm', long, default_value = "4/4")]
    meter: TimeSignature,

    /// Seed for reproducible improvisations
    #[clap(short = 's', long)]
    seed: Option<u128>,
}

fn pick_port(ports: &[MidiPortDescriptor], wanted: &Option<String>) -> Option<usize> {
    match wanted {
        Some(text) => ports
            .iter()
            .find(|p| p.name.contains(text.as_str()))
            .map(|p| p.index),
        None => ports.first().map(|p| p.index),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.version {
        eprintln!("{}", ensnare_markov::app_version());
        return Ok(());
    }

    env_logger::init();

    let mut builder = SessionSettingsBuilder::default();
    builder
        .tempo(Tempo::from(args.bpm))
        .time_signature(args.meter);
    if let Some(seed) = args.seed {
        builder.seed(seed);
    }
    let settings = builder.build()?;
    let mut session = MarkovSession::new_with(&settings);

    // Note that we need to keep the service in scope even though we mostly
    // talk to it through its channels. If we don't keep the reference, it will
    // be dropped.
    let service = MidiService::default();
    let receiver = service.receiver().clone();
    let mut player = MidiPlayer::new_with(service.sender().clone(), MidiChannel::default());

    service.send_input(MidiServiceInput::RefreshPorts);
    while let Ok(event) = receiver.recv() {
        match event {
            MidiServiceEvent::InputPorts(ports) => {
                if args.list {
                    println!("Inputs:");
                    ports.iter().for_each(|p| println!("  {p}"));
                } else if let Some(index) = pick_port(&ports, &args.input) {
                    service.send_input(MidiServiceInput::SelectInput(index));
                } else {
                    anyhow::bail!("no matching MIDI input among {ports:?}");
                }
            }
            MidiServiceEvent::OutputPorts(ports) => {
                if args.list {
                    println!("Outputs:");
                    ports.iter().for_each(|p| println!("  {p}"));
                    service.send_input(MidiServiceInput::Quit);
                } else if let Some(index) = pick_port(&ports, &args.output) {
                    service.send_input(MidiServiceInput::SelectOutput(index));
                } else {
                    anyhow::bail!("no matching MIDI output among {ports:?}");
                }
            }
            MidiServiceEvent::InputPortSelected(port) => {
                println!("Listening to {port}. Send CC 0 = 0 on channel 1 to start learning.");
            }
            MidiServiceEvent::OutputPortSelected(port) => {
                println!("Improvisations will play on {port}.");
            }
            MidiServiceEvent::Midi(when, channel, message) => {
                session.handle_and_play(when, channel, message, &mut player);
            }
            MidiServiceEvent::Error(e) => {
                log::error!("{e}");
            }
            MidiServiceEvent::Quit => break,
        }
    }

    Ok(())
}
