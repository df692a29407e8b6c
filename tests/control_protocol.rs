// Copyright (c) 2024 Mike Tsao

use ensnare_markov::prelude::*;

// Sends raw wire bytes, as a device would, and returns whatever was played.
fn wire(session: &mut MarkovSession, when: f64, bytes: &[u8]) -> Vec<MelodyEvent> {
    let mut player = CollectingPlayer::default();
    if let Some((channel, message)) = MidiUtils::parse(bytes) {
        session.handle_and_play(Seconds(when), channel, message, &mut player);
    }
    player.events().to_vec()
}

#[test]
fn transport_from_the_wire() {
    let mut session = MarkovSession::default();

    // CC 0 = 0 on the first channel.
    wire(&mut session, 0.0, &[0xB0, 0, 0]);
    assert_eq!(session.mode(), SessionMode::Learning);
    wire(&mut session, 0.0, &[0x90, 60, 100]);
    wire(&mut session, 1.0, &[0x80, 60, 0]);
    assert_eq!(session.event_stream().len(), 1);

    // CC 1 = 0 stops.
    wire(&mut session, 1.0, &[0xB0, 1, 0]);
    assert_eq!(session.mode(), SessionMode::Idle);
    wire(&mut session, 2.0, &[0x90, 62, 100]);
    wire(&mut session, 3.0, &[0x80, 62, 0]);
    assert_eq!(session.event_stream().len(), 1);
}

#[test]
fn tempo_and_meter_from_the_wire() {
    let mut session = MarkovSession::default();
    assert_eq!(session.tempo(), Tempo(60.0));
    assert_eq!(session.time_signature(), TimeSignature::COMMON_TIME);

    wire(&mut session, 0.0, &[0xB0, 1, 127]);
    assert_eq!(session.tempo(), Tempo(127.0));
    wire(&mut session, 0.0, &[0xB0, 2, 127]);
    assert_eq!(session.tempo(), Tempo(255.0));
    wire(&mut session, 0.0, &[0xB0, 2, 1]);
    assert_eq!(session.tempo(), Tempo(129.0));

    // Meter lives on the second channel: controller is the bottom, value the
    // top.
    wire(&mut session, 0.0, &[0xB1, 8, 6]);
    assert_eq!(session.time_signature(), TimeSignature::new_with(6, 8).unwrap());
}

#[test]
fn everything_else_is_ignored() {
    let mut session = MarkovSession::default();
    for bytes in [
        [0xB0, 2, 0],    // high-range tempo of zero
        [0xB0, 7, 100],  // volume
        [0xB0, 64, 127], // sustain pedal
        [0xB1, 0, 3],    // meter with a zero bottom
        [0xB1, 4, 0],    // meter with a zero top
        [0xB2, 0, 0],    // start learning, wrong channel
        [0xBF, 1, 90],   // tempo, wrong channel
        [0xE0, 0, 64],   // pitch bend
    ] {
        assert!(wire(&mut session, 0.0, &bytes).is_empty());
        assert_eq!(session.mode(), SessionMode::Idle);
        assert_eq!(session.tempo(), Tempo(60.0));
        assert_eq!(session.time_signature(), TimeSignature::COMMON_TIME);
    }
}

#[test]
fn generating_stops_learning() {
    let mut session = MarkovSession::default();
    wire(&mut session, 0.0, &[0xB0, 0, 0]);
    for (i, key) in [67u8, 65, 64, 62, 60].iter().enumerate() {
        let on = i as f64 * 0.5;
        wire(&mut session, on, &[0x90, *key, 90]);
        wire(&mut session, on + 0.5, &[0x80, *key, 0]);
    }
    let played = wire(&mut session, 5.0, &[0xB0, 0, 3]);
    assert_eq!(session.mode(), SessionMode::Idle);
    assert!(!played.is_empty());
    assert!(played.first().is_some_and(|e| e.is_note_on()));
    assert!(played.last().is_some_and(|e| !e.is_note_on()));
}
