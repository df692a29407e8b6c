// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use synonym::Synonym;

pub use midly::{
    num::{u4, u7},
    MidiMessage,
};

/// A MIDI channel, zero-based as it is on the wire. Most devices label
/// these 1 through 16.
#[derive(Synonym, Serialize, Deserialize)]
pub struct MidiChannel(pub u8);
impl MidiChannel {
    /// Transport and tempo commands arrive here.
    pub const TRANSPORT: Self = Self(0);
    /// Meter commands arrive here.
    pub const METER: Self = Self(1);
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
impl From<MidiChannel> for u4 {
    fn from(value: MidiChannel) -> Self {
        u4::from_int_lossy(value.0)
    }
}

/// Names a MIDI port found during the most recent scan.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MidiPortDescriptor {
    /// Position in the scan's port list. Select a port by this number.
    pub index: usize,
    /// What the driver calls the port.
    pub name: String,
}
impl std::fmt::Display for MidiPortDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
