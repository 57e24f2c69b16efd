//! MIDI output port.
//!
//! Opens a `midir` connection and exposes it as a [`MidiSink`].  Port
//! choice: the first port whose name contains the hint (case-insensitive),
//! otherwise the first software synth, otherwise the first port.

use gesture_midi::{MidiMessage, MidiSink, SinkError};
use midir::{MidiOutput, MidiOutputConnection};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CLIENT_NAME: &str = "gesture_sound";

/// Name of the virtual loopback port the DAW listens on.
pub const DEFAULT_PORT_HINT: &str = "GestureSound";

const SOFTSYNTH_HINTS: [&str; 5] = ["fluid", "timidity", "microsoft", "gm", "synth"];

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("MIDI init failed: {0}")]
    Init(#[from] midir::InitError),
    #[error("no MIDI output ports found (start a synth or create a virtual port)")]
    NoPorts,
    #[error("cannot read MIDI port name: {0}")]
    PortInfo(#[from] midir::PortInfoError),
    #[error("failed to connect to MIDI port {port:?}: {reason}")]
    Connect { port: String, reason: String },
}

// ════════════════════════════════════════════════════════════════════════════
// Port discovery
// ════════════════════════════════════════════════════════════════════════════

pub fn list_ports() -> Result<Vec<String>, OutputError> {
    let midi_out = MidiOutput::new(CLIENT_NAME)?;
    midi_out.ports().iter()
        .map(|p| midi_out.port_name(p).map_err(OutputError::from))
        .collect()
}

/// Index of the port to open, or `None` when there are no ports.
pub fn choose_port(names: &[String], hint: Option<&str>) -> Option<usize> {
    if names.is_empty() {
        return None;
    }
    let lower: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

    let wanted = hint.unwrap_or(DEFAULT_PORT_HINT).to_lowercase();
    if let Some(i) = lower.iter().position(|n| n.contains(&wanted)) {
        return Some(i);
    }
    if let Some(h) = hint {
        warn!(hint = h, "no MIDI port matches; falling back");
    }

    lower.iter()
        .position(|n| SOFTSYNTH_HINTS.iter().any(|s| n.contains(s)))
        .or(Some(0))
}

// ════════════════════════════════════════════════════════════════════════════
// MidirSink
// ════════════════════════════════════════════════════════════════════════════

pub struct MidirSink {
    conn: MidiOutputConnection,
    port: String,
}

impl MidirSink {
    pub fn port_name(&self) -> &str { &self.port }

    fn write(&mut self, message: MidiMessage) -> Result<(), SinkError> {
        self.conn.send(&message.to_bytes())
            .map_err(|e| SinkError::Send(e.to_string()))
    }
}

impl MidiSink for MidirSink {
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.write(MidiMessage::NoteOn { channel, note, velocity })
    }
    fn note_off(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.write(MidiMessage::NoteOff { channel, note, velocity })
    }
    fn control_change(&mut self, channel: u8, controller: u8, value: u8) -> Result<(), SinkError> {
        self.write(MidiMessage::ControlChange { channel, controller, value })
    }
    fn pitch_bend(&mut self, channel: u8, value: i16) -> Result<(), SinkError> {
        self.write(MidiMessage::PitchBend { channel, value })
    }
}

impl Drop for MidirSink {
    fn drop(&mut self) {
        debug!(port = %self.port, "closing MIDI port");
    }
}

/// Connect to an output port.  Failure here is fatal to the caller; no
/// frames have been processed yet.
pub fn open_midi_output(hint: Option<&str>) -> Result<MidirSink, OutputError> {
    let midi_out = MidiOutput::new(CLIENT_NAME)?;
    let ports = midi_out.ports();

    let names = ports.iter()
        .map(|p| midi_out.port_name(p))
        .collect::<Result<Vec<_>, _>>()?;
    let idx = choose_port(&names, hint).ok_or(OutputError::NoPorts)?;
    let port = names[idx].clone();

    info!(port = %port, "opening MIDI port");
    let conn = midi_out.connect(&ports[idx], "gesture-out")
        .map_err(|e| OutputError::Connect { port: port.clone(), reason: e.to_string() })?;

    Ok(MidirSink { conn, port })
}
