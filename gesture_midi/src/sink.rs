//! Where MIDI messages go.
//!
//! The engine only ever talks to a [`MidiSink`]; the hardware/virtual port
//! lives in the application crate.  Sends are fire-and-forget: a failure is
//! reported to the caller, who logs it and carries on with the next message.

use thiserror::Error;
use tracing::info;

use crate::message::MidiMessage;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("MIDI send failed: {0}")]
    Send(String),
}

// ════════════════════════════════════════════════════════════════════════════
// MidiSink trait
// ════════════════════════════════════════════════════════════════════════════

pub trait MidiSink {
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError>;
    fn note_off(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError>;
    fn control_change(&mut self, channel: u8, controller: u8, value: u8) -> Result<(), SinkError>;
    /// `value` is signed, −8192..=8191.
    fn pitch_bend(&mut self, channel: u8, value: i16) -> Result<(), SinkError>;

    fn send(&mut self, message: &MidiMessage) -> Result<(), SinkError> {
        match *message {
            MidiMessage::NoteOn { channel, note, velocity } =>
                self.note_on(channel, note, velocity),
            MidiMessage::NoteOff { channel, note, velocity } =>
                self.note_off(channel, note, velocity),
            MidiMessage::ControlChange { channel, controller, value } =>
                self.control_change(channel, controller, value),
            MidiMessage::PitchBend { channel, value } =>
                self.pitch_bend(channel, value),
        }
    }
}

impl<S: MidiSink + ?Sized> MidiSink for Box<S> {
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        (**self).note_on(channel, note, velocity)
    }
    fn note_off(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        (**self).note_off(channel, note, velocity)
    }
    fn control_change(&mut self, channel: u8, controller: u8, value: u8) -> Result<(), SinkError> {
        (**self).control_change(channel, controller, value)
    }
    fn pitch_bend(&mut self, channel: u8, value: i16) -> Result<(), SinkError> {
        (**self).pitch_bend(channel, value)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RecordingSink
// ════════════════════════════════════════════════════════════════════════════

/// Keeps every message it is given, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSink {
    messages: Vec<MidiMessage>,
}

impl RecordingSink {
    pub fn new() -> Self { Self::default() }

    pub fn messages(&self) -> &[MidiMessage] { &self.messages }

    /// Hand back everything recorded so far and start afresh.
    pub fn take(&mut self) -> Vec<MidiMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn clear(&mut self) { self.messages.clear(); }

    pub fn len(&self) -> usize { self.messages.len() }

    pub fn is_empty(&self) -> bool { self.messages.is_empty() }

    /// Note numbers still sounding after replaying the recording.
    pub fn held_notes(&self) -> Vec<u8> {
        let mut held: Vec<u8> = Vec::new();
        for m in &self.messages {
            match *m {
                MidiMessage::NoteOn  { note, .. } => if !held.contains(&note) { held.push(note) },
                MidiMessage::NoteOff { note, .. } => held.retain(|&n| n != note),
                _ => {}
            }
        }
        held
    }
}

impl MidiSink for RecordingSink {
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.messages.push(MidiMessage::NoteOn { channel, note, velocity });
        Ok(())
    }
    fn note_off(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.messages.push(MidiMessage::NoteOff { channel, note, velocity });
        Ok(())
    }
    fn control_change(&mut self, channel: u8, controller: u8, value: u8) -> Result<(), SinkError> {
        self.messages.push(MidiMessage::ControlChange { channel, controller, value });
        Ok(())
    }
    fn pitch_bend(&mut self, channel: u8, value: i16) -> Result<(), SinkError> {
        self.messages.push(MidiMessage::PitchBend { channel, value });
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LogSink
// ════════════════════════════════════════════════════════════════════════════

/// Writes each message to the log instead of a port.  Used for dry runs.
#[derive(Clone, Debug, Default)]
pub struct LogSink {
    sent: u64,
}

impl LogSink {
    pub fn new() -> Self { Self::default() }

    pub fn sent(&self) -> u64 { self.sent }

    fn log(&mut self, message: MidiMessage) -> Result<(), SinkError> {
        self.sent += 1;
        info!(target: "gesture_midi::out", bytes = ?message.to_bytes(), "{}", message);
        Ok(())
    }
}

impl MidiSink for LogSink {
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.log(MidiMessage::NoteOn { channel, note, velocity })
    }
    fn note_off(&mut self, channel: u8, note: u8, velocity: u8) -> Result<(), SinkError> {
        self.log(MidiMessage::NoteOff { channel, note, velocity })
    }
    fn control_change(&mut self, channel: u8, controller: u8, value: u8) -> Result<(), SinkError> {
        self.log(MidiMessage::ControlChange { channel, controller, value })
    }
    fn pitch_bend(&mut self, channel: u8, value: i16) -> Result<(), SinkError> {
        self.log(MidiMessage::PitchBend { channel, value })
    }
}
