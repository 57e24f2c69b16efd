//! MIDI channel messages and their wire encoding.

use std::fmt;

pub const NOTE_OFF:       u8 = 0x80;
pub const NOTE_ON:        u8 = 0x90;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const PITCH_BEND:     u8 = 0xE0;

pub const PITCH_BEND_MIN: i16 = -8192;
pub const PITCH_BEND_MAX: i16 = 8191;

/// One outgoing channel message.  Channels are 0–15.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MidiMessage {
    NoteOn        { channel: u8, note: u8, velocity: u8 },
    NoteOff       { channel: u8, note: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Signed bend, −8192..=8191, 0 = centre.
    PitchBend     { channel: u8, value: i16 },
}

impl MidiMessage {
    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::NoteOn        { channel, .. }
            | MidiMessage::NoteOff       { channel, .. }
            | MidiMessage::ControlChange { channel, .. }
            | MidiMessage::PitchBend     { channel, .. } => channel,
        }
    }

    /// Note number for note-on / note-off messages.
    pub fn note(&self) -> Option<u8> {
        match *self {
            MidiMessage::NoteOn { note, .. } | MidiMessage::NoteOff { note, .. } => Some(note),
            _ => None,
        }
    }

    pub fn is_note_on(&self)  -> bool { matches!(self, MidiMessage::NoteOn  { .. }) }
    pub fn is_note_off(&self) -> bool { matches!(self, MidiMessage::NoteOff { .. }) }

    /// Three-byte wire form.  Data bytes are masked to 7 bits.
    pub fn to_bytes(&self) -> [u8; 3] {
        let ch = self.channel() & 0x0F;
        match *self {
            MidiMessage::NoteOn { note, velocity, .. } =>
                [NOTE_ON | ch, note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff { note, velocity, .. } =>
                [NOTE_OFF | ch, note & 0x7F, velocity & 0x7F],
            MidiMessage::ControlChange { controller, value, .. } =>
                [CONTROL_CHANGE | ch, controller & 0x7F, value & 0x7F],
            MidiMessage::PitchBend { value, .. } => {
                // 14-bit unsigned, 8192 = centre, LSB first.
                let raw = (i32::from(value) + 8192).clamp(0, 16383) as u16;
                [PITCH_BEND | ch, (raw & 0x7F) as u8, ((raw >> 7) & 0x7F) as u8]
            }
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::NoteOn { channel, note, velocity } =>
                write!(f, "note_on        ch={:<2} note={:<3} velocity={}", channel, note, velocity),
            MidiMessage::NoteOff { channel, note, velocity } =>
                write!(f, "note_off       ch={:<2} note={:<3} velocity={}", channel, note, velocity),
            MidiMessage::ControlChange { channel, controller, value } =>
                write!(f, "control_change ch={:<2} cc={:<5} value={}", channel, controller, value),
            MidiMessage::PitchBend { channel, value } =>
                write!(f, "pitch_bend     ch={:<2} value={}", channel, value),
        }
    }
}

/// Round to the nearest integer and clamp into 0–127.
pub fn to_7bit(v: f32) -> u8 {
    if v.is_nan() { return 0; }
    v.round().clamp(0.0, 127.0) as u8
}

/// Round to the nearest integer and clamp into the pitch-bend range.
pub fn to_pitch_bend(v: f32) -> i16 {
    if v.is_nan() { return 0; }
    v.round().clamp(f32::from(PITCH_BEND_MIN), f32::from(PITCH_BEND_MAX)) as i16
}
