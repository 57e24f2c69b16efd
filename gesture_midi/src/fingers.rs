//! Right-hand finger notes.
//!
//! Each long finger owns one note.  A note starts when its finger straightens
//! and stops when it curls; nothing is sent while a finger holds still, so
//! landmark jitter inside one state never re-triggers a note.

use hand_pose::{FingerId, HandPose};
use tracing::trace;

use crate::config::FingerNoteTable;
use crate::message::{to_7bit, MidiMessage};

/// `50 + (1 − tip_y) × 77`, clamped to 0–127.  Higher on screen is louder.
pub fn note_velocity(tip_y: f32) -> u8 {
    to_7bit(50.0 + (1.0 - tip_y) * 77.0)
}

/// On/off state of one finger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerNoteState {
    active: bool,
}

impl FingerNoteState {
    pub fn is_active(&self) -> bool { self.active }

    /// Feed this frame's extension.  Returns the new state on a flip.
    pub fn update(&mut self, extended: bool) -> Option<bool> {
        if extended == self.active {
            return None;
        }
        self.active = extended;
        Some(extended)
    }

    /// Force off.  `true` if the finger was sounding.
    pub fn clear(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerNotes
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct FingerNotes {
    channel: u8,
    notes:   [u8; 4],
    margin:  f32,
    states:  [FingerNoteState; 4],
}

impl FingerNotes {
    pub fn new(channel: u8, table: FingerNoteTable, margin: f32) -> Self {
        FingerNotes {
            channel,
            notes:  table.as_array(),
            margin,
            states: [FingerNoteState::default(); 4],
        }
    }

    fn slot(finger: FingerId) -> Option<usize> {
        FingerId::LONG.iter().position(|&f| f == finger)
    }

    /// The note a finger plays; `None` for the thumb.
    pub fn note(&self, finger: FingerId) -> Option<u8> {
        Self::slot(finger).map(|i| self.notes[i])
    }

    pub fn is_active(&self, finger: FingerId) -> bool {
        Self::slot(finger).is_some_and(|i| self.states[i].is_active())
    }

    pub fn active_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_active()).count()
    }

    /// Run one frame of the edge detector for `hand`, appending any note
    /// events to `out`.
    pub fn step(&mut self, hand: &HandPose, out: &mut Vec<MidiMessage>) {
        for (i, finger) in FingerId::LONG.into_iter().enumerate() {
            let extended = hand.is_finger_extended_relative(finger, self.margin);
            let note = self.notes[i];
            match self.states[i].update(extended) {
                Some(true) => {
                    let velocity = note_velocity(hand.tip(finger).y);
                    trace!(finger = finger.name(), note, velocity, "finger on");
                    out.push(MidiMessage::NoteOn { channel: self.channel, note, velocity });
                }
                Some(false) => {
                    trace!(finger = finger.name(), note, "finger off");
                    out.push(MidiMessage::NoteOff { channel: self.channel, note, velocity: 0 });
                }
                None => {}
            }
        }
    }

    /// Turn every sounding finger off.
    pub fn release_all(&mut self, out: &mut Vec<MidiMessage>) {
        for (state, &note) in self.states.iter_mut().zip(&self.notes) {
            if state.clear() {
                out.push(MidiMessage::NoteOff { channel: self.channel, note, velocity: 0 });
            }
        }
    }
}
