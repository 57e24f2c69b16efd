//! Pulse mode: every recognised gesture sounds one short note.
//!
//! Each hand that is classified as anything but Unknown fires a note-on at
//! a fixed velocity.  The matching note-off is queued with a deadline
//! `hold` after the frame time and goes out with the first frame that
//! reaches it.  Re-firing a note that is still held closes it first, so
//! on/off always pair on the wire.

use std::time::Duration;

use hand_pose::{classify, ClassifierConfig, PoseFrame};
use tracing::{debug, trace};

use crate::config::{EngineConfig, EngineMode, GestureNoteTable};
use crate::engine::{GestureEngine, HandGestures};
use crate::message::MidiMessage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingOff {
    note: u8,
    due:  Duration,
}

pub struct PulseEngine {
    channel:    u8,
    velocity:   u8,
    hold:       Duration,
    table:      GestureNoteTable,
    classifier: ClassifierConfig,
    pending:    Vec<PendingOff>,
    gestures:   HandGestures,
}

impl PulseEngine {
    pub fn new(config: EngineConfig) -> Self {
        PulseEngine {
            channel:    config.channel,
            velocity:   config.pulse_velocity,
            hold:       config.pulse_hold(),
            table:      config.gesture_notes,
            classifier: config.classifier(),
            pending:    Vec::new(),
            gestures:   HandGestures::default(),
        }
    }

    /// Notes currently held, waiting for their note-off.
    pub fn held(&self) -> Vec<u8> {
        self.pending.iter().map(|p| p.note).collect()
    }

    fn note_off(&self, note: u8) -> MidiMessage {
        MidiMessage::NoteOff { channel: self.channel, note, velocity: 0 }
    }
}

impl GestureEngine for PulseEngine {
    fn mode(&self) -> EngineMode { EngineMode::Pulse }

    fn step(&mut self, frame: &PoseFrame) -> Vec<MidiMessage> {
        let now = frame.elapsed;
        let mut out = Vec::new();

        // ── expired holds ──
        let channel = self.channel;
        self.pending.retain(|p| {
            if p.due <= now {
                out.push(MidiMessage::NoteOff { channel, note: p.note, velocity: 0 });
                false
            } else {
                true
            }
        });

        // ── new pulses ──
        let hands = frame.pair();
        let labels = HandGestures {
            left:  hands.left.map(|h| classify(h, &self.classifier)),
            right: hands.right.map(|h| classify(h, &self.classifier)),
        };
        if labels != self.gestures {
            debug!(seq = frame.sequence, left = ?labels.left, right = ?labels.right, "gesture change");
        }
        self.gestures = labels;

        let mut fired: Vec<u8> = Vec::with_capacity(2);
        for label in [labels.left, labels.right].into_iter().flatten() {
            let Some(note) = self.table.note_for(label) else { continue };
            // both hands on one gesture sound it once
            if fired.contains(&note) {
                continue;
            }
            fired.push(note);
            if let Some(i) = self.pending.iter().position(|p| p.note == note) {
                self.pending.remove(i);
                out.push(self.note_off(note));
            }
            trace!(%label, note, "pulse");
            out.push(MidiMessage::NoteOn { channel, note, velocity: self.velocity });
            self.pending.push(PendingOff { note, due: now + self.hold });
        }

        out
    }

    fn release(&mut self) -> Vec<MidiMessage> {
        let pending = std::mem::take(&mut self.pending);
        pending.into_iter().map(|p| self.note_off(p.note)).collect()
    }

    fn gestures(&self) -> HandGestures { self.gestures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::shape::{HandShape, HandSketch};
    use hand_pose::{GestureLabel, HandPose, Handedness};

    fn engine() -> PulseEngine {
        PulseEngine::new(EngineConfig::default())
    }

    fn hand(h: Handedness, shape: HandShape) -> HandPose {
        HandSketch::shaped(h, shape).build()
    }

    fn at(ms: u64, hands: Vec<HandPose>) -> PoseFrame {
        PoseFrame::new(ms, Duration::from_millis(ms), hands)
    }

    fn on(note: u8)  -> MidiMessage { MidiMessage::NoteOn  { channel: 0, note, velocity: 100 } }
    fn off(note: u8) -> MidiMessage { MidiMessage::NoteOff { channel: 0, note, velocity: 0 } }

    #[test]
    fn pulse_turns_off_after_hold() {
        let mut e = engine();
        assert_eq!(e.step(&at(0, vec![hand(Handedness::Right, HandShape::Point)])), vec![on(62)]);
        assert!(e.step(&at(100, vec![])).is_empty());
        assert!(e.step(&at(199, vec![])).is_empty());
        assert_eq!(e.step(&at(250, vec![])), vec![off(62)]);
        assert!(e.held().is_empty());
    }

    #[test]
    fn unknown_hand_is_silent() {
        let mut e = engine();
        let ring_only = HandSketch::new(Handedness::Right)
            .extend(hand_pose::FingerId::Ring)
            .build();
        assert!(e.step(&at(0, vec![ring_only])).is_empty());
        assert_eq!(e.gestures().right, Some(GestureLabel::Unknown));
    }

    #[test]
    fn held_gesture_retriggers_in_pairs() {
        let mut e = engine();
        let peace = || vec![hand(Handedness::Right, HandShape::Peace)];
        let mut all = e.step(&at(0, peace()));
        all.extend(e.step(&at(33, peace())));
        all.extend(e.step(&at(66, peace())));
        assert_eq!(all, vec![on(64), off(64), on(64), off(64), on(64)]);
        assert_eq!(e.held(), vec![64]);
    }

    #[test]
    fn both_hands_pulse_in_one_frame() {
        let mut e = engine();
        let out = e.step(&at(0, vec![
            hand(Handedness::Left, HandShape::Fist),
            hand(Handedness::Right, HandShape::Combo),
        ]));
        assert_eq!(out, vec![on(67), on(72)]);
    }

    #[test]
    fn shared_gesture_sounds_once_per_frame() {
        let mut e = engine();
        let both = || vec![
            hand(Handedness::Left, HandShape::Point),
            hand(Handedness::Right, HandShape::Point),
        ];
        assert_eq!(e.step(&at(0, both())), vec![on(62)]);
        assert_eq!(e.held(), vec![62]);
        assert_eq!(e.step(&at(33, both())), vec![off(62), on(62)]);
        assert_eq!(e.held(), vec![62]);
    }

    #[test]
    fn every_reachable_shape_has_its_note() {
        let table = GestureNoteTable::default();
        for shape in HandShape::ALL {
            let mut e = engine();
            let out = e.step(&at(0, vec![hand(Handedness::Right, shape)]));
            let label = e.gestures().right.unwrap();
            assert_eq!(out, vec![on(table.note_for(label).unwrap())], "{}", shape.name());
        }
    }

    #[test]
    fn release_flushes_pending() {
        let mut e = engine();
        e.step(&at(0, vec![
            hand(Handedness::Left, HandShape::Open),
            hand(Handedness::Right, HandShape::Pinch),
        ]));
        assert_eq!(e.release(), vec![off(65), off(60)]);
        assert!(e.release().is_empty());
    }

    #[test]
    fn expired_offs_precede_new_pulses() {
        let mut e = engine();
        e.step(&at(0, vec![hand(Handedness::Right, HandShape::Pinky)]));
        let out = e.step(&at(300, vec![hand(Handedness::Right, HandShape::Pinky)]));
        assert_eq!(out, vec![off(69), on(69)]);
    }
}
