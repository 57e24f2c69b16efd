//! Performance mode: the right hand plays notes with its fingers, both hands
//! shape sound through smoothed controllers.
//!
//! | Source | Condition | Output |
//! |---|---|---|
//! | right index/middle/ring/pinky | straighten / curl | note on / off |
//! | right hand | Fist | all finger notes off |
//! | right wrist y | present, not Fist | CC filter |
//! | left index tip y | exactly one finger out | CC aux mix |
//! | left wrist x | all five fingers out | pitch bend |
//! | wrist-to-wrist distance | both hands present | CC reverb |
//!
//! A controller that is not driven in a frame sends nothing; the receiver
//! keeps the last value.

use hand_pose::{classify, ClassifierConfig, FingerId, GestureLabel, PoseFrame};
use tracing::debug;

use crate::config::{EngineConfig, EngineMode};
use crate::engine::{ControlSnapshot, GestureEngine, HandGestures};
use crate::fingers::FingerNotes;
use crate::message::{to_7bit, to_pitch_bend, MidiMessage};
use crate::smoother::Smoother;

pub struct PerformanceEngine {
    config:     EngineConfig,
    classifier: ClassifierConfig,
    fingers:    FingerNotes,
    filter:     Smoother,
    reverb:     Smoother,
    aux_mix:    Smoother,
    pitch_bend: Smoother,
    gestures:   HandGestures,
}

impl PerformanceEngine {
    pub fn new(config: EngineConfig) -> Self {
        let alpha = config.alpha;
        PerformanceEngine {
            classifier: config.classifier(),
            fingers:    FingerNotes::new(config.channel, config.finger_notes, config.ratio_margin),
            filter:     Smoother::new(alpha),
            reverb:     Smoother::new(alpha),
            aux_mix:    Smoother::new(alpha),
            pitch_bend: Smoother::new(alpha),
            gestures:   HandGestures::default(),
            config,
        }
    }

    pub fn fingers(&self) -> &FingerNotes { &self.fingers }

    pub fn config(&self) -> &EngineConfig { &self.config }

    fn control(&self, controller: u8, value: f32) -> MidiMessage {
        MidiMessage::ControlChange {
            channel: self.config.channel,
            controller,
            value:   to_7bit(value),
        }
    }
}

impl GestureEngine for PerformanceEngine {
    fn mode(&self) -> EngineMode { EngineMode::Performance }

    fn step(&mut self, frame: &PoseFrame) -> Vec<MidiMessage> {
        let hands = frame.pair();
        let mut out = Vec::new();

        let now = HandGestures {
            left:  hands.left.map(|h| classify(h, &self.classifier)),
            right: hands.right.map(|h| classify(h, &self.classifier)),
        };
        if now != self.gestures {
            debug!(seq = frame.sequence, left = ?now.left, right = ?now.right, "gesture change");
        }
        self.gestures = now;

        // ── right hand: finger notes, filter ──
        match hands.right {
            Some(_) if now.right == Some(GestureLabel::Fist) => {
                self.fingers.release_all(&mut out);
            }
            Some(right) => {
                self.fingers.step(right, &mut out);
                let target = to_7bit((1.0 - right.wrist().y) * 127.0);
                let v = self.filter.update(f32::from(target));
                out.push(self.control(self.config.filter_cc, v));
            }
            None if self.config.release_on_hand_loss => {
                self.fingers.release_all(&mut out);
            }
            None => {}
        }

        // ── left hand: aux mix or pitch bend ──
        if let Some(left) = hands.left {
            let extended = left.extension_flags(self.config.extension_threshold).count();
            if extended == 1 {
                let tip_y = left.tip(FingerId::Index).y;
                let target = to_7bit((1.0 - tip_y) * 127.0);
                let v = self.aux_mix.update(f32::from(target));
                out.push(self.control(self.config.aux_mix_cc, v));
            } else if extended >= 5 {
                let target = to_pitch_bend((left.wrist().x * 2.0 - 1.0) * 8191.0);
                let v = self.pitch_bend.update(f32::from(target));
                out.push(MidiMessage::PitchBend {
                    channel: self.config.channel,
                    value:   to_pitch_bend(v),
                });
            }
        }

        // ── both hands: reverb ──
        if let Some(distance) = hands.wrist_distance() {
            let target = to_7bit((distance * self.config.reverb_gain).min(127.0));
            let v = self.reverb.update(f32::from(target));
            out.push(self.control(self.config.reverb_cc, v));
        }

        out
    }

    fn release(&mut self) -> Vec<MidiMessage> {
        let mut out = Vec::new();
        self.fingers.release_all(&mut out);
        out
    }

    fn gestures(&self) -> HandGestures { self.gestures }

    fn controls(&self) -> ControlSnapshot {
        ControlSnapshot {
            filter:     self.filter.value(),
            reverb:     self.reverb.value(),
            aux_mix:    self.aux_mix.value(),
            pitch_bend: self.pitch_bend.value(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
