//! The engine seam: one frame in, a batch of MIDI messages out.

use hand_pose::{GestureLabel, PoseFrame};
use tracing::warn;

use crate::config::{EngineConfig, EngineMode};
use crate::message::MidiMessage;
use crate::performance::PerformanceEngine;
use crate::pulse::PulseEngine;
use crate::sink::MidiSink;

/// Latest label per hand; `None` when that hand was not seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandGestures {
    pub left:  Option<GestureLabel>,
    pub right: Option<GestureLabel>,
}

/// Current smoothed controller values, for display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlSnapshot {
    pub filter:     f32,
    pub reverb:     f32,
    pub aux_mix:    f32,
    /// −8192..=8191.
    pub pitch_bend: f32,
}

pub trait GestureEngine {
    fn mode(&self) -> EngineMode;

    /// Process one frame.  Frames must arrive in order; each is fully
    /// handled before the next.
    fn step(&mut self, frame: &PoseFrame) -> Vec<MidiMessage>;

    /// Note-offs for everything still sounding.  Called once when the loop
    /// ends; afterwards the engine is silent.
    fn release(&mut self) -> Vec<MidiMessage>;

    fn gestures(&self) -> HandGestures;

    fn controls(&self) -> ControlSnapshot { ControlSnapshot::default() }

    /// Step and forward the result to `sink`.  Returns how many messages
    /// were delivered.
    fn process(&mut self, frame: &PoseFrame, sink: &mut dyn MidiSink) -> usize {
        let messages = self.step(frame);
        deliver(&messages, sink)
    }

    /// Release and forward the note-offs to `sink`.
    fn shutdown(&mut self, sink: &mut dyn MidiSink) -> usize {
        let messages = self.release();
        deliver(&messages, sink)
    }
}

/// Send each message in order.  A failed send is logged and skipped.
pub fn deliver(messages: &[MidiMessage], sink: &mut dyn MidiSink) -> usize {
    let mut sent = 0;
    for m in messages {
        match sink.send(m) {
            Ok(())  => sent += 1,
            Err(e)  => warn!(message = %m, "{}", e),
        }
    }
    sent
}

pub fn build_engine(mode: EngineMode, config: EngineConfig) -> Box<dyn GestureEngine> {
    match mode {
        EngineMode::Performance => Box::new(PerformanceEngine::new(config)),
        EngineMode::Pulse       => Box::new(PulseEngine::new(config)),
    }
}
