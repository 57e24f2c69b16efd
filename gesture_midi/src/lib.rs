//! # gesture_midi
//!
//! Turns a stream of [`hand_pose::PoseFrame`]s into MIDI.
//!
//! Two engines share the [`GestureEngine`] interface and are never run
//! together:
//!
//! - [`PerformanceEngine`]: the right hand's index, middle, ring and pinky
//!   each hold a note (C E G A by default) while straight; a fist silences
//!   them.  The right wrist height drives a filter controller, the left hand
//!   drives an aux-mix controller or pitch bend, and the distance between the
//!   wrists drives reverb.  Controllers are exponentially smoothed.
//! - [`PulseEngine`]: each recognised gesture plays one short note.
//!
//! Engines produce [`MidiMessage`] batches; a [`MidiSink`] delivers them.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use gesture_midi::{EngineConfig, GestureEngine, PerformanceEngine, RecordingSink};
//! use hand_pose::shape::{HandShape, HandSketch};
//! use hand_pose::{Handedness, PoseFrame};
//!
//! let mut engine = PerformanceEngine::new(EngineConfig::default());
//! let mut sink = RecordingSink::new();
//!
//! let hand = HandSketch::shaped(Handedness::Right, HandShape::Point).build();
//! engine.process(&PoseFrame::new(0, Duration::ZERO, vec![hand]), &mut sink);
//! engine.shutdown(&mut sink);
//!
//! assert!(sink.held_notes().is_empty());
//! ```

pub mod config;
pub mod engine;
pub mod fingers;
pub mod message;
pub mod performance;
pub mod pulse;
pub mod sink;
pub mod smoother;

pub use config::{ConfigError, EngineConfig, EngineMode, FingerNoteTable, GestureNoteTable};
pub use engine::{build_engine, deliver, ControlSnapshot, GestureEngine, HandGestures};
pub use fingers::{note_velocity, FingerNoteState, FingerNotes};
pub use message::{to_7bit, to_pitch_bend, MidiMessage};
pub use performance::PerformanceEngine;
pub use pulse::PulseEngine;
pub use sink::{LogSink, MidiSink, RecordingSink, SinkError};
pub use smoother::{smooth, Smoother};
