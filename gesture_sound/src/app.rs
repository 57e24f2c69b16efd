//! Top-level application: configuration, per-frame state and the main loop.
//!
//! `AppState` owns the engine and the MIDI sink.  `run()` wires a pose
//! source, the sink and (optionally) the HUD window together and drives them
//! one frame at a time until the user quits or the source runs dry.  All
//! sounding notes are released on the way out, whatever ended the loop.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use gesture_midi::{
    build_engine, ConfigError, ControlSnapshot, EngineConfig, EngineMode, GestureEngine,
    HandGestures, LogSink, MidiSink,
};
use hand_pose::{GestureLabel, JsonLinesSource, PoseError, PoseFrame, PoseSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::output::{open_midi_output, OutputError};
use crate::sim::SimHands;
use crate::visualizer::{sim_legend, Visualizer};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Pose(#[from] PoseError),
    #[error("window: {0}")]
    Window(String),
    #[error("{0}")]
    Invalid(String),
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where pose frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSpec {
    /// Mouse and keyboard in the HUD window.
    Sim,
    /// JSON lines on standard input.
    Stdin,
    /// JSON lines from a file.
    File(PathBuf),
}

impl InputSpec {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | "sim" => InputSpec::Sim,
            "-"        => InputSpec::Stdin,
            path       => InputSpec::File(PathBuf::from(path)),
        }
    }
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode:    EngineMode,
    pub engine:  EngineConfig,
    /// Substring of the output port name; `None` uses the default hint.
    pub port:    Option<String>,
    /// `sim`, `-` for stdin, or a JSON-lines file.
    pub input:   String,
    /// Show the HUD window.
    pub window:  bool,
    /// Log MIDI instead of opening a port.
    pub dry_run: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            mode:    EngineMode::default(),
            engine:  EngineConfig::default(),
            port:    None,
            input:   "sim".to_string(),
            window:  true,
            dry_run: false,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(ConfigError::from)?;
        if !value.is_object() {
            return Err(ConfigError::Invalid("config must be a JSON object".into()).into());
        }
        let cfg: AppConfig = serde_json::from_value(value).map_err(ConfigError::from)?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| AppError::Read { path: path.to_path_buf(), source })?;
        let cfg = AppConfig::from_json(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn input_spec(&self) -> InputSpec { InputSpec::parse(&self.input) }

    pub fn validate(&self) -> Result<(), AppError> {
        self.engine.validate()?;
        if self.input_spec() == InputSpec::Sim && !self.window {
            return Err(AppError::Invalid(
                "simulated hands need the window; pass --input FILE or - with --headless".into(),
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

/// What the HUD shows each frame.
#[derive(Clone, Copy, Debug)]
pub struct Hud<'a> {
    pub mode:     EngineMode,
    pub gestures: HandGestures,
    pub controls: ControlSnapshot,
    pub frames:   u64,
    pub sent:     u64,
    pub status:   &'a str,
    pub legend:   &'a str,
}

pub struct AppState<S> {
    engine:   Box<dyn GestureEngine>,
    sink:     S,
    frames:   u64,
    sent:     u64,
    gestures: HandGestures,
    status:   String,
    legend:   String,
}

impl<S: MidiSink> AppState<S> {
    pub fn new(engine: Box<dyn GestureEngine>, sink: S) -> Self {
        let status = format!("Ready: {} mode", engine.mode());
        AppState {
            engine,
            sink,
            frames:   0,
            sent:     0,
            gestures: HandGestures::default(),
            status,
            legend:   String::new(),
        }
    }

    pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
        self.legend = legend.into();
        self
    }

    // ── process one frame ────────────────────────────────────────────────

    pub fn handle_frame(&mut self, frame: &PoseFrame) -> usize {
        let sent = self.engine.process(frame, &mut self.sink);
        self.frames += 1;
        self.sent += sent as u64;

        let now = self.engine.gestures();
        if now != self.gestures {
            self.status = format!("Left: {}   Right: {}", show(now.left), show(now.right));
            self.gestures = now;
        }
        sent
    }

    /// Release every sounding note.  Safe to call more than once.
    pub fn finish(&mut self) -> usize {
        let released = self.engine.shutdown(&mut self.sink);
        self.sent += released as u64;
        info!(frames = self.frames, sent = self.sent, released, "engine stopped");
        released
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn hud(&self) -> Hud<'_> {
        Hud {
            mode:     self.engine.mode(),
            gestures: self.gestures,
            controls: self.engine.controls(),
            frames:   self.frames,
            sent:     self.sent,
            status:   &self.status,
            legend:   &self.legend,
        }
    }

    pub fn frames(&self) -> u64 { self.frames }
    pub fn sink(&self)   -> &S  { &self.sink }
}

fn show(label: Option<GestureLabel>) -> &'static str {
    label.map(GestureLabel::name).unwrap_or("-")
}

// ════════════════════════════════════════════════════════════════════════════
// Loops
// ════════════════════════════════════════════════════════════════════════════

/// Why a loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    Exhausted,
    SourceError,
}

fn next(source: &mut dyn PoseSource) -> Result<PoseFrame, StopReason> {
    match source.next_frame() {
        Ok(Some(frame)) => Ok(frame),
        Ok(None) => {
            info!("pose source exhausted");
            Err(StopReason::Exhausted)
        }
        Err(e) => {
            error!("pose source failed: {}", e);
            Err(StopReason::SourceError)
        }
    }
}

/// Drive `app` from `source` without a window until the source ends.
pub fn run_headless<S: MidiSink>(app: &mut AppState<S>, source: &mut dyn PoseSource) -> StopReason {
    loop {
        match next(source) {
            Ok(frame) => { app.handle_frame(&frame); }
            Err(reason) => return reason,
        }
    }
}

fn run_windowed<S: MidiSink>(
    app:    &mut AppState<S>,
    source: &mut dyn PoseSource,
    vis:    &mut Visualizer,
) -> StopReason {
    while vis.is_open() {
        // 1. Poll window input → sim source
        if !vis.poll_input() { break; }

        // 2. Acquire
        let frame = match next(source) {
            Ok(frame)   => frame,
            Err(reason) => return reason,
        };

        // 3. Map and send
        app.handle_frame(&frame);

        // 4. Render
        vis.render(&frame, &app.hud());
    }
    info!("window closed");
    StopReason::Quit
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Opens the MIDI port first; if that fails nothing else happens.  Then the
/// pose source and window are set up and frames are processed until quit.
pub fn run(cfg: AppConfig) -> Result<StopReason, AppError> {
    cfg.validate()?;

    let sink: Box<dyn MidiSink> = if cfg.dry_run {
        info!("dry run: MIDI goes to the log");
        Box::new(LogSink::new())
    } else {
        Box::new(open_midi_output(cfg.port.as_deref())?)
    };

    let engine = build_engine(cfg.mode, cfg.engine.clone());
    info!(mode = %cfg.mode, channel = cfg.engine.channel, "engine ready");

    // The sender lives in the window; only the sim source listens to it.
    let (sim_tx, sim_rx) = mpsc::channel();
    let spec = cfg.input_spec();
    let mut source: Box<dyn PoseSource> = match &spec {
        InputSpec::Sim        => Box::new(SimHands::new(sim_rx)),
        InputSpec::Stdin      => Box::new(JsonLinesSource::new(io::stdin().lock())),
        InputSpec::File(path) => Box::new(JsonLinesSource::open(path)?),
    };

    let mut app = AppState::new(engine, sink);
    let reason = if cfg.window {
        if spec == InputSpec::Sim {
            app = app.with_legend(sim_legend());
        } else {
            app = app.with_legend("esc=quit");
        }
        match Visualizer::new(sim_tx) {
            Ok(mut vis) => run_windowed(&mut app, source.as_mut(), &mut vis),
            Err(e) => {
                app.finish();
                return Err(AppError::Window(e));
            }
        }
    } else {
        run_headless(&mut app, source.as_mut())
    };

    app.finish();
    Ok(reason)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_midi::{MidiMessage, RecordingSink};
    use hand_pose::shape::{HandShape, HandSketch};
    use hand_pose::{Handedness, ScriptedSource};
    use std::time::Duration;

    fn make_app(mode: EngineMode) -> AppState<RecordingSink> {
        AppState::new(build_engine(mode, EngineConfig::default()), RecordingSink::new())
    }

    fn frames(shapes: &[HandShape]) -> ScriptedSource {
        ScriptedSource::new(shapes.iter().enumerate().map(|(i, &s)| {
            let hand = HandSketch::shaped(Handedness::Right, s).build();
            PoseFrame::new(i as u64, Duration::from_millis(i as u64 * 33), vec![hand])
        }))
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.mode, EngineMode::Performance);
        assert_eq!(cfg.input_spec(), InputSpec::Sim);
        assert!(cfg.window && !cfg.dry_run);
        cfg.validate().unwrap();
    }

    #[test]
    fn config_file_overrides_nested_fields() {
        let cfg = AppConfig::from_json(
            r#"{"mode": "pulse", "port": "loopMIDI", "engine": {"pulse_hold_ms": 500}}"#,
        ).unwrap();
        assert_eq!(cfg.mode, EngineMode::Pulse);
        assert_eq!(cfg.port.as_deref(), Some("loopMIDI"));
        assert_eq!(cfg.engine.pulse_hold_ms, 500);
        assert_eq!(cfg.engine.filter_cc, 74);
    }

    #[test]
    fn bad_config_is_an_error() {
        assert!(matches!(AppConfig::from_json(r#"{"mode": "loud"}"#), Err(AppError::Config(_))));
        assert!(matches!(AppConfig::from_json(r#"["pulse", "x"]"#),   Err(AppError::Config(_))));
        assert!(matches!(AppConfig::load("/no/such/config.json"), Err(AppError::Read { .. })));
    }

    #[test]
    fn input_spec_parsing() {
        assert_eq!(InputSpec::parse("sim"), InputSpec::Sim);
        assert_eq!(InputSpec::parse("-"), InputSpec::Stdin);
        assert_eq!(InputSpec::parse("poses.jsonl"), InputSpec::File(PathBuf::from("poses.jsonl")));
    }

    #[test]
    fn sim_without_window_is_rejected() {
        let cfg = AppConfig { window: false, ..AppConfig::default() };
        assert!(matches!(cfg.validate(), Err(AppError::Invalid(_))));
        let cfg = AppConfig { window: false, input: "-".into(), ..AppConfig::default() };
        cfg.validate().unwrap();
    }

    #[test]
    fn headless_run_releases_at_end() {
        let mut app = make_app(EngineMode::Performance);
        let mut source = frames(&[HandShape::Open, HandShape::Open, HandShape::Peace]);
        assert_eq!(run_headless(&mut app, &mut source), StopReason::Exhausted);
        assert_eq!(app.frames(), 3);
        assert_eq!(app.sink().held_notes(), vec![60, 64]);

        app.finish();
        assert!(app.sink().held_notes().is_empty());
        assert_eq!(app.finish(), 0);
    }

    #[test]
    fn status_follows_gesture_changes() {
        let mut app = make_app(EngineMode::Pulse);
        let mut source = frames(&[HandShape::Point]);
        run_headless(&mut app, &mut source);
        assert_eq!(app.hud().status, "Left: -   Right: Point");
        assert_eq!(app.hud().gestures.right, Some(GestureLabel::Point));
        assert_eq!(
            app.sink().messages(),
            &[MidiMessage::NoteOn { channel: 0, note: 62, velocity: 100 }],
        );
    }

    #[test]
    fn source_error_stops_the_loop() {
        let text = "{\"hands\": []}\nnot json\n{\"hands\": []}\n";
        let mut source = JsonLinesSource::new(io::Cursor::new(text));
        let mut app = make_app(EngineMode::Performance);
        assert_eq!(run_headless(&mut app, &mut source), StopReason::SourceError);
        assert_eq!(app.frames(), 1);
    }

    #[test]
    fn hud_counts_sent_messages() {
        let mut app = make_app(EngineMode::Performance);
        let mut source = frames(&[HandShape::Open]);
        run_headless(&mut app, &mut source);
        // four notes and the filter
        assert_eq!(app.hud().sent, 5);
        assert_eq!(app.hud().mode, EngineMode::Performance);
    }
}
