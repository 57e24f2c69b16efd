//! Pose sources: where frames of hand landmarks come from.
//!
//! The landmark model itself runs outside this crate.  A [`PoseSource`]
//! hands the engine one [`PoseFrame`] at a time; consumers don't care whether
//! frames come from a pipe, a file or the keyboard simulator.
//!
//! ## JSON-lines wire format
//!
//! One object per line, one line per video frame:
//!
//! ```text
//! {"t_ms": 1033.4, "hands": [{"handedness": "Right", "landmarks": [[0.51, 0.72, 0.0], ...]}]}
//! ```
//!
//! `t_ms` is optional; `hands` may be empty or missing.  A blank line is a
//! frame in which nothing was detected.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, info};

use crate::{HandPose, Landmark, PoseError, PoseFrame, Result};

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`PoseFrame`]s, one per call.
pub trait PoseSource {
    /// The next frame.  `Ok(None)` when the source is exhausted; an error
    /// when acquisition failed.  Callers stop in both cases.
    fn next_frame(&mut self) -> Result<Option<PoseFrame>>;
}

impl<S: PoseSource + ?Sized> PoseSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<PoseFrame>> {
        (**self).next_frame()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
struct WireFrame {
    #[serde(default)]
    t_ms:  Option<f64>,
    #[serde(default)]
    hands: Vec<WireHand>,
}

#[derive(Deserialize)]
struct WireHand {
    handedness: String,
    landmarks:  Vec<[f32; 3]>,
}

/// Reads frames from newline-delimited JSON, e.g. piped from a landmark
/// detector process.
pub struct JsonLinesSource<R> {
    reader:   R,
    buf:      String,
    line:     usize,
    sequence: u64,
    opened:   Instant,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        JsonLinesSource {
            reader,
            buf:      String::new(),
            line:     0,
            sequence: 0,
            opened:   Instant::now(),
        }
    }

    /// Lines consumed so far.
    pub fn lines_read(&self) -> usize { self.line }
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!(path = %path.display(), "reading pose frames");
        Ok(JsonLinesSource::new(BufReader::new(file)))
    }
}

impl<R: BufRead> PoseSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<PoseFrame>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            debug!(lines = self.line, "pose stream ended");
            return Ok(None);
        }
        self.line += 1;

        let sequence = self.sequence;
        self.sequence += 1;
        let wall = self.opened.elapsed();

        let text = self.buf.trim();
        if text.is_empty() {
            return Ok(Some(PoseFrame::empty(sequence, wall)));
        }
        parse_frame(text, self.line, sequence, wall).map(Some)
    }
}

/// Decode one JSON line.  `fallback` stamps frames that carry no `t_ms`.
fn parse_frame(text: &str, line: usize, sequence: u64, fallback: Duration) -> Result<PoseFrame> {
    let wire: WireFrame = serde_json::from_str(text)
        .map_err(|source| PoseError::Parse { line, source })?;

    let elapsed = wire.t_ms
        .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok())
        .unwrap_or(fallback);

    let hands = wire.hands.into_iter()
        .map(|h| {
            let handedness = h.handedness.parse()?;
            let points = h.landmarks.into_iter().map(Landmark::from).collect();
            HandPose::new(handedness, points)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PoseFrame::new(sequence, elapsed, hands))
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource
// ════════════════════════════════════════════════════════════════════════════

/// Replays a fixed list of frames, then reports exhaustion.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<PoseFrame>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = PoseFrame>) -> Self {
        ScriptedSource { frames: frames.into_iter().collect() }
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize { self.frames.len() }
}

impl PoseSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<PoseFrame>> {
        Ok(self.frames.pop_front())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Handedness;
    use std::io::Cursor;

    fn hand_json(label: &str, n: usize) -> String {
        let pts: Vec<String> = (0..n).map(|i| format!("[{}, 0.5, 0.0]", i as f32 / 100.0)).collect();
        format!(r#"{{"handedness": "{}", "landmarks": [{}]}}"#, label, pts.join(","))
    }

    #[test]
    fn reads_frames_until_eof() {
        let input = format!(
            "{{\"t_ms\": 40, \"hands\": [{}]}}\n\n{{\"hands\": [{}, {}]}}\n",
            hand_json("Right", 21),
            hand_json("Left", 21),
            hand_json("Right", 21),
        );
        let mut src = JsonLinesSource::new(Cursor::new(input));

        let f0 = src.next_frame().unwrap().unwrap();
        assert_eq!(f0.sequence, 0);
        assert_eq!(f0.elapsed, Duration::from_millis(40));
        assert_eq!(f0.hands.len(), 1);
        assert_eq!(f0.hands[0].handedness(), Handedness::Right);
        assert!((f0.hands[0].landmark(20).x - 0.20).abs() < 1e-6);

        let f1 = src.next_frame().unwrap().unwrap();
        assert!(f1.is_empty());
        assert_eq!(f1.sequence, 1);

        let f2 = src.next_frame().unwrap().unwrap();
        assert_eq!(f2.hands.len(), 2);
        assert!(f2.pair().left.is_some() && f2.pair().right.is_some());

        assert!(src.next_frame().unwrap().is_none());
        assert_eq!(src.lines_read(), 3);
    }

    #[test]
    fn missing_hands_field_is_empty_frame() {
        let mut src = JsonLinesSource::new(Cursor::new("{\"t_ms\": 5}\n"));
        assert!(src.next_frame().unwrap().unwrap().is_empty());
    }

    #[test]
    fn unrepresentable_timestamp_falls_back_to_wall_clock() {
        let input = "{\"t_ms\": 1e30, \"hands\": []}\n{\"t_ms\": -4}\n{\"t_ms\": 1500}\n";
        let mut src = JsonLinesSource::new(Cursor::new(input));
        let huge = src.next_frame().unwrap().unwrap();
        assert!(huge.elapsed < Duration::from_secs(60));
        let negative = src.next_frame().unwrap().unwrap();
        assert!(negative.elapsed < Duration::from_secs(60));
        let normal = src.next_frame().unwrap().unwrap();
        assert_eq!(normal.elapsed, Duration::from_millis(1500));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let input = "{\"hands\": []}\nnot json\n";
        let mut src = JsonLinesSource::new(Cursor::new(input));
        assert!(src.next_frame().unwrap().is_some());
        match src.next_frame() {
            Err(PoseError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn short_hand_is_rejected() {
        let input = format!("{{\"hands\": [{}]}}\n", hand_json("Left", 20));
        let mut src = JsonLinesSource::new(Cursor::new(input));
        assert!(matches!(src.next_frame(), Err(PoseError::LandmarkCount(20))));
    }

    #[test]
    fn bad_handedness_is_rejected() {
        let input = format!("{{\"hands\": [{}]}}\n", hand_json("Middle", 21));
        let mut src = JsonLinesSource::new(Cursor::new(input));
        assert!(matches!(src.next_frame(), Err(PoseError::Handedness(_))));
    }

    #[test]
    fn scripted_source_replays_in_order() {
        let frames = (0..3).map(|i| PoseFrame::empty(i, Duration::from_millis(i * 33)));
        let mut src = ScriptedSource::new(frames);
        assert_eq!(src.remaining(), 3);
        for i in 0..3 {
            assert_eq!(src.next_frame().unwrap().unwrap().sequence, i);
        }
        assert!(src.next_frame().unwrap().is_none());
    }
}
