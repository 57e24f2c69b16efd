//! # hand_pose
//!
//! Geometry and gesture classification for 21-point hand poses, as produced
//! by a MediaPipe-style hand landmarker.
//!
//! Coordinates are normalised to the image: `x` grows to the right, `y` grows
//! downward, `z` is depth relative to the wrist.  All gesture logic works in
//! the `(x, y)` plane only.
//!
//! ## Landmark layout
//!
//! | Finger | MCP | PIP | DIP | Tip |
//! |---|---|---|---|---|
//! | Thumb  | 2 (CMC = 1) | — | 3 (IP) | 4 |
//! | Index  | 5  | 6  | 7  | 8  |
//! | Middle | 9  | 10 | 11 | 12 |
//! | Ring   | 13 | 14 | 15 | 16 |
//! | Pinky  | 17 | 18 | 19 | 20 |
//!
//! Landmark 0 is the wrist.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_pose::{classify, ClassifierConfig, GestureLabel, Handedness};
//! use hand_pose::shape::{HandShape, HandSketch};
//!
//! let hand = HandSketch::shaped(Handedness::Right, HandShape::Point).build();
//! assert_eq!(classify(&hand, &ClassifierConfig::default()), GestureLabel::Point);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

pub mod shape;
pub mod source;

pub use source::{JsonLinesSource, PoseSource, ScriptedSource};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Number of landmarks in one hand pose.
pub const LANDMARK_COUNT: usize = 21;

/// Bones between landmarks, for drawing a skeleton.
pub const HAND_BONES: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Default thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Tip-to-reference distance above which a finger counts as extended.
pub const EXTENSION_THRESHOLD: f32 = 0.05;

/// Ratio a tip must exceed, relative to its PIP, in the scale-invariant test.
pub const RATIO_MARGIN: f32 = 1.1;

/// Thumb-tip to index-tip distance below which a hand is pinching.
pub const PINCH_THRESHOLD: f32 = 0.05;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum PoseError {
    #[error("a hand pose needs 21 landmarks, got {0}")]
    LandmarkCount(usize),

    #[error("unknown handedness label {0:?}")]
    Handedness(String),

    #[error("line {line}: malformed pose frame: {source}")]
    Parse {
        line:   usize,
        source: serde_json::Error,
    },

    #[error("pose source I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PoseError>;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One normalised landmark point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Landmark { x, y, z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

/// Euclidean distance in the image plane; `z` is ignored.
pub fn distance(a: &Landmark, b: &Landmark) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Absolute test: the tip is further than `threshold` from its reference joint.
pub fn is_extended(tip: &Landmark, reference: &Landmark, threshold: f32) -> bool {
    distance(tip, reference) > threshold
}

/// Scale-invariant test: `|tip − mcp| > margin × |pip − mcp|`.
///
/// Independent of hand size and distance from the camera, which makes it the
/// better choice for note triggering.
pub fn is_extended_relative(tip: &Landmark, pip: &Landmark, mcp: &Landmark, margin: f32) -> bool {
    distance(tip, mcp) > margin * distance(pip, mcp)
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn label(self) -> &'static str {
        match self {
            Handedness::Left  => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Handedness {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left"  => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            _       => Err(PoseError::Handedness(s.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerId
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FingerId {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerId {
    pub const ALL: [FingerId; 5] = [
        FingerId::Thumb, FingerId::Index, FingerId::Middle, FingerId::Ring, FingerId::Pinky,
    ];

    /// The four fingers other than the thumb.
    pub const LONG: [FingerId; 4] = [
        FingerId::Index, FingerId::Middle, FingerId::Ring, FingerId::Pinky,
    ];

    pub fn tip(self) -> usize {
        match self {
            FingerId::Thumb  => THUMB_TIP,
            FingerId::Index  => INDEX_TIP,
            FingerId::Middle => MIDDLE_TIP,
            FingerId::Ring   => RING_TIP,
            FingerId::Pinky  => PINKY_TIP,
        }
    }

    pub fn pip(self) -> usize { self.tip() - 2 }
    pub fn mcp(self) -> usize { self.tip() - 3 }

    /// Joint the absolute extension test measures from.  The thumb has no
    /// MCP at `tip − 3` (that is its CMC), so it uses landmark 2.
    pub fn reference_joint(self) -> usize {
        match self {
            FingerId::Thumb => THUMB_MCP,
            other           => other.mcp(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FingerId::Thumb  => "thumb",
            FingerId::Index  => "index",
            FingerId::Middle => "middle",
            FingerId::Ring   => "ring",
            FingerId::Pinky  => "pinky",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandPose
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand for one frame.  Carries no identity across frames.
#[derive(Clone, Debug, PartialEq)]
pub struct HandPose {
    handedness: Handedness,
    landmarks:  [Landmark; LANDMARK_COUNT],
}

impl HandPose {
    /// Build from a landmark list, which must hold exactly 21 points.
    pub fn new(handedness: Handedness, landmarks: Vec<Landmark>) -> Result<Self> {
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|v: Vec<Landmark>| PoseError::LandmarkCount(v.len()))?;
        Ok(HandPose { handedness, landmarks })
    }

    pub fn from_array(handedness: Handedness, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        HandPose { handedness, landmarks }
    }

    pub fn handedness(&self) -> Handedness { self.handedness }
    pub fn landmarks(&self)  -> &[Landmark; LANDMARK_COUNT] { &self.landmarks }

    /// Landmark by index; see the `*_TIP`, `*_MCP`, … constants.
    pub fn landmark(&self, index: usize) -> &Landmark { &self.landmarks[index] }

    pub fn wrist(&self) -> &Landmark { &self.landmarks[WRIST] }

    pub fn tip(&self, finger: FingerId) -> &Landmark { &self.landmarks[finger.tip()] }

    /// Coarse absolute-threshold extension test for one finger.
    pub fn is_finger_extended(&self, finger: FingerId, threshold: f32) -> bool {
        is_extended(
            &self.landmarks[finger.tip()],
            &self.landmarks[finger.reference_joint()],
            threshold,
        )
    }

    /// Ratio extension test for one finger (tip, PIP and MCP).
    pub fn is_finger_extended_relative(&self, finger: FingerId, margin: f32) -> bool {
        is_extended_relative(
            &self.landmarks[finger.tip()],
            &self.landmarks[finger.pip()],
            &self.landmarks[finger.mcp()],
            margin,
        )
    }

    pub fn extension_flags(&self, threshold: f32) -> ExtensionFlags {
        let mut flags = ExtensionFlags::default();
        for finger in FingerId::ALL {
            flags.set(finger, self.is_finger_extended(finger, threshold));
        }
        flags
    }

    /// Thumb tip to index tip.
    pub fn pinch_distance(&self) -> f32 {
        distance(&self.landmarks[THUMB_TIP], &self.landmarks[INDEX_TIP])
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ExtensionFlags
// ════════════════════════════════════════════════════════════════════════════

/// Per-finger extended/curled flags for one hand in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtensionFlags {
    flags: [bool; 5],
}

impl ExtensionFlags {
    pub fn get(&self, finger: FingerId) -> bool { self.flags[finger.slot()] }

    pub fn set(&mut self, finger: FingerId, extended: bool) {
        self.flags[finger.slot()] = extended;
    }

    /// Number of extended fingers, thumb included.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// `(index, middle, ring, pinky)`.
    pub fn long_fingers(&self) -> (bool, bool, bool, bool) {
        (
            self.get(FingerId::Index),
            self.get(FingerId::Middle),
            self.get(FingerId::Ring),
            self.get(FingerId::Pinky),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel + classifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    Pinch,
    Point,
    Peace,
    OpenHand,
    Fist,
    PinkyOut,
    ThumbsUp,
    ComboSign,
    Unknown,
}

impl GestureLabel {
    pub const ALL: [GestureLabel; 9] = [
        GestureLabel::Pinch,
        GestureLabel::Point,
        GestureLabel::Peace,
        GestureLabel::OpenHand,
        GestureLabel::Fist,
        GestureLabel::PinkyOut,
        GestureLabel::ThumbsUp,
        GestureLabel::ComboSign,
        GestureLabel::Unknown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GestureLabel::Pinch     => "Pinch",
            GestureLabel::Point     => "Point",
            GestureLabel::Peace     => "Peace",
            GestureLabel::OpenHand  => "Open Hand",
            GestureLabel::Fist      => "Fist",
            GestureLabel::PinkyOut  => "Pinky",
            GestureLabel::ThumbsUp  => "Thumbs Up",
            GestureLabel::ComboSign => "Combo",
            GestureLabel::Unknown   => "Unknown",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Thresholds used by [`classify`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub pinch_threshold:     f32,
    pub extension_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            pinch_threshold:     PINCH_THRESHOLD,
            extension_threshold: EXTENSION_THRESHOLD,
        }
    }
}

/// Label one hand.  Rules are tried in a fixed order and the first match
/// wins; the predicates overlap, so the order is part of the behaviour.
pub fn classify(hand: &HandPose, cfg: &ClassifierConfig) -> GestureLabel {
    let pinch = hand.pinch_distance();
    let (i, m, r, p) = hand.extension_flags(cfg.extension_threshold).long_fingers();
    let thumb_out = hand.landmark(THUMB_TIP).x < hand.landmark(THUMB_IP).x;

    if pinch < cfg.pinch_threshold {
        GestureLabel::Pinch
    } else if i && !(m || r || p) {
        GestureLabel::Point
    } else if i && m && !(r || p) {
        GestureLabel::Peace
    } else if i && m && r && p {
        GestureLabel::OpenHand
    } else if !(i || m || r || p) {
        GestureLabel::Fist
    } else if p && !(i || m || r) {
        GestureLabel::PinkyOut
    } else if thumb_out && i && m && r && p {
        // Never reached: OpenHand above already takes every four-finger hand.
        GestureLabel::ThumbsUp
    } else if i && p && !(m || r) {
        GestureLabel::ComboSign
    } else {
        GestureLabel::Unknown
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PoseFrame / HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything the pose source saw in one sampled video frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseFrame {
    /// Monotonic frame counter assigned by the source.
    pub sequence: u64,
    /// Time since the source was opened.
    pub elapsed:  Duration,
    pub hands:    Vec<HandPose>,
}

impl PoseFrame {
    pub fn new(sequence: u64, elapsed: Duration, hands: Vec<HandPose>) -> Self {
        PoseFrame { sequence, elapsed, hands }
    }

    pub fn empty(sequence: u64, elapsed: Duration) -> Self {
        PoseFrame { sequence, elapsed, hands: Vec::new() }
    }

    pub fn is_empty(&self) -> bool { self.hands.is_empty() }

    /// Split into left and right hands.  At most one hand per label is
    /// expected; if the source reports two, the later one wins.
    pub fn pair(&self) -> HandFrame<'_> {
        let mut frame = HandFrame::default();
        for hand in &self.hands {
            let slot = match hand.handedness() {
                Handedness::Left  => &mut frame.left,
                Handedness::Right => &mut frame.right,
            };
            if slot.is_some() {
                debug!(sequence = self.sequence, hand = %hand.handedness(), "duplicate hand in frame");
            }
            *slot = Some(hand);
        }
        frame
    }
}

/// Left and right hands of one frame, either possibly absent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandFrame<'a> {
    pub left:  Option<&'a HandPose>,
    pub right: Option<&'a HandPose>,
}

impl<'a> HandFrame<'a> {
    pub fn hand(&self, handedness: Handedness) -> Option<&'a HandPose> {
        match handedness {
            Handedness::Left  => self.left,
            Handedness::Right => self.right,
        }
    }

    /// Planar wrist-to-wrist distance, only when both hands are present.
    pub fn wrist_distance(&self) -> Option<f32> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some(distance(l.wrist(), r.wrist())),
            _                  => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{HandShape, HandSketch};

    fn lm(x: f32, y: f32) -> Landmark { Landmark::new(x, y, 0.0) }

    fn label(shape: HandShape) -> GestureLabel {
        let hand = HandSketch::shaped(Handedness::Right, shape).build();
        classify(&hand, &ClassifierConfig::default())
    }

    // ── Geometry ─────────────────────────────────────────────────────────
    #[test]
    fn distance_ignores_z() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 5.0);
        assert!((distance(&a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn absolute_extension_threshold() {
        let mcp = lm(0.5, 0.5);
        assert!( is_extended(&lm(0.5, 0.44), &mcp, 0.05));
        assert!(!is_extended(&lm(0.5, 0.47), &mcp, 0.05));
    }

    #[test]
    fn relative_extension_is_scale_invariant() {
        // Same proportions at two hand sizes.
        for s in [1.0_f32, 0.25] {
            let mcp = lm(0.5, 0.5);
            let pip = lm(0.5, 0.5 - 0.04 * s);
            let straight = lm(0.5, 0.5 - 0.10 * s);
            let curled   = lm(0.5, 0.5 - 0.02 * s);
            assert!( is_extended_relative(&straight, &pip, &mcp, RATIO_MARGIN));
            assert!(!is_extended_relative(&curled,   &pip, &mcp, RATIO_MARGIN));
        }
    }

    #[test]
    fn small_hands_classify_like_large_ones() {
        for shape in [HandShape::Point, HandShape::Peace, HandShape::Fist] {
            let far = HandSketch { scale: 0.5, ..HandSketch::shaped(Handedness::Right, shape) };
            assert_eq!(classify(&far.build(), &ClassifierConfig::default()), label(shape));
        }
    }

    #[test]
    fn relative_extension_needs_margin() {
        // tip exactly as far as the PIP is not enough.
        let mcp = lm(0.5, 0.5);
        let pip = lm(0.5, 0.45);
        let tip = lm(0.5, 0.446);
        assert!(!is_extended_relative(&tip, &pip, &mcp, 1.1));
    }

    // ── FingerId ─────────────────────────────────────────────────────────
    #[test]
    fn finger_joint_indices() {
        assert_eq!(FingerId::Index.tip(), 8);
        assert_eq!(FingerId::Index.pip(), 6);
        assert_eq!(FingerId::Index.mcp(), 5);
        assert_eq!(FingerId::Pinky.reference_joint(), 17);
        assert_eq!(FingerId::Thumb.reference_joint(), THUMB_MCP);
    }

    // ── HandPose ─────────────────────────────────────────────────────────
    #[test]
    fn hand_pose_rejects_wrong_landmark_count() {
        let err = HandPose::new(Handedness::Left, vec![Landmark::default(); 20]).unwrap_err();
        assert!(matches!(err, PoseError::LandmarkCount(20)));
        assert!(HandPose::new(Handedness::Left, vec![Landmark::default(); 21]).is_ok());
    }

    #[test]
    fn handedness_parses_case_insensitively() {
        assert_eq!("Right".parse::<Handedness>().unwrap(), Handedness::Right);
        assert_eq!(" left ".parse::<Handedness>().unwrap(), Handedness::Left);
        assert!("both".parse::<Handedness>().is_err());
    }

    #[test]
    fn open_hand_counts_five_fingers() {
        let hand = HandSketch::shaped(Handedness::Left, HandShape::Open).build();
        assert_eq!(hand.extension_flags(EXTENSION_THRESHOLD).count(), 5);
    }

    #[test]
    fn point_counts_one_finger() {
        let hand = HandSketch::shaped(Handedness::Left, HandShape::Point).build();
        let flags = hand.extension_flags(EXTENSION_THRESHOLD);
        assert_eq!(flags.count(), 1);
        assert!(flags.get(FingerId::Index));
    }

    // ── Classifier ───────────────────────────────────────────────────────
    #[test]
    fn sketched_shapes_classify_as_named() {
        assert_eq!(label(HandShape::Pinch), GestureLabel::Pinch);
        assert_eq!(label(HandShape::Point), GestureLabel::Point);
        assert_eq!(label(HandShape::Peace), GestureLabel::Peace);
        assert_eq!(label(HandShape::Open),  GestureLabel::OpenHand);
        assert_eq!(label(HandShape::Fist),  GestureLabel::Fist);
        assert_eq!(label(HandShape::Pinky), GestureLabel::PinkyOut);
        assert_eq!(label(HandShape::Combo), GestureLabel::ComboSign);
    }

    #[test]
    fn point_with_open_thumb_gap_is_not_pinch() {
        let hand = HandSketch::shaped(Handedness::Right, HandShape::Point).build();
        assert!(hand.pinch_distance() > 0.05);
        assert_eq!(classify(&hand, &ClassifierConfig::default()), GestureLabel::Point);
    }

    #[test]
    fn pinch_beats_every_finger_rule() {
        // Open hand with the thumb tip dropped onto the index tip.
        let mut hand = HandSketch::shaped(Handedness::Right, HandShape::Open).build();
        let index_tip = *hand.landmark(INDEX_TIP);
        let mut points = *hand.landmarks();
        points[THUMB_TIP] = Landmark::new(index_tip.x + 0.01, index_tip.y, 0.0);
        hand = HandPose::from_array(Handedness::Right, points);
        assert_eq!(classify(&hand, &ClassifierConfig::default()), GestureLabel::Pinch);
    }

    #[test]
    fn ring_only_is_unknown() {
        let hand = HandSketch::new(Handedness::Right).extend(FingerId::Ring).build();
        assert_eq!(classify(&hand, &ClassifierConfig::default()), GestureLabel::Unknown);
    }

    #[test]
    fn thumbs_up_is_shadowed_by_open_hand() {
        // Thumb tip left of the IP joint and all four fingers out: the
        // ThumbsUp predicate holds, yet OpenHand is tried first.
        let hand = HandSketch::shaped(Handedness::Right, HandShape::Open).build();
        assert!(hand.landmark(THUMB_TIP).x < hand.landmark(THUMB_IP).x);
        assert_eq!(classify(&hand, &ClassifierConfig::default()), GestureLabel::OpenHand);
        for shape in HandShape::ALL {
            assert_ne!(label(shape), GestureLabel::ThumbsUp);
        }
    }

    #[test]
    fn classifier_is_deterministic() {
        let hand = HandSketch::shaped(Handedness::Right, HandShape::Peace).at(0.3, 0.8).build();
        let cfg = ClassifierConfig::default();
        let first = classify(&hand, &cfg);
        for _ in 0..100 {
            assert_eq!(classify(&hand, &cfg), first);
        }
    }

    // ── Frames ───────────────────────────────────────────────────────────
    #[test]
    fn pair_splits_by_handedness() {
        let l = HandSketch::new(Handedness::Left).at(0.7, 0.5).build();
        let r = HandSketch::new(Handedness::Right).at(0.3, 0.5).build();
        let frame = PoseFrame::new(0, Duration::ZERO, vec![r.clone(), l.clone()]);
        let pair = frame.pair();
        assert_eq!(pair.left,  Some(&l));
        assert_eq!(pair.right, Some(&r));
    }

    #[test]
    fn pair_keeps_later_duplicate() {
        let first  = HandSketch::new(Handedness::Right).at(0.2, 0.5).build();
        let second = HandSketch::new(Handedness::Right).at(0.8, 0.5).build();
        let frame = PoseFrame::new(0, Duration::ZERO, vec![first, second.clone()]);
        assert_eq!(frame.pair().right, Some(&second));
        assert_eq!(frame.pair().left, None);
    }

    #[test]
    fn wrist_distance_needs_both_hands() {
        let l = HandSketch::new(Handedness::Left).at(0.7, 0.5).build();
        let r = HandSketch::new(Handedness::Right).at(0.3, 0.5).build();
        let both = PoseFrame::new(0, Duration::ZERO, vec![l.clone(), r]);
        let d = both.pair().wrist_distance().unwrap();
        assert!((d - 0.4).abs() < 1e-5);

        let one = PoseFrame::new(1, Duration::ZERO, vec![l]);
        assert_eq!(one.pair().wrist_distance(), None);
        assert_eq!(PoseFrame::empty(2, Duration::ZERO).pair().wrist_distance(), None);
    }
}
