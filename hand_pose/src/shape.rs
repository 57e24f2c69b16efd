//! Synthetic hand poses.
//!
//! A [`HandSketch`] describes a hand by wrist position and which fingers are
//! out, and builds a full 21-point [`HandPose`] from it.  The proportions are
//! chosen so that both extension tests and the classifier agree with the
//! sketch: an extended finger reaches 0.10 from its MCP, a curled one 0.01.
//! Used by the keyboard/mouse simulator and by tests that need poses without
//! a camera.

use crate::{
    FingerId, HandPose, Handedness, Landmark, LANDMARK_COUNT, INDEX_DIP, INDEX_PIP, INDEX_TIP,
    THUMB_CMC, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};

// Offsets from the wrist for a right hand at scale 1.0; y grows downward.
const THUMB_CMC_AT:    (f32, f32) = (-0.05, -0.03);
const THUMB_MCP_AT:    (f32, f32) = (-0.08, -0.06);
const THUMB_OUT:       [(f32, f32); 2] = [(-0.10, -0.08), (-0.12, -0.10)];
const THUMB_TUCKED:    [(f32, f32); 2] = [(-0.07, -0.05), (-0.06, -0.03)];
const FINGER_BASE_X:   [f32; 4] = [-0.03, -0.01, 0.01, 0.03];
const FINGER_MCP_Y:    f32 = -0.10;
const FINGER_OUT_Y:    [f32; 3] = [-0.14, -0.17, -0.20];
const FINGER_CURLED_Y: [f32; 3] = [-0.13, -0.11, -0.09];

// ════════════════════════════════════════════════════════════════════════════
// HandShape
// ════════════════════════════════════════════════════════════════════════════

/// Named hand shapes, one per reachable gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandShape {
    Open,
    Fist,
    Point,
    Peace,
    Pinky,
    Pinch,
    Combo,
}

impl HandShape {
    pub const ALL: [HandShape; 7] = [
        HandShape::Open,
        HandShape::Fist,
        HandShape::Point,
        HandShape::Peace,
        HandShape::Pinky,
        HandShape::Pinch,
        HandShape::Combo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HandShape::Open  => "open",
            HandShape::Fist  => "fist",
            HandShape::Point => "point",
            HandShape::Peace => "peace",
            HandShape::Pinky => "pinky",
            HandShape::Pinch => "pinch",
            HandShape::Combo => "combo",
        }
    }

    /// Extended flags in `FingerId::ALL` order (thumb first).
    fn extended(self) -> [bool; 5] {
        match self {
            HandShape::Open  => [true,  true,  true,  true,  true ],
            HandShape::Fist  => [false, false, false, false, false],
            HandShape::Point => [false, true,  false, false, false],
            HandShape::Peace => [false, true,  true,  false, false],
            HandShape::Pinky => [false, false, false, false, true ],
            HandShape::Pinch => [true,  false, false, false, false],
            HandShape::Combo => [false, true,  false, false, true ],
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSketch
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct HandSketch {
    pub handedness: Handedness,
    pub wrist_x:    f32,
    pub wrist_y:    f32,
    /// Size multiplier; 1.0 is a hand at arm's length from a webcam.
    pub scale:      f32,
    pub extended:   [bool; 5],
    /// Index tip touching the thumb tip.
    pub pinching:   bool,
}

impl HandSketch {
    /// A closed fist with the wrist at (0.5, 0.7).
    pub fn new(handedness: Handedness) -> Self {
        HandSketch {
            handedness,
            wrist_x:  0.5,
            wrist_y:  0.7,
            scale:    1.0,
            extended: [false; 5],
            pinching: false,
        }
    }

    pub fn shaped(handedness: Handedness, shape: HandShape) -> Self {
        let mut sketch = HandSketch::new(handedness);
        sketch.set_shape(shape);
        sketch
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.wrist_x = x;
        self.wrist_y = y;
        self
    }

    pub fn extend(mut self, finger: FingerId) -> Self {
        self.extended[finger as usize] = true;
        self
    }

    pub fn set_shape(&mut self, shape: HandShape) {
        self.extended = shape.extended();
        self.pinching = shape == HandShape::Pinch;
    }

    pub fn build(&self) -> HandPose {
        let mirror = match self.handedness {
            Handedness::Right =>  1.0,
            Handedness::Left  => -1.0,
        };
        let at = |(dx, dy): (f32, f32)| {
            Landmark::new(
                self.wrist_x + mirror * dx * self.scale,
                self.wrist_y + dy * self.scale,
                0.0,
            )
        };

        let mut p = [Landmark::default(); LANDMARK_COUNT];
        p[WRIST]     = at((0.0, 0.0));
        p[THUMB_CMC] = at(THUMB_CMC_AT);
        p[THUMB_MCP] = at(THUMB_MCP_AT);

        let thumb = if self.extended[FingerId::Thumb as usize] { THUMB_OUT } else { THUMB_TUCKED };
        p[THUMB_IP]  = at(thumb[0]);
        p[THUMB_TIP] = at(thumb[1]);

        for (finger, bx) in FingerId::LONG.into_iter().zip(FINGER_BASE_X) {
            let ys = if self.extended[finger as usize] { FINGER_OUT_Y } else { FINGER_CURLED_Y };
            let mcp = finger.mcp();
            p[mcp] = at((bx, FINGER_MCP_Y));
            for (k, y) in ys.into_iter().enumerate() {
                p[mcp + 1 + k] = at((bx, y));
            }
        }

        if self.pinching {
            let (tx, ty) = thumb[1];
            p[INDEX_PIP] = at((-0.05, -0.14));
            p[INDEX_DIP] = at((-0.08, -0.13));
            p[INDEX_TIP] = at((tx + 0.01, ty));
        }

        HandPose::from_array(self.handedness, p)
    }
}
