//! Simulated hands, driven from the window.
//!
//! The visualizer turns mouse and keys into [`SimInput`]s and sends them
//! here; [`SimHands`] folds them into two sketched hands and hands out a
//! [`PoseFrame`] per call, like a camera would.  Shapes are built so the
//! classifier labels them as named.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use hand_pose::shape::{HandShape, HandSketch};
use hand_pose::{Handedness, PoseFrame, PoseSource};
use tracing::debug;

/// Raw input from the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in normalised image coordinates.
    Pointer { x: f32, y: f32 },
    /// Number keys 1–7.
    Shape(HandShape),
    /// Tab.
    SwitchHand,
    /// H.
    ToggleVisible,
}

/// Shape bound to each number key, in key order.
pub const SHAPE_KEYS: [HandShape; 7] = [
    HandShape::Open,
    HandShape::Fist,
    HandShape::Point,
    HandShape::Peace,
    HandShape::Pinky,
    HandShape::Pinch,
    HandShape::Combo,
];

#[derive(Clone, Debug)]
struct SimHand {
    sketch:  HandSketch,
    shape:   HandShape,
    visible: bool,
}

impl SimHand {
    fn new(handedness: Handedness, x: f32, visible: bool) -> Self {
        SimHand {
            sketch: HandSketch::shaped(handedness, HandShape::Fist).at(x, 0.6),
            shape:  HandShape::Fist,
            visible,
        }
    }
}

pub struct SimHands {
    rx:       Receiver<SimInput>,
    left:     SimHand,
    right:    SimHand,
    active:   Handedness,
    sequence: u64,
    started:  Instant,
}

impl SimHands {
    /// Right hand shown as a fist, left hand hidden; the right hand is active.
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHands {
            rx,
            left:     SimHand::new(Handedness::Left, 0.3, false),
            right:    SimHand::new(Handedness::Right, 0.7, true),
            active:   Handedness::Right,
            sequence: 0,
            started:  Instant::now(),
        }
    }

    pub fn active(&self) -> Handedness { self.active }

    pub fn shape(&self, handedness: Handedness) -> HandShape {
        self.hand(handedness).shape
    }

    pub fn is_visible(&self, handedness: Handedness) -> bool {
        self.hand(handedness).visible
    }

    fn hand(&self, handedness: Handedness) -> &SimHand {
        match handedness {
            Handedness::Left  => &self.left,
            Handedness::Right => &self.right,
        }
    }

    fn active_mut(&mut self) -> &mut SimHand {
        match self.active {
            Handedness::Left  => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => {
                let hand = self.active_mut();
                hand.sketch.wrist_x = x.clamp(0.0, 1.0);
                hand.sketch.wrist_y = y.clamp(0.0, 1.0);
            }
            SimInput::Shape(shape) => {
                let hand = self.active_mut();
                hand.sketch.set_shape(shape);
                hand.shape = shape;
                debug!(hand = %self.active, shape = shape.name(), "sim shape");
            }
            SimInput::SwitchHand => {
                self.active = match self.active {
                    Handedness::Left  => Handedness::Right,
                    Handedness::Right => Handedness::Left,
                };
                self.active_mut().visible = true;
            }
            SimInput::ToggleVisible => {
                let hand = self.active_mut();
                hand.visible = !hand.visible;
            }
        }
    }

    /// Current frame contents: visible hands, left first.
    pub fn hands(&self) -> Vec<hand_pose::HandPose> {
        [&self.left, &self.right].into_iter()
            .filter(|h| h.visible)
            .map(|h| h.sketch.build())
            .collect()
    }
}

impl PoseSource for SimHands {
    /// Ends once the window side of the channel is gone.
    fn next_frame(&mut self) -> hand_pose::Result<Option<PoseFrame>> {
        loop {
            match self.rx.try_recv() {
                Ok(input)                       => self.apply(input),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => return Ok(None),
            }
        }
        let frame = PoseFrame::new(self.sequence, self.started.elapsed(), self.hands());
        self.sequence += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::{classify, ClassifierConfig, GestureLabel};
    use std::sync::mpsc;

    fn labels(frame: &PoseFrame) -> (Option<GestureLabel>, Option<GestureLabel>) {
        let cfg = ClassifierConfig::default();
        let pair = frame.pair();
        (pair.left.map(|h| classify(h, &cfg)), pair.right.map(|h| classify(h, &cfg)))
    }

    #[test]
    fn starts_with_a_right_fist() {
        let (_tx, rx) = mpsc::channel();
        let mut sim = SimHands::new(rx);
        let f = sim.next_frame().unwrap().unwrap();
        assert_eq!(labels(&f), (None, Some(GestureLabel::Fist)));
        assert_eq!(sim.active(), Handedness::Right);
    }

    #[test]
    fn number_keys_shape_the_active_hand() {
        let (tx, rx) = mpsc::channel();
        let mut sim = SimHands::new(rx);
        let want = [
            GestureLabel::OpenHand,
            GestureLabel::Fist,
            GestureLabel::Point,
            GestureLabel::Peace,
            GestureLabel::PinkyOut,
            GestureLabel::Pinch,
            GestureLabel::ComboSign,
        ];
        for (shape, label) in SHAPE_KEYS.into_iter().zip(want) {
            tx.send(SimInput::Shape(shape)).unwrap();
            let f = sim.next_frame().unwrap().unwrap();
            assert_eq!(labels(&f).1, Some(label), "{}", shape.name());
        }
    }

    #[test]
    fn tab_switches_and_shows_the_other_hand() {
        let (tx, rx) = mpsc::channel();
        let mut sim = SimHands::new(rx);
        tx.send(SimInput::SwitchHand).unwrap();
        tx.send(SimInput::Shape(HandShape::Point)).unwrap();
        tx.send(SimInput::Pointer { x: 0.25, y: 1.5 }).unwrap();
        let f = sim.next_frame().unwrap().unwrap();

        assert_eq!(sim.active(), Handedness::Left);
        assert_eq!(labels(&f), (Some(GestureLabel::Point), Some(GestureLabel::Fist)));
        let left = f.pair().left.unwrap();
        assert!((left.wrist().x - 0.25).abs() < 1e-6);
        assert!((left.wrist().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn h_hides_the_active_hand() {
        let (tx, rx) = mpsc::channel();
        let mut sim = SimHands::new(rx);
        tx.send(SimInput::ToggleVisible).unwrap();
        assert!(sim.next_frame().unwrap().unwrap().is_empty());
        assert!(!sim.is_visible(Handedness::Right));
    }

    #[test]
    fn frames_are_numbered_and_end_with_the_window() {
        let (tx, rx) = mpsc::channel();
        let mut sim = SimHands::new(rx);
        assert_eq!(sim.next_frame().unwrap().unwrap().sequence, 0);
        assert_eq!(sim.next_frame().unwrap().unwrap().sequence, 1);
        drop(tx);
        assert!(sim.next_frame().unwrap().is_none());
    }
}
