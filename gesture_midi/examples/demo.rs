//! Runs both engines over a scripted performance and prints the MIDI.

use std::time::Duration;

use gesture_midi::{build_engine, EngineConfig, EngineMode, RecordingSink};
use hand_pose::shape::{HandShape, HandSketch};
use hand_pose::{FingerId, Handedness, HandPose, PoseFrame};

const FRAME: Duration = Duration::from_millis(33);

fn right(shape: HandShape, y: f32) -> HandPose {
    HandSketch::shaped(Handedness::Right, shape).at(0.35, y).build()
}

fn left(shape: HandShape, x: f32) -> HandPose {
    HandSketch::shaped(Handedness::Left, shape).at(x, 0.6).build()
}

/// A short gesture sequence, a few frames per pose.
fn script() -> Vec<PoseFrame> {
    let mut poses: Vec<Vec<HandPose>> = Vec::new();
    let mut hold = |n: usize, hands: Vec<HandPose>| {
        for _ in 0..n {
            poses.push(hands.clone());
        }
    };

    hold(3, vec![right(HandShape::Point, 0.7)]);
    hold(3, vec![right(HandShape::Peace, 0.6)]);
    hold(3, vec![HandSketch::shaped(Handedness::Right, HandShape::Peace)
        .at(0.35, 0.55)
        .extend(FingerId::Ring)
        .build()]);
    hold(3, vec![right(HandShape::Open, 0.5)]);
    hold(2, vec![right(HandShape::Fist, 0.5)]);
    hold(4, vec![right(HandShape::Combo, 0.5), left(HandShape::Open, 0.75)]);
    hold(4, vec![right(HandShape::Pinky, 0.5), left(HandShape::Point, 0.9)]);
    hold(2, vec![]);

    poses.into_iter()
        .enumerate()
        .map(|(i, hands)| PoseFrame::new(i as u64, FRAME * i as u32, hands))
        .collect()
}

fn run(mode: EngineMode, frames: &[PoseFrame]) {
    println!("── {} mode ──────────────────────────────────────────────", mode);
    let mut engine = build_engine(mode, EngineConfig::default());
    let mut sink = RecordingSink::new();

    for frame in frames {
        engine.process(frame, &mut sink);
        let g = engine.gestures();
        for m in sink.take() {
            println!(
                "  {:>4} ms  {:<9} {:<9}  {}",
                frame.elapsed.as_millis(),
                g.left.map(|l| l.name()).unwrap_or("-"),
                g.right.map(|l| l.name()).unwrap_or("-"),
                m,
            );
        }
    }

    engine.shutdown(&mut sink);
    for m in sink.take() {
        println!("  release            {}", m);
    }

    let c = engine.controls();
    println!(
        "  final controls: filter {:.1}  reverb {:.1}  aux {:.1}  bend {:.0}\n",
        c.filter, c.reverb, c.aux_mix, c.pitch_bend,
    );
}

fn main() {
    println!("\n=== Gesture MIDI Demo ===\n");
    let frames = script();
    println!("{} frames, {} ms apart\n", frames.len(), FRAME.as_millis());

    run(EngineMode::Performance, &frames);
    run(EngineMode::Pulse, &frames);
}
