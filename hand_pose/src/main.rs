//! gesture_probe: print the gesture held by each hand in a landmark stream.
//!
//! Usage: `gesture_probe [FILE]` (reads stdin when FILE is absent or `-`).
//! A line is printed whenever either hand's gesture changes, with the
//! extended fingers of each hand (`TIMRP`, `.` for a curled finger).

use std::io;

use hand_pose::{
    classify, ClassifierConfig, FingerId, GestureLabel, HandPose, Handedness, JsonLinesSource,
    PoseSource,
};
use tracing::error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand_pose=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let path = std::env::args().nth(1).filter(|p| p != "-");
    let mut source: Box<dyn PoseSource> = match path {
        Some(p) => match JsonLinesSource::open(&p) {
            Ok(s)  => Box::new(s),
            Err(e) => {
                eprintln!("Error: {}: {}", p, e);
                std::process::exit(1);
            }
        },
        None => Box::new(JsonLinesSource::new(io::stdin().lock())),
    };

    println!();
    println!("  Hand gesture probe: press Ctrl-D (or end the pipe) to stop");
    println!();

    let cfg = ClassifierConfig::default();
    let mut last: (Option<GestureLabel>, Option<GestureLabel>) = (None, None);
    let mut frames = 0u64;

    loop {
        let frame = match source.next_frame() {
            Ok(Some(f)) => f,
            Ok(None)    => break,
            Err(e)      => { error!("{}", e); break; }
        };
        frames += 1;

        let hands = frame.pair();
        let left  = hands.hand(Handedness::Left);
        let right = hands.hand(Handedness::Right);
        let now = (left.map(|h| classify(h, &cfg)), right.map(|h| classify(h, &cfg)));
        if now != last {
            println!(
                "  frame {:>6}  {:>8.3}s   Left: {:<10} {:<5}  Right: {:<10} {:<5}",
                frame.sequence,
                frame.elapsed.as_secs_f64(),
                show(now.0),
                fingers(left, &cfg),
                show(now.1),
                fingers(right, &cfg),
            );
            last = now;
        }
    }

    println!();
    println!("  {} frames read", frames);
}

fn show(label: Option<GestureLabel>) -> &'static str {
    label.map(GestureLabel::name).unwrap_or("-")
}

fn fingers(hand: Option<&HandPose>, cfg: &ClassifierConfig) -> String {
    let Some(hand) = hand else { return String::new() };
    let flags = hand.extension_flags(cfg.extension_threshold);
    FingerId::ALL.iter()
        .map(|&f| if flags.get(f) { f.name().as_bytes()[0].to_ascii_uppercase() as char } else { '.' })
        .collect()
}
