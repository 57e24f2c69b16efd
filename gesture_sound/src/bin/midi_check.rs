//! midi_check — send a few fixed messages to a MIDI port.
//!
//! Usage: `midi_check [PORT_HINT]`.  Sends filter, pitch bend and reverb
//! controllers, then holds middle C for one second.  Use it to confirm the
//! synth or DAW is listening before performing.

use std::thread;
use std::time::Duration;

use gesture_midi::MidiSink;
use gesture_sound::output::open_midi_output;

const STEP: Duration = Duration::from_millis(300);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_sound=info".into()),
        )
        .init();

    let hint = std::env::args().nth(1);
    let mut sink = open_midi_output(hint.as_deref())?;
    println!("  Connected to {}", sink.port_name());

    println!("  CC74 (filter) = 100");
    sink.control_change(0, 74, 100)?;
    thread::sleep(STEP);

    println!("  Pitch bend = 4000");
    sink.pitch_bend(0, 4000)?;
    thread::sleep(STEP);

    println!("  CC91 (reverb) = 100");
    sink.control_change(0, 91, 100)?;
    thread::sleep(STEP);

    println!("  Note 60 velocity 100, one second");
    sink.note_on(0, 60, 100)?;
    thread::sleep(Duration::from_secs(1));
    sink.note_off(0, 60, 0)?;

    sink.pitch_bend(0, 0)?;
    println!("  Done");
    Ok(())
}
