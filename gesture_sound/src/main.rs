//! gesture_sound: interactive entry point.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gesture_midi::EngineMode;
use gesture_sound::app::{run, AppConfig, InputSpec};
use gesture_sound::output::{list_ports, DEFAULT_PORT_HINT};

#[derive(Parser, Debug)]
#[command(author, version, about = "Hand gestures to MIDI", long_about = None)]
struct Args {
    /// Mapping mode: performance or pulse
    #[arg(short, long)]
    mode: Option<EngineMode>,

    /// MIDI output port (substring of its name)
    #[arg(short, long)]
    port: Option<String>,

    /// List MIDI output ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Pose input: `sim`, `-` for stdin, or a JSON-lines file
    #[arg(short, long)]
    input: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// No window (needs a stdin or file input)
    #[arg(long)]
    headless: bool,

    /// Log MIDI instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Skip the port prompt and use the default port
    #[arg(long)]
    quick: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_sound=info,gesture_midi=info,hand_pose=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.list_ports {
        let ports = list_ports()?;
        if ports.is_empty() {
            println!("  No MIDI output ports.");
        }
        for (i, name) in ports.iter().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         Gesture Sound — Hand Gesture MIDI Controller         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut cfg = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(mode)  = args.mode       { cfg.mode = mode; }
    if let Some(port)  = args.port       { cfg.port = Some(port); }
    if let Some(input) = args.input      { cfg.input = input; }
    if args.headless                     { cfg.window = false; }
    if args.dry_run                      { cfg.dry_run = true; }

    println!("  Mode:  {}", cfg.mode);
    match cfg.input_spec() {
        InputSpec::Sim        => println!("  Input: mouse + keyboard simulation"),
        InputSpec::Stdin      => println!("  Input: JSON lines on stdin"),
        InputSpec::File(path) => println!("  Input: {}", path.display()),
    }

    // stdin may be the pose stream; never prompt on it then
    let stdin_free = cfg.input_spec() != InputSpec::Stdin;
    if cfg.port.is_none() && !cfg.dry_run && !args.quick && stdin_free {
        cfg.port = pick_port()?;
    }
    println!();

    let reason = run(cfg)?;
    println!("  Stopped ({:?})", reason);
    Ok(())
}

/// Numbered port list on stdout, choice on stdin.  `None` keeps the default.
fn pick_port() -> anyhow::Result<Option<String>> {
    let ports = list_ports()?;
    if ports.is_empty() {
        return Ok(None);
    }
    println!("  MIDI output ports:");
    println!("    0. default ({} or first synth)", DEFAULT_PORT_HINT);
    for (i, name) in ports.iter().enumerate() {
        println!("    {}. {}", i + 1, name);
    }
    let choice = read_line("  Port (default 0): ").trim().parse::<usize>().unwrap_or(0);
    Ok(choice.checked_sub(1).and_then(|i| ports.get(i)).cloned())
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
