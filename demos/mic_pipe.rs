//! Microphone to stdout.
//!
//! Captures from an input device and writes raw PCM to stdout in the
//! requested format until the reader goes away.
//!
//! Run with: cargo run --example mic_pipe -- -c 1 -r 16000 > capture.raw

use std::io::{self, Write};

use audio_pipe::format::{encode_samples, swap_endian};
use audio_pipe::{AudioPipe, FormatPreset, InputPipe, Sample, MAX_TYPED_READ};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mic_pipe", about = "Pipe raw PCM from an input device to stdout")]
struct Args {
    /// Channel count (1 or 2)
    #[arg(short = 'c', default_value_t = 2, value_parser = clap::value_parser!(u16).range(1..=2))]
    channels: u16,

    /// Signed integer samples (default)
    #[arg(short = 's', group = "kind")]
    signed: bool,

    /// Unsigned integer samples
    #[arg(short = 'u', group = "kind")]
    unsigned: bool,

    /// 32-bit float samples
    #[arg(short = 'f', group = "kind")]
    float: bool,

    /// 8-bit samples
    #[arg(short = 'b', group = "width")]
    byte: bool,

    /// 16-bit samples (default)
    #[arg(short = 'w', group = "width")]
    word: bool,

    /// 32-bit samples
    #[arg(short = 'l', group = "width")]
    long: bool,

    /// Swap byte order
    #[arg(short = 'x', conflicts_with = "float")]
    swap: bool,

    /// Sample rate in Hz
    #[arg(short = 'r', default_value_t = 44_100.0)]
    rate: f64,

    /// Input device name (default: system default)
    #[arg(short = 'd', long)]
    device: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = AudioPipe::builder()
        .format(FormatPreset::Custom {
            sample_rate: args.rate,
            channels: args.channels,
        })
        .on_event(|e| tracing::warn!(?e, "pipe event"));
    if let Some(name) = &args.device {
        builder = builder.device(name);
    }
    let pipe = builder.open_input()?;
    tracing::info!(format = ?pipe.format(), device = ?pipe.device_format(), "capturing");

    // Groups make these exclusive; -s and -w only restate the defaults
    let unsigned = args.unsigned && !args.signed;
    let long = args.long && !args.word;
    let swap = args.swap;
    match (args.float, unsigned, args.byte, long) {
        (true, ..) => pump::<f32>(&pipe, false)?,
        (false, false, true, _) => pump::<i8>(&pipe, swap)?,
        (false, false, false, true) => pump::<i32>(&pipe, swap)?,
        (false, false, false, false) => pump::<i16>(&pipe, swap)?,
        (false, true, true, _) => pump::<u8>(&pipe, swap)?,
        (false, true, false, true) => pump::<u32>(&pipe, swap)?,
        (false, true, false, false) => pump::<u16>(&pipe, swap)?,
    }

    tracing::info!(stats = ?pipe.stats(), "done");
    Ok(())
}

/// Copies samples to stdout until stdout closes.
fn pump<S: Sample>(pipe: &InputPipe, swap: bool) -> io::Result<()> {
    let mut samples = vec![S::default(); MAX_TYPED_READ];
    let mut bytes = vec![0u8; MAX_TYPED_READ * S::BYTES];
    let mut stdout = io::stdout().lock();

    loop {
        let n = pipe.read(&mut samples);
        if swap {
            swap_endian(&mut samples[..n]);
        }
        let len = encode_samples(&samples[..n], &mut bytes);
        tracing::trace!(samples = n, "read");

        match stdout.write_all(&bytes[..len]) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}
