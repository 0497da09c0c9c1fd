//! Stdin to speakers.
//!
//! Reads raw PCM from stdin in the requested format and plays it on an
//! output device. Exits once stdin ends and playback has drained.
//!
//! Run with: cargo run --example speaker_pipe -- -c 1 -r 16000 < capture.raw

use std::io::{self, Read};

use audio_pipe::format::{decode_samples, swap_endian};
use audio_pipe::{AudioPipe, FormatPreset, OutputPipe, Sample};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Bytes read from stdin per write into the pipe.
const READ_BYTES: usize = 4096;

#[derive(Parser, Debug)]
#[command(name = "speaker_pipe", about = "Play raw PCM from stdin on an output device")]
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

    /// Output device name (default: system default)
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
    let mut pipe = builder.open_output()?;
    tracing::info!(format = ?pipe.format(), device = ?pipe.device_format(), "playing");

    // Groups make these exclusive; -s and -w only restate the defaults
    let unsigned = args.unsigned && !args.signed;
    let long = args.long && !args.word;
    let swap = args.swap;
    match (args.float, unsigned, args.byte, long) {
        (true, ..) => pump::<f32>(&mut pipe, false)?,
        (false, false, true, _) => pump::<i8>(&mut pipe, swap)?,
        (false, false, false, true) => pump::<i32>(&mut pipe, swap)?,
        (false, false, false, false) => pump::<i16>(&mut pipe, swap)?,
        (false, true, true, _) => pump::<u8>(&mut pipe, swap)?,
        (false, true, false, true) => pump::<u32>(&mut pipe, swap)?,
        (false, true, false, false) => pump::<u16>(&mut pipe, swap)?,
    }

    pipe.wait_until_drained();
    tracing::info!(stats = ?pipe.stats(), "done");
    Ok(())
}

/// Copies stdin into the pipe until end of input.
///
/// A trailing partial sample is carried into the next read.
fn pump<S: Sample>(pipe: &mut OutputPipe, swap: bool) -> io::Result<()> {
    let mut bytes = vec![0u8; READ_BYTES];
    let mut samples = vec![S::default(); READ_BYTES / S::BYTES];
    let mut stdin = io::stdin().lock();
    let mut carried = 0;

    loop {
        let n = match stdin.read(&mut bytes[carried..]) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let total = carried + n;
        let whole = total - total % S::BYTES;

        let count = decode_samples(&bytes[..whole], &mut samples);
        if swap {
            swap_endian(&mut samples[..count]);
        }
        pipe.write(&samples[..count]);

        bytes.copy_within(whole..total, 0);
        carried = total - whole;
    }
}
