//! Integration tests for audio-pipe.
//!
//! A thread pushing or pulling fixed-size blocks stands in for the device
//! callback. Tests that require actual audio hardware are marked with
//! `#[ignore]` and should be run manually.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use audio_pipe::{
    event_callback, AudioPipe, ByteQueue, ChannelSink, FormatPreset, LinearResampler, MockSource,
    OverflowPolicy, PipeEvent, StreamFormat,
};
use tokio::sync::mpsc;

/// Simulated device callback block size, in samples.
const BLOCK: usize = 512;

#[test]
fn test_input_pipe_delivers_every_sample_in_order() {
    let device = StreamFormat::new(48_000.0, 2);
    let (pipe, mut feeder) = AudioPipe::builder()
        .buffer_frames(1024)
        .build_input(device)
        .unwrap();

    let mut mock = MockSource::new(device);
    let ramp: Vec<f32> = (0..20_000).map(|i| i as f32 / 20_000.0).collect();
    mock.add_samples(&ramp);

    // The queue holds far less than the ramp, so the feeder must block
    let hardware = thread::spawn(move || mock.feed(&mut feeder, BLOCK));

    let mut received = Vec::with_capacity(ramp.len());
    let mut out = [0.0f32; 700];
    while received.len() < ramp.len() {
        let n = pipe.read_samples(&mut out);
        received.extend_from_slice(&out[..n]);
    }
    hardware.join().unwrap();

    assert_eq!(received, ramp);
    let stats = pipe.stats();
    assert_eq!(stats.samples_queued, 20_000);
    assert_eq!(stats.samples_delivered, 20_000);
    assert_eq!(stats.dropped_bytes, 0);
}

#[test]
fn test_input_pipe_resamples_dc_exactly() {
    let device = StreamFormat::new(48_000.0, 1);
    let (pipe, mut feeder) = AudioPipe::builder()
        .format(FormatPreset::Custom {
            sample_rate: 44_100.0,
            channels: 1,
        })
        .build_input(device)
        .unwrap();
    assert!(pipe.is_resampling());

    let mut mock = MockSource::new(device);
    mock.generate_constant(-0.5, 1000);
    let hardware = thread::spawn(move || mock.feed(&mut feeder, 480));

    let mut received = Vec::new();
    let mut out = [0.0f32; 1024];
    while received.len() < 44_100 {
        let n = pipe.read_samples(&mut out);
        received.extend_from_slice(&out[..n]);
    }
    hardware.join().unwrap();

    assert_eq!(received.len(), 44_100);
    assert!(received.iter().all(|&s| (s + 0.5).abs() < 1e-5));
}

#[test]
fn test_input_pipe_typed_reads() {
    let (pipe, mut feeder) = AudioPipe::builder()
        .build_input(StreamFormat::new(8000.0, 1))
        .unwrap();

    feeder.push(&[0.5, -0.5, 1.0]);

    let mut out = [0u16; 8];
    assert_eq!(pipe.read(&mut out), 3);
    assert_eq!(&out[..3], &[49_151, 16_384, 65_535]);
}

#[test]
fn test_output_pipe_streams_through_renderer() {
    let device = StreamFormat::new(44_100.0, 2);
    let (mut pipe, mut renderer) = AudioPipe::builder()
        .format(FormatPreset::Custom {
            sample_rate: 22_050.0,
            channels: 2,
        })
        .buffer_frames(2048)
        .build_output(device)
        .unwrap();
    assert!(pipe.is_resampling());

    let rendered = Arc::new(AtomicUsize::new(0));
    let rendered_clone = rendered.clone();
    let hardware = thread::spawn(move || {
        let mut block = [0.0f32; BLOCK];
        let mut real = 0;
        while real < 20_000 {
            let n = renderer.render(&mut block);
            assert!(block[..n].iter().all(|&s| (s - 0.25).abs() < 1e-6));
            real += n;
            if n < BLOCK {
                thread::sleep(Duration::from_millis(1));
            }
        }
        rendered_clone.store(real, Ordering::SeqCst);
    });

    // 10000 samples at half the device rate become 20000 at the device
    for _ in 0..10 {
        pipe.write_samples(&[0.25; 1000]);
    }
    pipe.wait_until_drained();
    hardware.join().unwrap();

    assert_eq!(rendered.load(Ordering::SeqCst), 20_000);
    assert_eq!(pipe.stats().samples_queued, 20_000);
}

#[test]
fn test_output_underrun_fills_silence_and_reports_once() {
    let events = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let events_clone = events.clone();

    let (mut pipe, mut renderer) = AudioPipe::builder()
        .on_event(move |e| events_clone.lock().push(e))
        .build_output(StreamFormat::new(8000.0, 1))
        .unwrap();

    pipe.write_samples(&[0.5; 3]);

    let mut block = [9.0f32; 8];
    assert_eq!(renderer.render(&mut block), 3);
    assert_eq!(block, [0.5, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0]);

    pipe.write_samples(&[0.5; 8]);
    assert_eq!(renderer.render(&mut block), 8);
    assert_eq!(renderer.render(&mut block), 0);
    assert_eq!(renderer.render(&mut block), 0);

    // Startup shortfall is not an underrun; the dry spell after flowing audio is
    assert_eq!(
        *events.lock(),
        vec![PipeEvent::Underrun { missing_samples: 8 }]
    );
    let stats = pipe.stats();
    assert_eq!(stats.underruns, 1);
    assert_eq!(stats.silence_samples, 5 + 8 + 8);
}

#[test]
fn test_drop_policy_never_blocks_the_feeder() {
    let dropped = Arc::new(AtomicUsize::new(0));
    let dropped_clone = dropped.clone();

    let (pipe, mut feeder) = AudioPipe::builder()
        .buffer_frames(256)
        .overflow(OverflowPolicy::DropIncoming)
        .on_event(move |e| {
            if let PipeEvent::Overflow { dropped_bytes } = e {
                dropped_clone.fetch_add(dropped_bytes, Ordering::SeqCst);
            }
        })
        .build_input(StreamFormat::new(16_000.0, 1))
        .unwrap();

    // Nobody reads, so all but the first 256 samples are dropped
    for _ in 0..4 {
        feeder.push(&[0.1; 128]);
    }

    assert_eq!(dropped.load(Ordering::SeqCst), 256 * 4);
    let stats = pipe.stats();
    assert_eq!(stats.samples_queued, 256);
    assert_eq!(stats.dropped_bytes, 256 * 4);
    assert_eq!(pipe.reader().available(), 256);
}

#[test]
fn test_resampler_feeding_a_shared_queue() {
    let queue = Arc::new(ByteQueue::new(64 * 4).unwrap());
    let mut resampler =
        LinearResampler::with_sink(2.0, 1.0, audio_pipe::QueueSink::new(queue.clone())).unwrap();
    resampler.set_capacity(8).unwrap();

    let reader = {
        let queue = queue.clone();
        thread::spawn(move || {
            let mut bytes = vec![0u8; 50 * 4];
            let len = bytes.len();
            queue.read(&mut bytes, len);
            let mut samples = vec![0.0f32; 50];
            audio_pipe::format::decode_samples(&bytes, &mut samples);
            samples
        })
    };

    let input: Vec<f32> = (0..100).map(|i| (i / 2) as f32).collect();
    for block in input.chunks(7) {
        resampler.process(block);
        resampler.flush();
    }

    let samples = reader.join().unwrap();
    let expected: Vec<f32> = (0..50).map(|i| i as f32).collect();
    assert_eq!(samples, expected);
}

#[tokio::test]
async fn test_channel_sink_receives_resampled_batches() {
    let (tx, mut rx) = mpsc::channel::<Vec<f32>>(8);
    let mut resampler = LinearResampler::with_sink(48_000.0, 16_000.0, ChannelSink::new(tx)).unwrap();

    resampler.process(&[0.3; 960]);
    resampler.flush();
    drop(resampler);

    let mut total = 0;
    while let Some(batch) = rx.recv().await {
        assert!(batch.iter().all(|&s| (s - 0.3).abs() < 1e-6));
        total += batch.len();
    }
    assert_eq!(total, 320);
}

#[tokio::test]
async fn test_read_async_waits_for_hardware() {
    let (pipe, mut feeder) = AudioPipe::builder()
        .build_input(StreamFormat::new(16_000.0, 1))
        .unwrap();
    let reader = pipe.reader();

    let read = tokio::spawn(async move { reader.read_async(64).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!read.is_finished());

    feeder.push(&[0.1; 16]);
    let samples = read.await.unwrap().unwrap();
    assert_eq!(samples.len(), 16);
}

#[tokio::test]
async fn test_abandoned_read_async_loses_nothing() {
    let (pipe, mut feeder) = AudioPipe::builder()
        .build_input(StreamFormat::new(16_000.0, 1))
        .unwrap();
    let reader = pipe.reader();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), reader.read_async(64)).await;
    assert!(abandoned.is_err());

    feeder.push(&[0.5; 16]);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(reader.available(), 16);
}

#[test]
fn test_event_callback_helper() {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = count.clone();
    let callback = event_callback(move |_| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    callback(PipeEvent::DeviceError {
        reason: "unplugged".to_string(),
    });
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// This test requires actual audio hardware and should be run manually.
#[test]
#[ignore = "requires audio hardware"]
fn test_real_capture() {
    let pipe = AudioPipe::builder()
        .format(FormatPreset::Transcription)
        .open_input()
        .expect("Failed to open input");

    let mut total = 0;
    let mut out = [0.0f32; 1024];
    while total < 16_000 {
        total += pipe.read_samples(&mut out);
    }
    println!("Captured {total} samples");
    assert!(pipe.stats().samples_delivered >= 16_000);
}

/// This test requires actual audio hardware and should be run manually.
#[test]
#[ignore = "requires audio hardware"]
fn test_real_playback() {
    let mut pipe = AudioPipe::builder()
        .format(FormatPreset::Cd)
        .open_output()
        .expect("Failed to open output");

    let mut mock = MockSource::new(StreamFormat::new(44_100.0, 2));
    mock.generate_sine(440.0, 500);
    pipe.write_samples(mock.samples());
    pipe.wait_until_drained();
}
