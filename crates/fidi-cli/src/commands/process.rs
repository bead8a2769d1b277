//! File-based compression command.

use super::common::{EngineFlags, ParamFlags, display_db, resolve};
use clap::Args;
use fidi_core::{Compressor, GainReductionMeter, ParamStore, linear_to_db};
use fidi_io::{AudioBuffer, SUPPORTED_BIT_DEPTHS, read_audio, write_audio};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Meter polling period (about 30 Hz).
const METER_POLL_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    params: ParamFlags,

    #[command(flatten)]
    engine: EngineFlags,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32); defaults to the input's when supported
    #[arg(long)]
    bit_depth: Option<u16>,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }
    if let Some(bits) = args
        .bit_depth
        .filter(|bits| !SUPPORTED_BIT_DEPTHS.contains(bits))
    {
        anyhow::bail!("Unsupported bit depth {bits} (expected 16, 24 or 32)");
    }

    let (params, config) = resolve(&args.params, &args.engine)?;

    // Read input file
    println!("Reading {}...", args.input.display());
    let (mut audio, spec) = read_audio(&args.input)?;
    let frames = audio.frames();
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate.max(1))
    );

    let input_stats = LevelStats::measure(&audio);

    let store = Arc::new(ParamStore::from_params(&params));
    let meter = Arc::new(GainReductionMeter::new());
    let mut compressor = Compressor::new(Arc::clone(&store), Arc::clone(&meter), config);
    compressor.prepare(f64::from(spec.sample_rate));

    tracing::info!(
        sample_rate = spec.sample_rate,
        block_size = args.block_size,
        smoothing_interval = config.smoothing_interval,
        envelope = %config.envelope_domain,
        knee_curve = %config.knee_curve,
        "processing"
    );
    tracing::debug!(?params, "resolved parameters");

    // Display-side consumer of the meter, like a plugin UI timer.
    let running = Arc::new(AtomicBool::new(true));
    let meter_thread = {
        let meter = Arc::clone(&meter);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut deepest_db = 0.0_f32;
            while running.load(Ordering::Acquire) {
                thread::sleep(METER_POLL_INTERVAL);
                let reduction_db = meter.take_reduction_db();
                if reduction_db > 0.0 {
                    tracing::trace!(reduction_db, "meter");
                }
                deepest_db = deepest_db.max(reduction_db);
            }
            deepest_db
        })
    };

    // Process with progress bar
    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let block_size = args.block_size;
    let mut block_min_gain = 1.0_f32;
    match &mut audio {
        AudioBuffer::Mono(samples) => {
            for block in samples.chunks_mut(block_size) {
                block_min_gain = block_min_gain.min(compressor.process_mono_in_place(block));
                pb.inc(block.len() as u64);
            }
        }
        AudioBuffer::Stereo(samples) => {
            for (left, right) in samples
                .left
                .chunks_mut(block_size)
                .zip(samples.right.chunks_mut(block_size))
            {
                block_min_gain =
                    block_min_gain.min(compressor.process_stereo_in_place(left, right));
                pb.inc(left.len() as u64);
            }
        }
    }
    pb.finish_with_message("done");

    running.store(false, Ordering::Release);
    let polled_db = meter_thread
        .join()
        .map_err(|_| anyhow::anyhow!("meter thread panicked"))?;
    let deepest_db = polled_db.max(meter.take_reduction_db());
    tracing::debug!(
        polled_db,
        block_min_db = -linear_to_db(block_min_gain),
        "meter summary"
    );

    let output_stats = LevelStats::measure(&audio);

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        display_db(input_stats.rms),
        display_db(input_stats.peak)
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        display_db(output_stats.rms),
        display_db(output_stats.peak)
    );
    println!("  Max gain reduction: {deepest_db:.1} dB");

    // Write output file
    let bits = args.bit_depth.unwrap_or(if SUPPORTED_BIT_DEPTHS.contains(&spec.bits_per_sample) {
        spec.bits_per_sample
    } else {
        32
    });
    let out_spec = spec.with_bits_per_sample(bits);

    println!("\nWriting {}...", args.output.display());
    write_audio(&args.output, &audio, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Peak and RMS over every channel of a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LevelStats {
    peak: f32,
    rms: f32,
}

impl LevelStats {
    fn measure(audio: &AudioBuffer) -> Self {
        let mut peak = 0.0_f32;
        let mut sum_sq = 0.0_f64;
        let mut count = 0_usize;
        for channel in audio.channels() {
            for &s in channel {
                peak = peak.max(s.abs());
                sum_sq += f64::from(s) * f64::from(s);
            }
            count += channel.len();
        }
        let rms = if count == 0 {
            0.0
        } else {
            (sum_sq / count as f64).sqrt() as f32
        };
        Self { peak, rms }
    }
}
