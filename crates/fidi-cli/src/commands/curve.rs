//! Static transfer curve command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::{EngineFlags, ParamFlags, resolve};
use clap::Args;
use fidi_core::static_curve;

/// Longest table `fidi curve` will print.
const MAX_ROWS: usize = 10_000;

#[derive(Args)]
pub struct CurveArgs {
    #[command(flatten)]
    params: ParamFlags,

    #[command(flatten)]
    engine: EngineFlags,

    /// Lowest input level in dB
    #[arg(long, default_value = "-60", allow_hyphen_values = true)]
    from: f32,

    /// Highest input level in dB
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    to: f32,

    /// Step between rows in dB
    #[arg(long, default_value = "2")]
    step: f32,
}

/// One row of the transfer table.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CurvePoint {
    input_db: f32,
    output_db: f32,
    reduction_db: f32,
}

pub fn run(args: CurveArgs) -> anyhow::Result<()> {
    if !(args.step.is_finite() && args.step > 0.0) {
        anyhow::bail!("--step must be a positive number of dB");
    }
    if !(args.from.is_finite() && args.to.is_finite()) || args.from > args.to {
        anyhow::bail!("--from must not exceed --to");
    }
    let rows = row_count(&args);
    if rows > MAX_ROWS {
        anyhow::bail!("--step is too small: {rows} rows requested (at most {MAX_ROWS})");
    }

    let (params, config) = resolve(&args.params, &args.engine)?;
    let points = curve_points(&args, |level_db| {
        static_curve(
            level_db,
            params.threshold_db,
            params.ratio,
            params.knee_db,
            config.knee_curve,
        )
    });

    println!(
        "Threshold {:.1} dB, ratio {:.1}:1, knee {:.1} dB ({}), makeup {:.1} dB",
        params.threshold_db, params.ratio, params.knee_db, config.knee_curve, params.makeup_db
    );
    println!();
    println!("  {:>9}  {:>9}  {:>9}", "Input dB", "Output dB", "GR dB");
    println!("  {:>9}  {:>9}  {:>9}", "--------", "---------", "-----");
    for point in points {
        println!(
            "  {:>9.2}  {:>9.2}  {:>9.2}",
            point.input_db,
            point.output_db + params.makeup_db,
            point.reduction_db
        );
    }

    Ok(())
}

/// Rows from `from` to `to` inclusive; saturates instead of overflowing.
fn row_count(args: &CurveArgs) -> usize {
    (((args.to - args.from) / args.step).floor() as usize).saturating_add(1)
}

fn curve_points(args: &CurveArgs, reduction: impl Fn(f32) -> f32) -> Vec<CurvePoint> {
    (0..row_count(args).min(MAX_ROWS))
        .map(|i| {
            let input_db = args.from + i as f32 * args.step;
            let reduction_db = reduction(input_db);
            CurvePoint {
                input_db,
                output_db: input_db - reduction_db,
                reduction_db,
            }
        })
        .collect()
}
