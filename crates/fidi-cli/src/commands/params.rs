//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use fidi_core::{EnvelopeDomain, KneeCurve, ParamDescriptor, ParamIndex};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for a single parameter (by string id, e.g. "ratio")
    #[arg(value_name = "PARAM")]
    param: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.param {
        let param = ParamIndex::from_string_id(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown parameter: {id} (run `fidi params`)"))?;
        print_details(&param.descriptor());
        return Ok(());
    }

    println!("Compressor Parameters");
    println!("=====================");
    println!();
    println!(
        "  {:12}  {:10}  {:>9}  {:>9}  {:>9}  {}",
        "Id", "Name", "Min", "Max", "Default", "Unit"
    );
    println!(
        "  {:12}  {:10}  {:>9}  {:>9}  {:>9}  {}",
        "--", "----", "---", "---", "-------", "----"
    );
    for param in ParamIndex::ALL {
        let d = param.descriptor();
        println!(
            "  {:12}  {:10}  {:>9}  {:>9}  {:>9}  {}",
            d.string_id,
            d.name,
            format_value(d.min),
            format_value(d.max),
            format_value(d.default),
            d.unit.suffix().trim()
        );
    }

    println!();
    println!("Engine options:");
    println!(
        "  --envelope    {}",
        [EnvelopeDomain::Decibel, EnvelopeDomain::Linear]
            .map(EnvelopeDomain::name)
            .join(", ")
    );
    println!(
        "  --knee-curve  {}",
        KneeCurve::ALL.map(KneeCurve::name).join(", ")
    );

    Ok(())
}

fn print_details(d: &ParamDescriptor) {
    println!("{} ({})", d.name, d.string_id);
    println!("{}", "=".repeat(d.name.len() + d.string_id.len() + 3));
    println!();
    println!("  Range:    {} to {}{}", format_value(d.min), format_value(d.max), d.unit.suffix());
    println!("  Default:  {}{}", format_value(d.default), d.unit.suffix());
    println!("  Step:     {}", format_value(d.step));
    println!(
        "  Knob position of default: {:.0}%",
        d.normalize(d.default) * 100.0
    );
    println!("  Id:       {}", d.id.0);
}

fn format_value(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
