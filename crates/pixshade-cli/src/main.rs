//! pixshade: apply auto-shading to PNG pixel art from the command line.
//!
//! Loads a PNG, detects the shape under a clicked point, shades it under
//! a virtual light, and writes the result. Also generates shade ramps
//! from a single base color. Useful for:
//!
//! - Batch-shading sprites outside the editor
//! - Comparing normal-estimation strategies and shading modes
//! - Tuning configs: load with `--config`, override per flag
//! - Producing ramp palettes for hand shading
//!
//! # Usage
//!
//! ```text
//! pixshade sprite.png --at 12,20 --output shaded.png [OPTIONS]
//! pixshade --ramp-from '#5a8ac8' --ramp-count 7
//! ```
//!
//! Progress goes to stderr; data (diagnostics, ramps) goes to stdout.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use image::Rgba;
use pixshade_pipeline::{
    FillMode, Material, NormalMethod, PixelPoint, RampOptions, RampStyle, RgbaCanvas, ShadeConfig,
    ShadeDiagnostics, ShadingMode, apply_ramp, generate_ramp, shade_at,
};

/// Apply auto-shading to PNG pixel art, or generate shade ramps.
#[derive(Parser)]
#[command(name = "pixshade", version)]
struct Cli {
    /// Path to the input image (PNG). Optional in ramp-only mode.
    image_path: Option<PathBuf>,

    /// Click point selecting the shape to shade, as "X,Y".
    #[arg(long, value_name = "X,Y")]
    at: Option<String>,

    /// Output image path (PNG).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Load a shading config (JSON) before applying per-flag overrides.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Light angle in degrees, counter-clockwise from +x (90 = from
    /// above). Defaults to the config's value.
    #[arg(long)]
    light_angle: Option<f64>,

    /// Ambient floor (0-1). Defaults to the config's value.
    #[arg(long)]
    ambient: Option<f64>,

    /// Shading mode.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Normal-estimation strategy.
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Region-detection policy.
    #[arg(long, value_enum)]
    fill: Option<FillArg>,

    /// Surface material.
    #[arg(long, value_enum)]
    material: Option<MaterialArg>,

    /// Color tolerance for same-color fill (0-255).
    #[arg(long)]
    tolerance: Option<u8>,

    /// Enable rim light on edge pixels facing away from the light.
    #[arg(long)]
    rim: bool,

    /// Disable the reflected-light rim rule.
    #[arg(long)]
    no_reflected: bool,

    /// Print run diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Generate a shade ramp from a "#RRGGBB" base color and print it
    /// as JSON. Without an image this is the whole run; with one, add
    /// --use-ramp to shade with the generated colors.
    #[arg(long, value_name = "HEX")]
    ramp_from: Option<String>,

    /// Ramp length (clamped to 5-9).
    #[arg(long, default_value_t = 5)]
    ramp_count: usize,

    /// Ramp character.
    #[arg(long, value_enum, default_value_t = StyleArg::Soft)]
    ramp_style: StyleArg,

    /// Hue-swing scale for the ramp (0-1).
    #[arg(long, default_value_t = 0.5)]
    ramp_harmony: f64,

    /// Warm/cool bias for the ramp (-1 to 1).
    #[arg(long, default_value_t = 0.0)]
    ramp_temperature: f64,

    /// Replace the config's shade colors with the generated ramp.
    #[arg(long, requires = "ramp_from")]
    use_ramp: bool,
}

// ───────────────────── ValueEnum wrappers ─────────────────────────────

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Three,
    Five,
    Gradient,
}

impl From<ModeArg> for ShadingMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Three => Self::ThreeShade,
            ModeArg::Five => Self::FiveShade,
            ModeArg::Gradient => Self::Gradient,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Radial,
    Gradient,
    Sobel,
    Contour,
}

impl From<MethodArg> for NormalMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Radial => Self::Radial,
            MethodArg::Gradient => Self::Gradient,
            MethodArg::Sobel => Self::Sobel,
            MethodArg::Contour => Self::Contour,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FillArg {
    SameColor,
    Opaque,
    Bounded,
}

impl From<FillArg> for FillMode {
    fn from(arg: FillArg) -> Self {
        match arg {
            FillArg::SameColor => Self::SameColor,
            FillArg::Opaque => Self::NonTransparent,
            FillArg::Bounded => Self::BoundedArea,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MaterialArg {
    Matte,
    Glossy,
}

impl From<MaterialArg> for Material {
    fn from(arg: MaterialArg) -> Self {
        match arg {
            MaterialArg::Matte => Self::Matte,
            MaterialArg::Glossy => Self::Glossy,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Soft,
    Vivid,
}

impl From<StyleArg> for RampStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Soft => Self::Soft,
            StyleArg::Vivid => Self::Vivid,
        }
    }
}

// ───────────────────── Argument parsing helpers ───────────────────────

/// Parse a "X,Y" click point.
fn parse_point(raw: &str) -> Result<PixelPoint, String> {
    let (x_str, y_str) = raw
        .split_once(',')
        .ok_or_else(|| format!("--at must be 'X,Y', got: '{raw}'"))?;
    let x: i32 = x_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid --at X '{x_str}': {e}"))?;
    let y: i32 = y_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid --at Y '{y_str}': {e}"))?;
    Ok(PixelPoint::new(x, y))
}

/// Parse a "#RRGGBB" or "#RRGGBBAA" hex color.
fn parse_hex_color(raw: &str) -> Result<Rgba<u8>, String> {
    let hex = raw.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return Err(format!("expected #RRGGBB or #RRGGBBAA, got '{raw}'"));
    }
    let channel = |range: std::ops::Range<usize>| -> Result<u8, String> {
        hex.get(range.clone())
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| format!("invalid hex digits in '{raw}'"))
    };
    let alpha = if hex.len() == 8 { channel(6..8)? } else { 255 };
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, alpha]))
}

// ───────────────────── Config assembly ────────────────────────────────

/// Load the base config (file or defaults) and fold in per-flag
/// overrides.
fn build_config(cli: &Cli) -> Result<ShadeConfig, String> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => ShadeConfig::default(),
    };

    if let Some(angle) = cli.light_angle {
        config.light_angle = angle;
    }
    if let Some(ambient) = cli.ambient {
        config.ambient = ambient.clamp(0.0, 1.0);
    }
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(method) = cli.method {
        config.normal_method = method.into();
    }
    if let Some(fill) = cli.fill {
        config.fill_mode = fill.into();
    }
    if let Some(material) = cli.material {
        config.material = material.into();
    }
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }
    if cli.rim {
        config.rim_light = true;
    }
    if cli.no_reflected {
        config.reflected_light = false;
    }
    Ok(config)
}

// ───────────────────── Reporting ──────────────────────────────────────

fn print_report(diagnostics: &ShadeDiagnostics, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(diagnostics)
            .map_err(|e| format!("diagnostics serialization failed: {e}"))?;
        println!("{text}");
        return Ok(());
    }
    println!(
        "detect:  {:>6} px in {:.3} ms",
        diagnostics.detect.items,
        diagnostics.detect.duration.as_secs_f64() * 1e3,
    );
    println!(
        "analyze: {:>6} edge px in {:.3} ms (max distance {:.0})",
        diagnostics.analyze.items,
        diagnostics.analyze.duration.as_secs_f64() * 1e3,
        diagnostics.max_distance,
    );
    println!(
        "shade:   {:>6} px in {:.3} ms",
        diagnostics.shade.items,
        diagnostics.shade.duration.as_secs_f64() * 1e3,
    );
    println!("total:   {:.3} ms", diagnostics.total.as_secs_f64() * 1e3);
    Ok(())
}

// ───────────────────── Entry point ────────────────────────────────────

fn run(cli: &Cli) -> Result<(), String> {
    let mut config = build_config(cli)?;

    if let Some(hex) = &cli.ramp_from {
        let base = parse_hex_color(hex)?;
        let ramp = generate_ramp(&RampOptions {
            base,
            count: cli.ramp_count,
            light_angle: config.light_angle,
            material: config.material,
            style: cli.ramp_style.into(),
            harmony: cli.ramp_harmony,
            temperature: cli.ramp_temperature,
        });
        let channels: Vec<[u8; 4]> = ramp.iter().map(|c| c.0).collect();
        let text = serde_json::to_string(&channels)
            .map_err(|e| format!("ramp serialization failed: {e}"))?;
        println!("{text}");

        if cli.use_ramp {
            apply_ramp(&mut config, &ramp);
        } else if cli.image_path.is_none() {
            return Ok(());
        }
    }

    let Some(image_path) = &cli.image_path else {
        return if cli.ramp_from.is_some() {
            Ok(())
        } else {
            Err("nothing to do: pass an image plus --at, or --ramp-from".into())
        };
    };
    let at = cli
        .at
        .as_deref()
        .ok_or("--at X,Y is required when shading an image")?;
    let start = parse_point(at)?;
    let output = cli
        .output
        .as_ref()
        .ok_or("--output is required when shading an image")?;

    eprintln!("Reading image from {}", image_path.display());
    let image = image::open(image_path)
        .map_err(|e| format!("cannot open {}: {e}", image_path.display()))?
        .to_rgba8();
    let mut canvas = RgbaCanvas::new(image);

    eprintln!("Shading at ({}, {})...", start.x, start.y);
    let diagnostics =
        shade_at(&mut canvas, start, None, &config).map_err(|e| e.to_string())?;

    eprintln!("Saving to {}", output.display());
    canvas
        .into_image()
        .save(output)
        .map_err(|e| format!("cannot save {}: {e}", output.display()))?;

    print_report(&diagnostics, cli.json)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_spaces_and_negatives() {
        assert_eq!(parse_point("3,4").unwrap(), PixelPoint::new(3, 4));
        assert_eq!(parse_point(" -2 , 7 ").unwrap(), PixelPoint::new(-2, 7));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn parse_hex_color_handles_both_lengths() {
        assert_eq!(
            parse_hex_color("#5a8ac8").unwrap(),
            Rgba([0x5A, 0x8A, 0xC8, 255])
        );
        assert_eq!(
            parse_hex_color("10203040").unwrap(),
            Rgba([0x10, 0x20, 0x30, 0x40])
        );
        assert!(parse_hex_color("#123").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn cli_overrides_replace_config_fields() {
        let cli = Cli::parse_from([
            "pixshade",
            "input.png",
            "--at",
            "1,1",
            "--output",
            "out.png",
            "--light-angle",
            "270",
            "--mode",
            "gradient",
            "--material",
            "glossy",
            "--no-reflected",
        ]);
        let config = build_config(&cli).unwrap();
        assert!((config.light_angle - 270.0).abs() < f64::EPSILON);
        assert_eq!(config.mode, ShadingMode::Gradient);
        assert_eq!(config.material, Material::Glossy);
        assert!(!config.reflected_light);
        // Untouched fields keep their defaults.
        assert_eq!(config.tolerance, ShadeConfig::DEFAULT_TOLERANCE);
    }
}
