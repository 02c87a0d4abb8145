// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::time::Duration;

use clap::Parser;
use crossterm::style::Color;

use crate::canvas::CellMetrics;
use crate::error::{RainError, Result};
use crate::render_loop::DEFAULT_FADE_ALPHA;
use crate::runtime::{detect_color_mode, ColorMode};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  glyphrain --fps 60 --fade 0.05 --cell-width 12 --cell-height 16 --color-bg black";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if !color_enabled_stdout() {
        return DEFAULT_PARAMS_USAGE.to_string();
    }
    let mut out = String::with_capacity(DEFAULT_PARAMS_USAGE.len() + 32);
    for (i, line) in DEFAULT_PARAMS_USAGE.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if let Some(rest) = line.strip_prefix("  glyphrain") {
            out.push_str("  \x1b[1;34mglyphrain\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        }
    }
    out
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "glyphrain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random source for a repeatable rain"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "fade",
        default_value_t = DEFAULT_FADE_ALPHA,
        help_heading = "APPEARANCE",
        help = "Trail fade opacity per frame (min 0.001 max 1)"
    )]
    pub fade: f32,

    #[arg(
        long = "cell-width",
        default_value_t = 12.0,
        help_heading = "APPEARANCE",
        help = "Virtual pixels per terminal column (min 1 max 64)"
    )]
    pub cell_width: f64,

    #[arg(
        long = "cell-height",
        default_value_t = 16.0,
        help_heading = "APPEARANCE",
        help = "Virtual pixels per terminal row (min 1 max 64)"
    )]
    pub cell_height: f64,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Validated run parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub fps: f64,
    pub duration: Option<Duration>,
    pub seed: Option<u64>,
    pub fade: f32,
    pub metrics: CellMetrics,
    pub color_mode: ColorMode,
    pub bg: Option<Color>,
    pub perf_stats: bool,
}

fn require_range(flag: &'static str, v: f64, min: f64, max: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(RainError::NotFinite {
            flag,
            value: v.to_string(),
        });
    }
    if v < min || v > max {
        return Err(RainError::OutOfRange {
            flag,
            value: v.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(v)
}

pub fn color_mode_for(args: &Args) -> Result<ColorMode> {
    match args.colormode {
        Some(bits) => ColorMode::from_bits(bits).ok_or(RainError::ColorMode(bits)),
        None => Ok(detect_color_mode()),
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        let fps = require_range("--fps", args.fps, 1.0, 240.0)?;
        let duration = match args.duration {
            Some(s) if !s.is_finite() => {
                return Err(RainError::NotFinite {
                    flag: "--duration",
                    value: s.to_string(),
                })
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };
        let fade = require_range("--fade", args.fade as f64, 0.001, 1.0)? as f32;
        let metrics = CellMetrics {
            width: require_range("--cell-width", args.cell_width, 1.0, 64.0)?,
            height: require_range("--cell-height", args.cell_height, 1.0, 64.0)?,
        };

        Ok(Self {
            fps,
            duration,
            seed: args.seed,
            fade,
            metrics,
            color_mode: color_mode_for(args)?,
            bg: match args.color_bg {
                ColorBg::Black => Some(Color::Black),
                ColorBg::DefaultBackground => None,
            },
            perf_stats: args.perf_stats,
        })
    }
}
