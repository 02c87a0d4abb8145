// Copyright (c) 2026 rezky_nightky

mod canvas;
mod config;
mod error;
mod field;
mod frame;
mod glyph;
mod palette;
mod random;
mod render_loop;
mod runtime;
mod surface;
mod terminal;

use std::env;
use std::time::Instant;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::canvas::ViewportSurfaces;
use crate::config::{
    color_enabled_stdout, color_mode_for, default_params_usage_for_help, Args, Settings,
};
use crate::error::Result;
use crate::frame::Frame;
use crate::random::SeededSource;
use crate::render_loop::RenderLoop;
use crate::runtime::detect_color_mode;
use crate::terminal::{restore_terminal_best_effort, PerfStats, Terminal, TerminalHost};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn parse_args() -> Args {
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let mut cmd = Args::command()
        .styles(clap_styles())
        .before_help(default_params_usage_for_help())
        .help_template(help_template);
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn print_bitcolor(args: &Args) -> Result<()> {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let or_unset = |v: &str| {
        if v.is_empty() {
            "(unset)".to_string()
        } else {
            v.to_string()
        }
    };

    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", or_unset(&colorterm));
    println!("  TERM: {}", or_unset(&term));
    println!("  auto_detected: {}", detect_color_mode().label());
    let effective = color_mode_for(args)?;
    if args.colormode.is_some() {
        println!("  forced: {}", effective.label());
    }
    println!("  effective: {}", effective.label());
    Ok(())
}

fn print_perf_stats(stats: &PerfStats, fps: f64, glyphs: usize, ticks: u64, started: Instant) {
    let elapsed_s = started.elapsed().as_secs_f64().max(0.000_001);
    let frames = stats.frames.max(1) as f64;

    println!("PERF STATS:");
    println!("  elapsed_s: {:.3}", elapsed_s);
    println!("  target_fps: {:.3}", fps);
    println!("  avg_fps: {:.3}", stats.frames as f64 / elapsed_s);
    println!("  glyphs: {}", glyphs);
    println!("  ticks: {}", ticks);
    println!("  frames: {}", stats.frames);
    println!(
        "  drawn_frames: {} ({:.1}%)",
        stats.drawn_frames,
        stats.drawn_frames as f64 / frames * 100.0
    );
    println!("  avg_work_ms: {:.3}", stats.work_sum_s / frames * 1000.0);
    println!("  max_work_ms: {:.3}", stats.work_max_s * 1000.0);
    println!(
        "  late_frames: {} ({:.1}%)",
        stats.late_frames,
        stats.late_frames as f64 / frames * 100.0
    );
}

fn run(args: &Args) -> Result<()> {
    if args.check_bitcolor {
        return print_bitcolor(args);
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("GLYPHRAIN_BUILD"));
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let settings = Settings::from_args(args)?;

    let term = Terminal::new()?;
    let (cols, rows) = term.size()?;

    let mut surfaces = ViewportSurfaces::new(cols, rows, settings.metrics);
    let rng = match settings.seed {
        Some(seed) => SeededSource::from_seed(seed),
        None => SeededSource::from_os(),
    };
    let mut rain = RenderLoop::new(surfaces.viewport(), rng);
    rain.set_fade_alpha(settings.fade);

    let frame = Frame::new(cols, rows, settings.bg);
    let mut host = TerminalHost::new(
        term,
        frame,
        settings.color_mode,
        settings.fps,
        settings.duration,
    );

    let started = Instant::now();
    let result = rain.run(&mut surfaces.trail, &mut surfaces.head, &mut host);
    let stats = host.stats;
    drop(host);

    if settings.perf_stats {
        print_perf_stats(
            &stats,
            settings.fps,
            rain.field().len(),
            rain.ticks(),
            started,
        );
    }
    result
}

fn main() {
    install_exit_handlers();
    let args = parse_args();
    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
