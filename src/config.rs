// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::charset::{build_chars, charset_from_str};
use crate::error::ConfigError;
use crate::runtime::{BoldMode, ColorMode, ColorScheme};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  glyphrain --fps 60 --glyph-size 24 --speed 1,4 --gap-ratio 0.2 --flickerpct 40 --color green --charset matrix --bold 1";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedRange {
    pub low: f32,
    pub high: f32,
}

impl FromStr for SpeedRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: LOW,HIGH".to_string())?;
        let low: f32 = a
            .trim()
            .parse()
            .map_err(|_| "invalid low value".to_string())?;
        let high: f32 = b
            .trim()
            .parse()
            .map_err(|_| "invalid high value".to_string())?;
        Ok(Self { low, high })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "glyphrain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "GENERAL",
        help = "Target FPS (min 1 max 240; 0 = uncapped)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on any keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random generator for a reproducible rain"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs to this file (filter with RUST_LOG). Without it, logs go to stderr and are dropped while the rain is on screen"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        short = 'g',
        long = "glyph-size",
        default_value_t = 24.0,
        help_heading = "RAIN",
        help = "Glyph size in surface units; one terminal cell (min 1 max 256)"
    )]
    pub glyph_size: f32,

    #[arg(
        short = 'S',
        long = "speed",
        default_value = "1,4",
        help_heading = "RAIN",
        help = "Column speed range in units per frame: LOW,HIGH (min 0.01 max 256)"
    )]
    pub speed: SpeedRange,

    #[arg(
        short = 'e',
        long = "gap-ratio",
        default_value_t = 0.2,
        help_heading = "RAIN",
        help = "How often gaps open and how long they run (min 0 max 0.95)"
    )]
    pub gap_ratio: f64,

    #[arg(
        long = "flickerpct",
        default_value_t = 40.0,
        help_heading = "RAIN",
        help = "Per-frame chance that a column re-rolls one glyph, in percent (min 0 max 100)"
    )]
    pub flicker_pct: f64,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "green",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'b',
        long = "bold",
        default_value_t = 1,
        help_heading = "APPEARANCE",
        help = "Bold mode (min 0 max 2): 0=off, 1=sentence heads, 2=all"
    )]
    pub bold: u8,

    #[arg(
        long = "charset",
        default_value = "matrix",
        help_heading = "CHARSET",
        help = "Charset preset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "chars",
        help_heading = "CHARSET",
        help = "Custom characters override, e.g. \"01\""
    )]
    pub chars: Option<String>,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charset presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,

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

/// Tuning of the rain itself. Everything here is cosmetic.
#[derive(Clone, Debug, PartialEq)]
pub struct RainConfig {
    /// Glyph height and column spacing in surface units.
    pub glyph_size: f32,
    /// Chance of opening a gap, and the gap length target as a share of capacity.
    pub empty_ratio: f64,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Per-frame chance that a column re-rolls one of its glyphs.
    pub flicker_chance: f64,
    /// Upper sentence bound is `capacity / sentence_divisor`.
    pub sentence_divisor: f32,
    /// Buffers longer than `trim_threshold * capacity` are cut back to
    /// `trim_keep * capacity`.
    pub trim_threshold: usize,
    pub trim_keep: usize,
    pub scheme: ColorScheme,
    pub bold: BoldMode,
    pub alphabet: Vec<char>,
    pub seed: Option<u64>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            glyph_size: 24.0,
            empty_ratio: 0.2,
            speed_min: 1.0,
            speed_max: 4.0,
            flicker_chance: 0.4,
            sentence_divisor: 1.4,
            trim_threshold: 3,
            trim_keep: 2,
            scheme: ColorScheme::Green,
            bold: BoldMode::Highlight,
            alphabet: "0123456789qwertyuiopasdfghjklzxcvbnm".chars().collect(),
            seed: None,
        }
    }
}

/// How the terminal host runs the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct HostConfig {
    /// `None` runs uncapped.
    pub fps: Option<f64>,
    pub duration: Option<Duration>,
    pub color_mode: ColorMode,
    pub default_background: bool,
    pub screensaver: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub rain: RainConfig,
    pub host: HostConfig,
}

fn require_f64_range(flag: &'static str, v: f64, min: f64, max: f64) -> Result<f64, ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NotFinite { flag, value: v });
    }
    if v < min || v > max {
        return Err(ConfigError::OutOfRange {
            flag,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

fn require_f32_range(flag: &'static str, v: f32, min: f32, max: f32) -> Result<f32, ConfigError> {
    require_f64_range(flag, v as f64, min as f64, max as f64).map(|v| v as f32)
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = std::env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color16
}

pub fn color_mode_from(forced: Option<u16>) -> Result<ColorMode, ConfigError> {
    match forced {
        None => Ok(detect_color_mode_auto()),
        Some(0) => Ok(ColorMode::Mono),
        Some(16) => Ok(ColorMode::Color16),
        Some(8) | Some(256) => Ok(ColorMode::Color256),
        Some(24) | Some(32) => Ok(ColorMode::TrueColor),
        Some(m) => Err(ConfigError::ColorMode(m)),
    }
}

pub fn parse_color_scheme(s: &str) -> Result<ColorScheme, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "green" | "matrix" => Ok(ColorScheme::Green),
        "emerald" => Ok(ColorScheme::Emerald),
        "gold" => Ok(ColorScheme::Gold),
        "amber" => Ok(ColorScheme::Amber),
        "red" => Ok(ColorScheme::Red),
        "blue" => Ok(ColorScheme::Blue),
        "cyan" => Ok(ColorScheme::Cyan),
        "purple" => Ok(ColorScheme::Purple),
        "gray" | "grey" => Ok(ColorScheme::Gray),
        _ => Err(ConfigError::ColorScheme(s.to_string())),
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let fps = if args.fps == 0.0 {
            None
        } else {
            Some(require_f64_range("--fps", args.fps, 1.0, 240.0)?)
        };

        let duration = match args.duration {
            Some(s) if !s.is_finite() => {
                return Err(ConfigError::NotFinite {
                    flag: "--duration",
                    value: s,
                })
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };

        let glyph_size = require_f32_range("--glyph-size", args.glyph_size, 1.0, 256.0)?;
        let speed_min = require_f32_range("--speed low", args.speed.low, 0.01, 256.0)?;
        let speed_max = require_f32_range("--speed high", args.speed.high, 0.01, 256.0)?;
        if speed_min >= speed_max {
            return Err(ConfigError::SpeedRange {
                low: speed_min,
                high: speed_max,
            });
        }
        let empty_ratio = require_f64_range("--gap-ratio", args.gap_ratio, 0.0, 0.95)?;
        let flicker_pct = require_f64_range("--flickerpct", args.flicker_pct, 0.0, 100.0)?;

        let bold = match require_f64_range("--bold", args.bold as f64, 0.0, 2.0)? as u8 {
            0 => BoldMode::Off,
            2 => BoldMode::All,
            _ => BoldMode::Highlight,
        };

        let charset = charset_from_str(&args.charset)?;
        let alphabet = build_chars(charset, args.chars.as_deref());

        let rain = RainConfig {
            glyph_size,
            empty_ratio,
            speed_min,
            speed_max,
            flicker_chance: flicker_pct / 100.0,
            scheme: parse_color_scheme(&args.color)?,
            bold,
            alphabet,
            seed: args.seed,
            ..RainConfig::default()
        };

        let host = HostConfig {
            fps,
            duration,
            color_mode: color_mode_from(args.colormode)?,
            default_background: args.color_bg == ColorBg::DefaultBackground,
            screensaver: args.screensaver,
        };

        Ok(Self { rain, host })
    }
}

pub fn print_list_charsets() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE CHARSET PRESETS:\x1b[0m");
    } else {
        println!("AVAILABLE CHARSET PRESETS:");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("matrix       Digits + lowercase letters (default)");
    println!("digits       Digits only (aliases: dec, decimal)");
    println!("hex          0-9 and a-f (alias: hexadecimal)");
    println!("binary       0 and 1 (aliases: bin, 01)");
    println!("letters      Lowercase letters (alias: english)");
    println!("katakana     Half-width katakana");
    println!("ascii        Letters + digits + punctuation");
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR THEMES:\x1b[0m");
    } else {
        println!("AVAILABLE COLOR THEMES:");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("green        Classic green rain (alias: matrix)");
    println!("emerald      Deep green");
    println!("gold         Gold");
    println!("amber        Amber monitor");
    println!("red          Red");
    println!("blue         Blue");
    println!("cyan         Cyan");
    println!("purple       Purple");
    println!("gray         Gray (alias: grey)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["glyphrain"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_match_rain_config_default() {
        let s = Settings::from_args(&parse(&["--colormode", "24"])).unwrap();
        assert_eq!(s.rain, RainConfig::default());
        assert_eq!(s.host.fps, Some(60.0));
        assert_eq!(s.host.color_mode, ColorMode::TrueColor);
        assert!(!s.host.default_background);
        assert_eq!(s.host.duration, None);
    }

    #[test]
    fn zero_fps_runs_uncapped() {
        let s = Settings::from_args(&parse(&["--fps", "0", "--colormode", "0"])).unwrap();
        assert_eq!(s.host.fps, None);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = Settings::from_args(&parse(&["--fps", "500"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange {
                flag: "--fps",
                value: 500.0,
                min: 1.0,
                max: 240.0
            }
        );
        assert!(Settings::from_args(&parse(&["--gap-ratio", "1.5"])).is_err());
        assert!(Settings::from_args(&parse(&["--bold", "3"])).is_err());
    }

    #[test]
    fn speed_range_must_be_ordered() {
        let err = Settings::from_args(&parse(&["--speed", "4,2"])).unwrap_err();
        assert!(matches!(err, ConfigError::SpeedRange { .. }));
        let s = Settings::from_args(&parse(&["--speed", "2, 5", "--colormode", "0"])).unwrap();
        assert_eq!((s.rain.speed_min, s.rain.speed_max), (2.0, 5.0));
    }

    #[test]
    fn unknown_theme_and_colormode_are_errors() {
        assert_eq!(
            Settings::from_args(&parse(&["--color", "mauve"])).unwrap_err(),
            ConfigError::ColorScheme("mauve".to_string())
        );
        assert_eq!(color_mode_from(Some(7)), Err(ConfigError::ColorMode(7)));
    }

    #[test]
    fn duration_and_flicker_are_converted() {
        let s = Settings::from_args(&parse(&[
            "--duration",
            "2.5",
            "--flickerpct",
            "25",
            "--colormode",
            "16",
        ]))
        .unwrap();
        assert_eq!(s.host.duration, Some(Duration::from_millis(2500)));
        assert_eq!(s.rain.flicker_chance, 0.25);
        assert_eq!(s.host.color_mode, ColorMode::Color16);
    }
}
