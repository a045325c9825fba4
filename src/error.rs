// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RainError {
    #[error("surface does not provide a 2D drawing context")]
    SurfaceUnsupported,
    #[error("no terminal attached to stdout; nothing to rain on")]
    HostHandleMissing,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to apply {flag} {value} (must be a finite number)")]
    NotFinite { flag: &'static str, value: f64 },
    #[error("failed to apply {flag} {value} (min {min} max {max})")]
    OutOfRange {
        flag: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("failed to apply --speed {low},{high} (low must be below high)")]
    SpeedRange { low: f32, high: f32 },
    #[error("invalid --colormode: {0} (allowed: 0,16,8,256,24,32)")]
    ColorMode(u16),
    #[error("invalid color: {0} (see --list-colors)")]
    ColorScheme(String),
    #[error("unsupported charset: {0} (see --list-charsets)")]
    Charset(String),
}

pub type Result<T, E = RainError> = std::result::Result<T, E>;
