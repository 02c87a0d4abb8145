// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RainError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to apply {flag} {value} (min {min} max {max})")]
    OutOfRange {
        flag: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("failed to apply {flag} {value} (must be a finite number)")]
    NotFinite { flag: &'static str, value: String },

    #[error("invalid --colormode: {0} (allowed: 0,16,8,256,24,32)")]
    ColorMode(u16),
}

pub type Result<T> = std::result::Result<T, RainError>;
