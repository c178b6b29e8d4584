// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GorunError {
    #[error("unsupported language: {0} (expected \"go\", \"python\" or \"python3\")")]
    UnknownLanguage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("signal delivery failed: {0}")]
    SignalError(#[from] nix::errno::Errno),

    #[error("supervisor is shutting down; refusing to start a new process")]
    ShuttingDown,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GorunError>;
