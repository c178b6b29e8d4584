// src/config/profile.rs

//! Command profiles: how to launch a program for a given language.
//!
//! This is a pure lookup table. Each [`Language`] maps to a fixed
//! [`CommandProfile`] (executable, argument prefix, watched extension).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::GorunError;

/// Supported language selectors (`GORUN_LANG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Language {
    #[default]
    Go,
    Python,
    Python3,
}

impl Language {
    pub fn profile(self) -> CommandProfile {
        match self {
            Language::Go => CommandProfile {
                executable: "go",
                fixed_args: &["run"],
                extension: "go",
            },
            Language::Python => CommandProfile {
                executable: "python",
                fixed_args: &[],
                extension: "py",
            },
            Language::Python3 => CommandProfile {
                executable: "python3",
                fixed_args: &[],
                extension: "py",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "python",
            Language::Python3 => "python3",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = GorunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "go" => Ok(Language::Go),
            "python" => Ok(Language::Python),
            "python3" => Ok(Language::Python3),
            other => Err(GorunError::UnknownLanguage(other.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = GorunError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Launch recipe for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandProfile {
    pub executable: &'static str,
    pub fixed_args: &'static [&'static str],
    /// Watched file extension, without the leading dot.
    pub extension: &'static str,
}

impl CommandProfile {
    /// Build the full command line: fixed prefix followed by the
    /// pass-through arguments, verbatim and in order.
    pub fn command_line(&self, passthrough: &[String]) -> LaunchSpec {
        let args = self
            .fixed_args
            .iter()
            .map(|s| s.to_string())
            .chain(passthrough.iter().cloned())
            .collect();

        LaunchSpec {
            program: self.executable.to_string(),
            args,
        }
    }
}

/// Concrete program + argument list handed to the process supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
