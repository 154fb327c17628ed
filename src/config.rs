//! Dispatcher configuration.

use std::ffi::OsStr;
use std::path::Path;

/// Overrides the program name shown in usage lines.
pub const PROG_ENV: &str = "SIMPLE_CLI_ARGS_PROG";

/// Disables colored diagnostics when set to any value.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program name for usage lines; falls back to `argv[0]`, then the callable's name.
    pub program_name: Option<String>,
    /// Color the invocation error report.
    pub color: bool,
    pub separator: char,
    pub separator_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program_name: None,
            color: true,
            separator: '=',
            separator_width: 60,
        }
    }
}

impl Config {
    /// Defaults adjusted by `NO_COLOR` and `SIMPLE_CLI_ARGS_PROG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if lookup(NO_COLOR_ENV).is_some() {
            config.color = false;
        }
        config.program_name = lookup(PROG_ENV).filter(|name| !name.is_empty());
        config
    }

    #[must_use]
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn separator_line(&self) -> String {
        self.separator.to_string().repeat(self.separator_width)
    }

    /// Resolve the program name for a live invocation.
    pub fn resolve_program(&self, argv0: Option<&OsStr>, fallback: &str) -> String {
        self.program_name
            .clone()
            .or_else(|| {
                argv0
                    .and_then(|arg| Path::new(arg).file_name())
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| fallback.to_string())
    }
}
