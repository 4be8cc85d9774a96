use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading configuration from a document or an
/// argument list.
///
/// The per-key variants ([`UnknownSetting`](ConfigError::UnknownSetting),
/// [`InvalidValue`](ConfigError::InvalidValue)) are structured: callers can
/// classify by matching the variant rather than inspecting the rendered
/// message. The `Display` strings are the user-facing form.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a valid TOML file: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("not valid TOML: {source}")]
    ParseString { source: toml::de::Error },

    /// A document or argument list referenced a dotted path that was never
    /// declared.
    #[error("{name} is not a valid config setting")]
    UnknownSetting { name: String },

    /// A value could not be parsed as the declared setting's type.
    #[error("The value for {name} is invalid")]
    InvalidValue { name: String },

    /// Argument parsing hit `-h`/`--help`. Carries the rendered usage text so
    /// callers can print it and exit zero instead of treating this as failure.
    #[error("help requested")]
    HelpRequested { usage: String },

    /// Any other argument-parsing failure, passed through unmodified.
    #[error("{0}")]
    InvalidArguments(String),
}

impl ConfigError {
    /// True for the help outcome, which callers usually want to handle
    /// separately from real errors.
    pub fn is_help(&self) -> bool {
        matches!(self, ConfigError::HelpRequested { .. })
    }
}
