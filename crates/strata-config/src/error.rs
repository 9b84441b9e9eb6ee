//! Errors raised while loading or persisting `config.ron`.

/// Why the generator config could not be loaded, saved, or accepted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `config.ron` exists but could not be read.
    #[error("cannot read generator config: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config directory or `config.ron` could not be written.
    #[error("cannot write generator config: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file exists but is not valid RON for [`Config`](crate::Config).
    #[error("generator config is not valid RON: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// The in-memory config could not be rendered as RON.
    #[error("cannot serialize generator config: {0}")]
    SerializeError(#[source] ron::Error),

    /// The settings parsed but describe a world the generator cannot build,
    /// such as an inverted build-height range.
    #[error("invalid generator config: {0}")]
    Invalid(String),
}
