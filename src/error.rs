use thiserror::Error;

/// Failures surfaced by configuration loading and the browser shell.
///
/// The simulation itself never fails: mode-level problems (missing emulator
/// payload, blocked autoplay) are rendered or logged instead of propagated.
#[derive(Debug, Error)]
pub enum HeroError {
    #[error("invalid config json: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("element #{0} not found")]
    MissingElement(String),

    #[error("{0} context unavailable")]
    Context(&'static str),

    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, HeroError>;
