/// Result alias that carries the custom [`ExhibitError`] type.
pub type Result<T> = std::result::Result<T, ExhibitError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ExhibitError {
    /// A single dataset could not be fetched or parsed. Non-fatal: the
    /// aggregator turns it into an empty slice plus a degraded-mode notice.
    #[error("failed to load {resource}: {reason}")]
    ResourceLoad { resource: String, reason: String },
    /// A view's mount point (map, chart, AR scene) is not available.
    #[error("render target `{0}` is missing")]
    RenderTargetMissing(String),
    /// Audio or animation could not start.
    #[error("playback failed: {0}")]
    Playback(String),
    /// Failure in the load orchestration itself rather than one fetch.
    #[error("initialisation failed: {0}")]
    Orchestration(String),
    #[error("{0}")]
    Message(String),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ExhibitError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn playback<T: Into<String>>(reason: T) -> Self {
        Self::Playback(reason.into())
    }

    pub fn render_target<T: Into<String>>(view: T) -> Self {
        Self::RenderTargetMissing(view.into())
    }
}

impl From<&str> for ExhibitError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ExhibitError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
