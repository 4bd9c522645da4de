/// Result alias that carries the custom [`GrainVizError`] type.
pub type Result<T> = std::result::Result<T, GrainVizError>;

/// Common error type for the core crate.
///
/// Ingest and redraw never fail; only configuration handling and frame
/// export surface errors.
#[derive(Debug, thiserror::Error)]
pub enum GrainVizError {
    /// Free-form message, used for rejected command line input.
    #[error("{0}")]
    Message(String),
    /// A configuration value that cannot drive the visualiser.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration or draw command (de)serialisation failure.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl GrainVizError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn invalid_config<T: Into<String>>(reason: T) -> Self {
        Self::InvalidConfig(reason.into())
    }
}
