pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Occurs when `kata.toml` fails to load.
    #[error("failed to load kata.toml: {0}")]
    LoadError(String),
    /// Occurs when a configuration value cannot be interpreted.
    #[error("invalid value for \"{key}\": {value:?}")]
    ValueError { key: String, value: String },
    /// Occurs when a location filter is not in `FILE:LINE` form.
    #[error("invalid location filter \"{0}\", expected FILE:LINE")]
    InvalidLocation(String),
    /// Occurs when examples are registered while another example is running.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Raised when the registration API is used from inside a running example.
///
/// This is a setup mistake rather than a test result, so the runner aborts the
/// whole run when it sees one instead of reporting a failed example.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot nest an example inside an example: \"{registered}\" was registered while \"{running}\" was running")]
pub struct ConfigurationError {
    /// Description passed to the offending registration call.
    pub registered: String,
    /// Full description of the example that was running.
    pub running: String,
}
