use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Malformed `hana` service binding: {0}")]
    BindingError(String),

    #[error("Failed to read service binding file {path}: {source}")]
    BindingFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "No `hana` service binding found. Set VCAP_SERVICES, SERVICE_BINDING_ROOT, or a [hana] section."
    )]
    MissingBinding,

    #[error("Failed to install the tracing subscriber: {0}")]
    LoggingError(#[from] tracing::subscriber::SetGlobalDefaultError),
}
