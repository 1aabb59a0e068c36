use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while building an [`crate::EntityCatalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate charger id: '{0}'")]
    DuplicateId(String),
}
