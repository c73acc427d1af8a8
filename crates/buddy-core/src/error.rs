use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuddyError {
    #[error("not initialized: run 'buddy init'")]
    NotInitialized,

    #[error("invalid user '{0}': must be 1-64 lowercase alphanumeric characters, '-' or '_'")]
    InvalidUser(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid timezone '{0}': expected 'local', 'utc' or an offset like '+02:00'")]
    InvalidTimezone(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BuddyError>;
