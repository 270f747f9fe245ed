//! Error types for the ecwid-images-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid access token (HTTP 403). Check that the token belongs to the store")]
    InvalidToken,

    #[error(
        "Can't retrieve public token for store {0}. Check that the store ID is correct and the \
         store has an instant site, or provide the token manually with --token"
    )]
    TokenUnavailable(u64),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("{0} catalog producer(s) aborted before scheduling every image")]
    ProducersFailed(usize),

    #[error("Interrupted")]
    Cancelled,

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}

impl Error {
    /// Map the error to the process exit code reported by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::Api(_)
            | Error::InvalidToken
            | Error::TokenUnavailable(_)
            | Error::Http(_) => exit_codes::API_ERROR,
            Error::Download(_) | Error::ProducersFailed(_) => exit_codes::DOWNLOAD_ERROR,
            Error::Cancelled => exit_codes::ABORT,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}
