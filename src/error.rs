// Error types
// Every fallible helper in the crate reports through this enum

/// Errors returned by the helpers in this crate.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error("Provide a valid number: {0}")]
    InvalidArgument(String),

    #[error("The number {0} is not prime")]
    NotPrime(u64),

    #[error("The number {value} does not have a modular inverse modulo {modulus}")]
    NoInverseExists { value: u64, modulus: u64 },

    #[error("No public key options found for totient {totient}")]
    NoCandidatesFound { totient: u64 },

    #[error("Key should be a positive whole number different than 0")]
    InvalidKey,

    #[error("Encrypted message should be an array of numbers")]
    InvalidCiphertext,

    #[error("Invalid log level \"{0}\": only error, warn, info, debug, trace are valid.")]
    InvalidLogLevel(String),

    #[error("Invalid value '{value}' for configuration key {key}")]
    InvalidConfig { key: String, value: String },

    #[error("Provide a valid string")]
    NotAString,

    #[error("Provide a valid email address")]
    InvalidEmail,

    #[error("Invalid color format '{0}'. Please provide a valid RGB or RGBA color.")]
    InvalidRgbColor(String),

    #[error("Invalid color format '{0}'. Please provide a valid HEX color.")]
    InvalidHexColor(String),

    #[error("Invalid color format '{0}'. Please provide a valid HEX, RGB, or RGBA color.")]
    InvalidColor(String),

    #[error("Image loader dropped its completion callback without firing it")]
    PreloadAborted,

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
