use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinGateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error writing the PIN file: {0}")]
    CredentialWrite(#[source] std::io::Error),

    #[error("Error writing the PIN file: wrote {written} of {expected} bytes")]
    StorageWrite { expected: usize, written: usize },

    #[error("PIN hash error: {0}")]
    Kdf(String),

    #[error("Invalid device key: {reason}")]
    DeviceKey { reason: String },

    #[error("Invalid PIN length level: {0} (expected 1 to 3)")]
    InvalidLengthLevel(u8),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PinGateError>;
