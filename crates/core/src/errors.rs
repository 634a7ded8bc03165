use thiserror::Error;

/// Errors produced while decoding the abbreviated export payload.
///
/// Kept as its own taxonomy (separate from `CoreError`) because the caller
/// needs to distinguish "this QR code is garbage" from "a field is gone":
/// a malformed payload means re-scan, a missing required field means the
/// counterpart device emitted something we cannot accept.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not valid JSON, or a field carries the wrong JSON type.
    #[error("Malformed export payload: {0}")]
    MalformedInput(String),

    /// An object is present but lacks a field it must carry.
    /// `path` locates the object, e.g. `b[2].a[0]` for the first account
    /// of the third bank.
    #[error("Missing required field '{field}' in {path}")]
    MissingField { field: &'static str, path: String },

    /// A field carried enum text matching no known variant.
    /// Never silently defaulted — unknown text usually means corruption.
    #[error("Unknown value '{value}' for field '{field}' in {path}")]
    UnknownEnumValue {
        field: &'static str,
        value: String,
        path: String,
    },
}

/// Unified error type for the pocket-ledger-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Export / Import ─────────────────────────────────────────────
    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ── Secure storage ──────────────────────────────────────────────
    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Unsupported vault version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed — wrong passphrase or corrupted vault")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Security ────────────────────────────────────────────────────
    #[error("No PIN has been set up on this device")]
    PinNotSet,

    #[error("Invalid PIN: {0}")]
    InvalidPin(String),

    #[error("PIN and confirmation do not match")]
    PinMismatch,

    #[error("Failed to generate random data: {0}")]
    Randomness(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("{entity} with id {id} not found")]
    RecordNotFound { entity: &'static str, id: i64 },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}

impl From<getrandom::Error> for CoreError {
    fn from(e: getrandom::Error) -> Self {
        CoreError::Randomness(e.to_string())
    }
}
