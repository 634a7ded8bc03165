use async_trait::async_trait;

/// What the device reports about its biometric hardware before we try
/// to prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricCapability {
    /// Hardware present and at least one biometric enrolled
    Available,
    /// Device has no biometric hardware at all
    NoHardware,
    /// Hardware exists but is currently unavailable
    HardwareUnavailable,
    /// Hardware exists but the user never enrolled a biometric
    NoneEnrolled,
}

/// Result of one biometric prompt.
///
/// `Failed` (finger not recognized) and `Error` (sensor/system problem)
/// are both recoverable: they surface a message and leave the unlock
/// state untouched. Biometric failures never feed the PIN lockout counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometricOutcome {
    Success,
    Failed,
    Error { code: i32, message: String },
}

/// Trait abstraction for the platform biometric prompt
/// (fingerprint / face unlock).
///
/// The unlock machine only sees this seam, so each platform binding —
/// and the scripted fakes in tests — plug in without touching the
/// lockout logic.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BiometricAuthenticator: Send + Sync {
    /// Whether a prompt is worth showing at all.
    fn capability(&self) -> BiometricCapability;

    /// Show the platform prompt and wait for the user.
    async fn authenticate(&self) -> BiometricOutcome;
}
