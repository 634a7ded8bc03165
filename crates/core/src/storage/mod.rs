pub mod credentials;
pub mod repository;
pub mod secure_store;
pub mod vault;

/// Namespace for PIN and lockout state (`user_pin`, `lock_count`, `unlock_at`).
pub const PREFS_NAMESPACE: &str = "secure_prefs";

/// Namespace for stored bank/platform credentials.
pub const CREDENTIALS_NAMESPACE: &str = "secure_credentials";
