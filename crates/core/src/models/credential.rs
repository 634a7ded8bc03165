use serde::{Deserialize, Serialize};

/// A stored login for a bank or investment platform.
///
/// `platform_id` is an overloaded namespace: it holds a bank id for bank
/// credentials and a platform id for investment-platform credentials, which
/// is why `account_id` disambiguates (`None` for platform credentials).
///
/// The composite key `(platform_id, account_id-or-none, holder)` identifies
/// at most one credential; saving with the same key overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bank id or investment-platform id, depending on what this login is for
    pub platform_id: i64,

    /// Account this login belongs to; `None` for platform-level credentials
    #[serde(default)]
    pub account_id: Option<i64>,

    /// Which holder this login belongs to (joint accounts have several)
    pub holder: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl Credential {
    pub fn new(platform_id: i64, account_id: Option<i64>, holder: impl Into<String>) -> Self {
        Self {
            platform_id,
            account_id,
            holder: holder.into(),
            username: None,
            password: None,
        }
    }

    /// The storage key for this credential. Two credentials with equal keys
    /// occupy the same slot — the later save wins.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self.account_id {
            Some(account_id) => format!("{}:{}:{}", self.platform_id, account_id, self.holder),
            None => format!("{}:none:{}", self.platform_id, self.holder),
        }
    }
}
