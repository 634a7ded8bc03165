use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A bank the user holds accounts at.
///
/// Banks own their accounts: the export bundle embeds them, and deleting
/// a bank cascades to every account under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    /// Row id assigned by the device database
    pub id: i64,

    /// Display name (e.g., "Banco Nacional")
    pub name: String,

    /// Inactive banks are kept for history but hidden from pickers
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Accounts held at this bank
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl Bank {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: true,
            accounts: Vec::new(),
        }
    }
}

/// A single account at a bank (checking, savings, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Row id assigned by the device database
    pub id: i64,

    /// Id of the owning bank
    pub bank_id: i64,

    /// Account holder names, comma-joined for joint accounts
    pub holder: String,

    /// Account number or label shown to the user
    pub name: String,

    /// Current balance in `currency`
    pub balance: f64,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Free-form account kind (e.g., "checking", "savings")
    #[serde(default)]
    pub account_type: Option<String>,

    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Account {
    pub fn new(
        id: i64,
        bank_id: i64,
        holder: impl Into<String>,
        name: impl Into<String>,
        balance: f64,
    ) -> Self {
        Self {
            id,
            bank_id,
            holder: holder.into(),
            name: name.into(),
            balance,
            currency: default_currency(),
            account_type: None,
            notes: None,
            is_active: true,
        }
    }
}
