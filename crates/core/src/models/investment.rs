use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Category of an investment holding.
///
/// Carried on the wire as a short lowercase string (see `as_wire_str`).
/// Unknown wire text is a decode error, never coerced to `Other` —
/// `Other` is only the default for an *absent* field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentType {
    Stock,
    Bond,
    Fund,
    Crypto,
    RealEstate,
    #[default]
    Other,
}

impl InvestmentType {
    /// The exact string this variant serializes to in the export payload.
    #[must_use]
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            InvestmentType::Stock => "stock",
            InvestmentType::Bond => "bond",
            InvestmentType::Fund => "fund",
            InvestmentType::Crypto => "crypto",
            InvestmentType::RealEstate => "real_estate",
            InvestmentType::Other => "other",
        }
    }

    /// Parse wire text back into a variant. Returns `None` for unknown text
    /// so the decoder can report it instead of masking corruption.
    #[must_use]
    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "stock" => Some(InvestmentType::Stock),
            "bond" => Some(InvestmentType::Bond),
            "fund" => Some(InvestmentType::Fund),
            "crypto" => Some(InvestmentType::Crypto),
            "real_estate" => Some(InvestmentType::RealEstate),
            "other" => Some(InvestmentType::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestmentType::Stock => write!(f, "Stock"),
            InvestmentType::Bond => write!(f, "Bond"),
            InvestmentType::Fund => write!(f, "Fund"),
            InvestmentType::Crypto => write!(f, "Crypto"),
            InvestmentType::RealEstate => write!(f, "Real Estate"),
            InvestmentType::Other => write!(f, "Other"),
        }
    }
}

/// A brokerage-like entity holding investments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPlatform {
    /// Row id assigned by the device database
    pub id: i64,

    /// Display name (e.g., "Vanguard")
    pub name: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl InvestmentPlatform {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: true,
        }
    }
}

/// A single holding recorded under a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    /// Row id assigned by the device database
    pub id: i64,

    /// Id of the owning platform
    pub platform_id: i64,

    /// Display name (e.g., "S&P 500 ETF")
    pub name: String,

    /// Total amount invested
    #[serde(default)]
    pub amount: f64,

    /// Number of shares/units held
    #[serde(default)]
    pub shares: f64,

    /// Purchase price per share/unit
    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub investment_type: InvestmentType,

    /// Free-text notes (empty when none)
    #[serde(default)]
    pub notes: String,

    /// Purchase date, when known
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Investment {
    pub fn new(id: i64, platform_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            platform_id,
            name: name.into(),
            amount: 0.0,
            shares: 0.0,
            price: 0.0,
            investment_type: InvestmentType::Other,
            notes: String::new(),
            date: None,
            is_active: true,
        }
    }
}
