use serde::{Deserialize, Serialize};

use super::bank::Bank;
use super::calendar::CalendarEvent;
use super::credential::Credential;
use super::investment::{Investment, InvestmentPlatform};

/// Point-in-time snapshot of everything the user tracks, built at export
/// time and consumed at import time. Never persisted as-is — the codec
/// turns it into a compact payload small enough for a QR code.
///
/// Banks embed their accounts; investments stay in a flat list keyed by
/// `platform_id` (the wire format carries them as separate top-level arrays).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub banks: Vec<Bank>,

    #[serde(default)]
    pub platforms: Vec<InvestmentPlatform>,

    #[serde(default)]
    pub investments: Vec<Investment>,

    #[serde(default)]
    pub events: Vec<CalendarEvent>,

    #[serde(default)]
    pub credentials: Vec<Credential>,
}

impl ExportData {
    /// True when there is nothing to transfer; encodes to `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
            && self.platforms.is_empty()
            && self.investments.is_empty()
            && self.events.is_empty()
            && self.credentials.is_empty()
    }
}
