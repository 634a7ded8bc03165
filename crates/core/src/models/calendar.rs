use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated reminder on the user's financial calendar
/// (payment due, CD maturity, statement date, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Row id assigned by the device database (0 before first save)
    #[serde(default)]
    pub id: i64,

    /// Short title shown on the calendar cell
    pub name: String,

    /// Longer description (empty when none)
    #[serde(default)]
    pub description: String,

    /// Day the event falls on — daily granularity, no time component
    pub date: NaiveDate,
}

impl CalendarEvent {
    pub fn new(id: i64, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            date,
        }
    }

    /// Create an event with a description attached.
    pub fn with_description(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            date,
        }
    }
}
