use serde_json::{Map, Value};

use crate::models::bank::{Account, Bank};
use crate::models::calendar::CalendarEvent;
use crate::models::credential::Credential;
use crate::models::export::ExportData;
use crate::models::investment::{Investment, InvestmentPlatform, InvestmentType};

/// Encode a snapshot into the minified abbreviated payload.
///
/// Infallible by construction: the input is well-typed in-memory data and
/// `Value`'s `Display` is minified JSON. Floats are expected to be finite;
/// a NaN or infinite amount serializes as JSON `null`, which the importing
/// device rejects where the key is required. Referential consistency (e.g.
/// no dangling `bank_id`) is likewise the caller's responsibility — the
/// encoder carries what it is given.
#[must_use]
pub fn encode(data: &ExportData) -> String {
    let mut root = Map::new();

    if !data.banks.is_empty() {
        root.insert(
            "b".to_string(),
            Value::Array(data.banks.iter().map(bank_value).collect()),
        );
    }
    if !data.platforms.is_empty() {
        root.insert(
            "p".to_string(),
            Value::Array(data.platforms.iter().map(platform_value).collect()),
        );
    }
    if !data.investments.is_empty() {
        root.insert(
            "i".to_string(),
            Value::Array(data.investments.iter().map(investment_value).collect()),
        );
    }
    if !data.events.is_empty() {
        root.insert(
            "e".to_string(),
            Value::Array(data.events.iter().map(event_value).collect()),
        );
    }
    if !data.credentials.is_empty() {
        root.insert(
            "r".to_string(),
            Value::Array(data.credentials.iter().map(credential_value).collect()),
        );
    }

    Value::Object(root).to_string()
}

// ── Per-entity encoders ──────────────────────────────────────────────
//
// Each one owns its key letters; the same letter may mean something else
// in another entity, and that is part of the wire contract.

/// Bank: i=id, n=name, v=is_active (omit if true), a=accounts (omit if empty)
fn bank_value(bank: &Bank) -> Value {
    let mut obj = Map::new();
    obj.insert("i".to_string(), Value::from(bank.id));
    obj.insert("n".to_string(), Value::from(bank.name.clone()));
    if !bank.is_active {
        obj.insert("v".to_string(), Value::from(false));
    }
    if !bank.accounts.is_empty() {
        obj.insert(
            "a".to_string(),
            Value::Array(bank.accounts.iter().map(account_value).collect()),
        );
    }
    Value::Object(obj)
}

/// Account: i=id, b=bank_id, h=holder, n=name, l=balance,
/// c=currency (omit if "USD"), t=type (omit if none), o=notes (omit if none),
/// v=is_active (omit if true)
fn account_value(account: &Account) -> Value {
    let mut obj = Map::new();
    obj.insert("i".to_string(), Value::from(account.id));
    obj.insert("b".to_string(), Value::from(account.bank_id));
    obj.insert("h".to_string(), Value::from(account.holder.clone()));
    obj.insert("n".to_string(), Value::from(account.name.clone()));
    obj.insert("l".to_string(), Value::from(account.balance));
    if account.currency != "USD" {
        obj.insert("c".to_string(), Value::from(account.currency.clone()));
    }
    if let Some(account_type) = &account.account_type {
        obj.insert("t".to_string(), Value::from(account_type.clone()));
    }
    if let Some(notes) = &account.notes {
        obj.insert("o".to_string(), Value::from(notes.clone()));
    }
    if !account.is_active {
        obj.insert("v".to_string(), Value::from(false));
    }
    Value::Object(obj)
}

/// Platform: i=id, n=name, v=is_active (omit if true)
fn platform_value(platform: &InvestmentPlatform) -> Value {
    let mut obj = Map::new();
    obj.insert("i".to_string(), Value::from(platform.id));
    obj.insert("n".to_string(), Value::from(platform.name.clone()));
    if !platform.is_active {
        obj.insert("v".to_string(), Value::from(false));
    }
    Value::Object(obj)
}

/// Investment: i=id, n=name, p=platform_id, a=amount (omit if 0),
/// s=shares (omit if 0), r=price (omit if 0), d=date (omit if none),
/// t=type (omit if Other), o=notes (omit if empty), v=is_active (omit if true)
fn investment_value(investment: &Investment) -> Value {
    let mut obj = Map::new();
    obj.insert("i".to_string(), Value::from(investment.id));
    obj.insert("n".to_string(), Value::from(investment.name.clone()));
    obj.insert("p".to_string(), Value::from(investment.platform_id));
    if investment.amount != 0.0 {
        obj.insert("a".to_string(), Value::from(investment.amount));
    }
    if investment.shares != 0.0 {
        obj.insert("s".to_string(), Value::from(investment.shares));
    }
    if investment.price != 0.0 {
        obj.insert("r".to_string(), Value::from(investment.price));
    }
    if let Some(date) = investment.date {
        obj.insert("d".to_string(), Value::from(date.to_string()));
    }
    if investment.investment_type != InvestmentType::Other {
        obj.insert(
            "t".to_string(),
            Value::from(investment.investment_type.as_wire_str()),
        );
    }
    if !investment.notes.is_empty() {
        obj.insert("o".to_string(), Value::from(investment.notes.clone()));
    }
    if !investment.is_active {
        obj.insert("v".to_string(), Value::from(false));
    }
    Value::Object(obj)
}

/// CalendarEvent: i=id (omit if 0), n=name, d=description (omit if empty),
/// f=date (always present)
fn event_value(event: &CalendarEvent) -> Value {
    let mut obj = Map::new();
    if event.id != 0 {
        obj.insert("i".to_string(), Value::from(event.id));
    }
    obj.insert("n".to_string(), Value::from(event.name.clone()));
    if !event.description.is_empty() {
        obj.insert("d".to_string(), Value::from(event.description.clone()));
    }
    obj.insert("f".to_string(), Value::from(event.date.to_string()));
    Value::Object(obj)
}

/// Credential: p=platform_id, h=holder, a=account_id (omit if none),
/// u=username (omit if none or empty), w=password (omit if none or empty)
fn credential_value(credential: &Credential) -> Value {
    let mut obj = Map::new();
    obj.insert("p".to_string(), Value::from(credential.platform_id));
    obj.insert("h".to_string(), Value::from(credential.holder.clone()));
    if let Some(account_id) = credential.account_id {
        obj.insert("a".to_string(), Value::from(account_id));
    }
    if let Some(username) = credential.username.as_deref().filter(|u| !u.is_empty()) {
        obj.insert("u".to_string(), Value::from(username));
    }
    if let Some(password) = credential.password.as_deref().filter(|w| !w.is_empty()) {
        obj.insert("w".to_string(), Value::from(password));
    }
    Value::Object(obj)
}
