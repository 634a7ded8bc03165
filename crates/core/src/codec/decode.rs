use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::DecodeError;
use crate::models::bank::{Account, Bank};
use crate::models::calendar::CalendarEvent;
use crate::models::credential::Credential;
use crate::models::export::ExportData;
use crate::models::investment::{Investment, InvestmentPlatform, InvestmentType};

/// Decode an abbreviated payload back into a typed snapshot.
///
/// Mirrors the encoder exactly: every key the encoder may omit gets its
/// documented default substituted, every key the encoder always writes is
/// required here. Unknown keys are ignored at every level, so a payload
/// from a newer app version still imports the fields we understand.
pub fn decode(json: &str) -> Result<ExportData, DecodeError> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
    let root = as_object(&root, "payload root")?;

    let mut data = ExportData::default();

    if let Some(banks) = root.get("b") {
        for (idx, value) in as_array(banks, "b")?.iter().enumerate() {
            data.banks.push(decode_bank(value, &format!("b[{idx}]"))?);
        }
    }
    if let Some(platforms) = root.get("p") {
        for (idx, value) in as_array(platforms, "p")?.iter().enumerate() {
            data.platforms
                .push(decode_platform(value, &format!("p[{idx}]"))?);
        }
    }
    if let Some(investments) = root.get("i") {
        for (idx, value) in as_array(investments, "i")?.iter().enumerate() {
            data.investments
                .push(decode_investment(value, &format!("i[{idx}]"))?);
        }
    }
    if let Some(events) = root.get("e") {
        for (idx, value) in as_array(events, "e")?.iter().enumerate() {
            data.events.push(decode_event(value, &format!("e[{idx}]"))?);
        }
    }
    if let Some(credentials) = root.get("r") {
        for (idx, value) in as_array(credentials, "r")?.iter().enumerate() {
            data.credentials
                .push(decode_credential(value, &format!("r[{idx}]"))?);
        }
    }

    Ok(data)
}

// ── Per-entity decoders ──────────────────────────────────────────────

fn decode_bank(value: &Value, path: &str) -> Result<Bank, DecodeError> {
    let obj = as_object(value, path)?;

    let mut accounts = Vec::new();
    if let Some(raw) = obj.get("a") {
        for (idx, account) in as_array(raw, path)?.iter().enumerate() {
            accounts.push(decode_account(account, &format!("{path}.a[{idx}]"))?);
        }
    }

    Ok(Bank {
        id: req_i64(obj, "i", path)?,
        name: req_string(obj, "n", path)?,
        is_active: opt_bool(obj, "v", path)?.unwrap_or(true),
        accounts,
    })
}

fn decode_account(value: &Value, path: &str) -> Result<Account, DecodeError> {
    let obj = as_object(value, path)?;
    Ok(Account {
        id: req_i64(obj, "i", path)?,
        bank_id: req_i64(obj, "b", path)?,
        holder: req_string(obj, "h", path)?,
        name: req_string(obj, "n", path)?,
        balance: req_f64(obj, "l", path)?,
        currency: opt_string(obj, "c", path)?.unwrap_or_else(|| "USD".to_string()),
        account_type: opt_string(obj, "t", path)?,
        notes: opt_string(obj, "o", path)?,
        is_active: opt_bool(obj, "v", path)?.unwrap_or(true),
    })
}

fn decode_platform(value: &Value, path: &str) -> Result<InvestmentPlatform, DecodeError> {
    let obj = as_object(value, path)?;
    Ok(InvestmentPlatform {
        id: req_i64(obj, "i", path)?,
        name: req_string(obj, "n", path)?,
        is_active: opt_bool(obj, "v", path)?.unwrap_or(true),
    })
}

fn decode_investment(value: &Value, path: &str) -> Result<Investment, DecodeError> {
    let obj = as_object(value, path)?;

    let investment_type = match opt_string(obj, "t", path)? {
        Some(text) => {
            InvestmentType::from_wire_str(&text).ok_or_else(|| DecodeError::UnknownEnumValue {
                field: "t",
                value: text,
                path: path.to_string(),
            })?
        }
        None => InvestmentType::Other,
    };

    Ok(Investment {
        id: req_i64(obj, "i", path)?,
        name: req_string(obj, "n", path)?,
        platform_id: req_i64(obj, "p", path)?,
        amount: opt_f64(obj, "a", path)?.unwrap_or(0.0),
        shares: opt_f64(obj, "s", path)?.unwrap_or(0.0),
        price: opt_f64(obj, "r", path)?.unwrap_or(0.0),
        date: opt_date(obj, "d", path)?,
        investment_type,
        notes: opt_string(obj, "o", path)?.unwrap_or_default(),
        is_active: opt_bool(obj, "v", path)?.unwrap_or(true),
    })
}

fn decode_event(value: &Value, path: &str) -> Result<CalendarEvent, DecodeError> {
    let obj = as_object(value, path)?;
    Ok(CalendarEvent {
        id: opt_i64(obj, "i", path)?.unwrap_or(0),
        name: req_string(obj, "n", path)?,
        description: opt_string(obj, "d", path)?.unwrap_or_default(),
        date: req_date(obj, "f", path)?,
    })
}

fn decode_credential(value: &Value, path: &str) -> Result<Credential, DecodeError> {
    let obj = as_object(value, path)?;
    Ok(Credential {
        platform_id: req_i64(obj, "p", path)?,
        holder: req_string(obj, "h", path)?,
        account_id: opt_i64(obj, "a", path)?,
        username: opt_string(obj, "u", path)?,
        password: opt_string(obj, "w", path)?,
    })
}

// ── Field access helpers ─────────────────────────────────────────────
//
// `req_*` errors when the key is absent; `opt_*` returns None. Both error
// when the key is present with the wrong JSON type — a string where a
// number belongs is corruption, not a missing field.

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::MalformedInput(format!("expected an object at {path}")))
}

fn as_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, DecodeError> {
    value
        .as_array()
        .ok_or_else(|| DecodeError::MalformedInput(format!("expected an array at {path}")))
}

fn req_i64(obj: &Map<String, Value>, field: &'static str, path: &str) -> Result<i64, DecodeError> {
    opt_i64(obj, field, path)?.ok_or_else(|| DecodeError::MissingField {
        field,
        path: path.to_string(),
    })
}

fn opt_i64(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<i64>, DecodeError> {
    match obj.get(field) {
        None => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            DecodeError::MalformedInput(format!("expected an integer for '{field}' in {path}"))
        }),
    }
}

fn req_f64(obj: &Map<String, Value>, field: &'static str, path: &str) -> Result<f64, DecodeError> {
    opt_f64(obj, field, path)?.ok_or_else(|| DecodeError::MissingField {
        field,
        path: path.to_string(),
    })
}

fn opt_f64(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<f64>, DecodeError> {
    match obj.get(field) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            DecodeError::MalformedInput(format!("expected a number for '{field}' in {path}"))
        }),
    }
}

fn req_string(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<String, DecodeError> {
    opt_string(obj, field, path)?.ok_or_else(|| DecodeError::MissingField {
        field,
        path: path.to_string(),
    })
}

fn opt_string(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<String>, DecodeError> {
    match obj.get(field) {
        None => Ok(None),
        Some(value) => value.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
            DecodeError::MalformedInput(format!("expected a string for '{field}' in {path}"))
        }),
    }
}

fn opt_bool(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<bool>, DecodeError> {
    match obj.get(field) {
        None => Ok(None),
        Some(value) => value.as_bool().map(Some).ok_or_else(|| {
            DecodeError::MalformedInput(format!("expected a boolean for '{field}' in {path}"))
        }),
    }
}

fn req_date(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<NaiveDate, DecodeError> {
    opt_date(obj, field, path)?.ok_or_else(|| DecodeError::MissingField {
        field,
        path: path.to_string(),
    })
}

fn opt_date(
    obj: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<NaiveDate>, DecodeError> {
    match opt_string(obj, field, path)? {
        None => Ok(None),
        Some(text) => text.parse::<NaiveDate>().map(Some).map_err(|_| {
            DecodeError::MalformedInput(format!(
                "expected an ISO date (yyyy-MM-dd) for '{field}' in {path}, got '{text}'"
            ))
        }),
    }
}
