use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

/// Trait abstraction for the device's encrypted key-value storage.
///
/// The unlock machine and the credential store only see this surface, so
/// the platform binding (Keychain, Keystore, or the file-backed [`Vault`])
/// can be swapped without touching either of them.
///
/// [`Vault`]: super::vault::Vault
pub trait SecureStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn put_string(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
    fn get_i64(&self, key: &str) -> Result<Option<i64>, CoreError>;
    fn put_i64(&mut self, key: &str, value: i64) -> Result<(), CoreError>;
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

/// A value held in a secure store. Strings and integers are kept apart so
/// a `get_i64` on a string key fails loudly instead of parsing garbage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreValue {
    Text(String),
    Int(i64),
}

/// Typed lookup shared by every map-backed store in this crate.
pub(crate) fn string_entry(
    entries: &HashMap<String, StoreValue>,
    key: &str,
) -> Result<Option<String>, CoreError> {
    match entries.get(key) {
        None => Ok(None),
        Some(StoreValue::Text(s)) => Ok(Some(s.clone())),
        Some(StoreValue::Int(_)) => Err(CoreError::Deserialization(format!(
            "key '{key}' holds an integer, not a string"
        ))),
    }
}

pub(crate) fn int_entry(
    entries: &HashMap<String, StoreValue>,
    key: &str,
) -> Result<Option<i64>, CoreError> {
    match entries.get(key) {
        None => Ok(None),
        Some(StoreValue::Int(v)) => Ok(Some(*v)),
        Some(StoreValue::Text(_)) => Err(CoreError::Deserialization(format!(
            "key '{key}' holds a string, not an integer"
        ))),
    }
}

/// In-memory `SecureStore` — not encrypted, intended for tests and for
/// platforms that bring their own secure storage behind this trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StoreValue>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SecureStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, CoreError> {
        string_entry(&self.entries, key)
    }

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries
            .insert(key.to_string(), StoreValue::Text(value.to_string()));
        Ok(())
    }

    fn get_i64(&self, key: &str) -> Result<Option<i64>, CoreError> {
        int_entry(&self.entries, key)
    }

    fn put_i64(&mut self, key: &str, value: i64) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), StoreValue::Int(value));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
