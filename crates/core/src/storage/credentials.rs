use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::credential::Credential;
use crate::storage::secure_store::SecureStore;

/// Key under which the credential map is kept in the `secure_credentials`
/// namespace.
const CREDENTIALS_KEY: &str = "credentials";

/// Stored credentials, layered over a [`SecureStore`].
///
/// The whole collection is one JSON map under a single key, keyed by
/// `Credential::storage_key()` — `(platform_id, account_id-or-none, holder)`.
/// Saving with an occupied key overwrites; that is the upsert the UI's
/// "save" button relies on.
#[derive(Debug)]
pub struct CredentialStore<S: SecureStore> {
    store: S,
}

impl<S: SecureStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert or overwrite the credential at its composite key.
    pub fn save(&mut self, credential: Credential) -> Result<(), CoreError> {
        let mut map = self.load_map()?;
        map.insert(credential.storage_key(), credential);
        self.store_map(&map)
    }

    /// Look up a credential by its composite key parts.
    pub fn get(
        &self,
        platform_id: i64,
        account_id: Option<i64>,
        holder: &str,
    ) -> Result<Option<Credential>, CoreError> {
        let key = Credential::new(platform_id, account_id, holder).storage_key();
        Ok(self.load_map()?.remove(&key))
    }

    /// Delete a credential. Returns whether one existed.
    pub fn delete(
        &mut self,
        platform_id: i64,
        account_id: Option<i64>,
        holder: &str,
    ) -> Result<bool, CoreError> {
        let key = Credential::new(platform_id, account_id, holder).storage_key();
        let mut map = self.load_map()?;
        let existed = map.remove(&key).is_some();
        if existed {
            self.store_map(&map)?;
        }
        Ok(existed)
    }

    /// All stored credentials, in stable key order.
    pub fn list(&self) -> Result<Vec<Credential>, CoreError> {
        Ok(self.load_map()?.into_values().collect())
    }

    /// Number of stored credentials.
    pub fn count(&self) -> Result<usize, CoreError> {
        Ok(self.load_map()?.len())
    }

    /// Import a batch, overwriting on key collisions.
    pub fn import(&mut self, credentials: Vec<Credential>) -> Result<(), CoreError> {
        let mut map = self.load_map()?;
        for credential in credentials {
            map.insert(credential.storage_key(), credential);
        }
        self.store_map(&map)
    }

    fn load_map(&self) -> Result<BTreeMap<String, Credential>, CoreError> {
        match self.store.get_string(CREDENTIALS_KEY)? {
            None => Ok(BTreeMap::new()),
            Some(json) => Ok(serde_json::from_str(&json)?),
        }
    }

    fn store_map(&mut self, map: &BTreeMap<String, Credential>) -> Result<(), CoreError> {
        let json = serde_json::to_string(map)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize credentials: {e}")))?;
        self.store.put_string(CREDENTIALS_KEY, &json)
    }
}
