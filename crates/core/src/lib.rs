pub mod codec;
pub mod errors;
pub mod models;
pub mod security;
pub mod storage;

use chrono::{NaiveDate, Utc};

use errors::CoreError;
use models::{
    bank::{Account, Bank},
    calendar::CalendarEvent,
    credential::Credential,
    export::ExportData,
    investment::{Investment, InvestmentPlatform},
};
use security::{
    biometric::{BiometricAuthenticator, BiometricOutcome},
    pin_setup::{self, CoordinateCard},
    unlock::{PinOutcome, UnlockMachine, UnlockState},
};
use storage::{
    credentials::CredentialStore, repository::MemoryRepository, secure_store::SecureStore,
};

/// Main entry point for the Pocket Ledger core library.
///
/// Owns the record store, the credential store, and the unlock machine,
/// and ties them to the export codec. Generic over the two secure-store
/// namespaces (`P` = `secure_prefs`, `C` = `secure_credentials`) so each
/// platform injects its own encrypted storage — there is no ambient
/// global state.
#[must_use]
pub struct PocketLedger<P: SecureStore, C: SecureStore> {
    repo: MemoryRepository,
    credentials: CredentialStore<C>,
    unlock: UnlockMachine<P>,
}

impl<P: SecureStore, C: SecureStore> std::fmt::Debug for PocketLedger<P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PocketLedger")
            .field("banks", &self.repo.banks().len())
            .field("platforms", &self.repo.platforms().len())
            .field("investments", &self.repo.investments().len())
            .field("events", &self.repo.events().len())
            .field("unlocked", &self.unlock.is_unlocked())
            .finish()
    }
}

impl<P: SecureStore, C: SecureStore> PocketLedger<P, C> {
    /// Create a ledger over the two secure-store namespaces.
    pub fn new(prefs: P, credentials: C) -> Self {
        Self {
            repo: MemoryRepository::new(),
            credentials: CredentialStore::new(credentials),
            unlock: UnlockMachine::new(prefs),
        }
    }

    // ── Lock Screen ─────────────────────────────────────────────────

    /// Whether PIN setup has completed on this device.
    pub fn has_pin(&self) -> Result<bool, CoreError> {
        self.unlock.has_pin()
    }

    /// One-time PIN setup; returns the recovery card for one-time display.
    pub fn set_up_pin(&mut self, pin: &str, confirmation: &str) -> Result<CoordinateCard, CoreError> {
        pin_setup::set_up_pin(self.unlock.store_mut(), pin, confirmation)
    }

    /// Current unlock state as of now.
    pub fn unlock_state(&self) -> Result<UnlockState, CoreError> {
        self.unlock.state(Utc::now())
    }

    /// Submit a PIN from either lock screen (app-level or credentials
    /// section — same machine, different on-success continuation).
    pub fn submit_pin(&mut self, pin: &str) -> Result<PinOutcome, CoreError> {
        self.unlock.submit_pin(pin, Utc::now())
    }

    /// Biometric fast path; never touches the PIN counters.
    pub async fn unlock_with_biometric(
        &mut self,
        authenticator: &dyn BiometricAuthenticator,
    ) -> Result<BiometricOutcome, CoreError> {
        self.unlock.unlock_with_biometric(authenticator).await
    }

    /// The persisted recovery card, if PIN setup ever completed.
    pub fn recovery_card(&self) -> Result<Option<CoordinateCard>, CoreError> {
        pin_setup::stored_card(self.unlock.store())
    }

    // ── Banks & Accounts ────────────────────────────────────────────

    pub fn add_bank(&mut self, bank: Bank) -> Result<(), CoreError> {
        self.repo.insert_bank(bank)
    }

    pub fn update_bank(&mut self, id: i64, name: String, is_active: bool) -> Result<(), CoreError> {
        self.repo.update_bank(id, name, is_active)
    }

    /// Delete a bank and, by cascade, every account under it.
    pub fn delete_bank(&mut self, id: i64) -> Result<(), CoreError> {
        self.repo.delete_bank(id)
    }

    #[must_use]
    pub fn banks(&self) -> &[Bank] {
        self.repo.banks()
    }

    pub fn add_account(&mut self, account: Account) -> Result<(), CoreError> {
        self.repo.insert_account(account)
    }

    pub fn update_account(&mut self, account: Account) -> Result<(), CoreError> {
        self.repo.update_account(account)
    }

    pub fn delete_account(&mut self, id: i64) -> Result<(), CoreError> {
        self.repo.delete_account(id)
    }

    #[must_use]
    pub fn accounts(&self) -> Vec<&Account> {
        self.repo.accounts()
    }

    // ── Investments ─────────────────────────────────────────────────

    pub fn add_platform(&mut self, platform: InvestmentPlatform) -> Result<(), CoreError> {
        self.repo.insert_platform(platform)
    }

    pub fn update_platform(
        &mut self,
        id: i64,
        name: String,
        is_active: bool,
    ) -> Result<(), CoreError> {
        self.repo.update_platform(id, name, is_active)
    }

    /// Delete a platform and, by cascade, its investments.
    pub fn delete_platform(&mut self, id: i64) -> Result<(), CoreError> {
        self.repo.delete_platform(id)
    }

    #[must_use]
    pub fn platforms(&self) -> &[InvestmentPlatform] {
        self.repo.platforms()
    }

    pub fn add_investment(&mut self, investment: Investment) -> Result<(), CoreError> {
        self.repo.insert_investment(investment)
    }

    pub fn update_investment(&mut self, investment: Investment) -> Result<(), CoreError> {
        self.repo.update_investment(investment)
    }

    pub fn delete_investment(&mut self, id: i64) -> Result<(), CoreError> {
        self.repo.delete_investment(id)
    }

    #[must_use]
    pub fn investments(&self) -> &[Investment] {
        self.repo.investments()
    }

    // ── Calendar ────────────────────────────────────────────────────

    /// Add an event; returns its id (assigned when the event came in
    /// with id 0).
    pub fn add_event(&mut self, event: CalendarEvent) -> Result<i64, CoreError> {
        self.repo.insert_event(event)
    }

    pub fn update_event(&mut self, event: CalendarEvent) -> Result<(), CoreError> {
        self.repo.update_event(event)
    }

    pub fn delete_event(&mut self, id: i64) -> Result<(), CoreError> {
        self.repo.delete_event(id)
    }

    #[must_use]
    pub fn events(&self) -> &[CalendarEvent] {
        self.repo.events()
    }

    #[must_use]
    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.repo.events_on(date)
    }

    // ── Credentials ─────────────────────────────────────────────────

    /// Save a login; an existing credential with the same
    /// `(platform_id, account_id, holder)` key is overwritten.
    pub fn save_credential(&mut self, credential: Credential) -> Result<(), CoreError> {
        self.credentials.save(credential)
    }

    pub fn get_credential(
        &self,
        platform_id: i64,
        account_id: Option<i64>,
        holder: &str,
    ) -> Result<Option<Credential>, CoreError> {
        self.credentials.get(platform_id, account_id, holder)
    }

    pub fn delete_credential(
        &mut self,
        platform_id: i64,
        account_id: Option<i64>,
        holder: &str,
    ) -> Result<bool, CoreError> {
        self.credentials.delete(platform_id, account_id, holder)
    }

    pub fn credentials(&self) -> Result<Vec<Credential>, CoreError> {
        self.credentials.list()
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Snapshot everything into the compact QR payload.
    pub fn export_payload(&self) -> Result<String, CoreError> {
        let snapshot = self.repo.snapshot(self.credentials.list()?);
        Ok(codec::encode(&snapshot))
    }

    /// Import a scanned payload: merge/overwrite records by id, upsert
    /// credentials by composite key.
    pub fn import_payload(&mut self, payload: &str) -> Result<(), CoreError> {
        let data = codec::decode(payload)?;
        let credentials = self.repo.import(data);
        self.credentials.import(credentials)
    }

    /// Snapshot without encoding (e.g. for display or debugging).
    pub fn snapshot(&self) -> Result<ExportData, CoreError> {
        Ok(self.repo.snapshot(self.credentials.list()?))
    }
}
