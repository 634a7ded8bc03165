use crate::errors::CoreError;
use crate::models::bank::{Account, Bank};
use crate::models::calendar::CalendarEvent;
use crate::models::credential::Credential;
use crate::models::export::ExportData;
use crate::models::investment::{Investment, InvestmentPlatform};

/// In-memory reference implementation of the persistence collaborator.
///
/// Mirrors the contract a device database must honor: CRUD per entity,
/// cascade delete of accounts with their bank and of investments with
/// their platform, and merge/overwrite import. Pure business logic —
/// no I/O, easy to test.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    banks: Vec<Bank>,
    platforms: Vec<InvestmentPlatform>,
    investments: Vec<Investment>,
    events: Vec<CalendarEvent>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Banks & Accounts ────────────────────────────────────────────

    /// Add a bank (accounts may come embedded).
    pub fn insert_bank(&mut self, bank: Bank) -> Result<(), CoreError> {
        if self.banks.iter().any(|b| b.id == bank.id) {
            return Err(CoreError::ValidationError(format!(
                "Bank with id {} already exists",
                bank.id
            )));
        }
        self.banks.push(bank);
        Ok(())
    }

    /// Update a bank's own fields. Its accounts are managed separately
    /// and stay untouched.
    pub fn update_bank(&mut self, id: i64, name: String, is_active: bool) -> Result<(), CoreError> {
        let bank = self
            .banks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(CoreError::RecordNotFound { entity: "Bank", id })?;
        bank.name = name;
        bank.is_active = is_active;
        Ok(())
    }

    /// Delete a bank. Cascades: every account under it goes with it.
    pub fn delete_bank(&mut self, id: i64) -> Result<(), CoreError> {
        let before = self.banks.len();
        self.banks.retain(|b| b.id != id);
        if self.banks.len() == before {
            return Err(CoreError::RecordNotFound { entity: "Bank", id });
        }
        Ok(())
    }

    #[must_use]
    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    /// Add an account under its owning bank (`account.bank_id`).
    pub fn insert_account(&mut self, account: Account) -> Result<(), CoreError> {
        if self
            .banks
            .iter()
            .flat_map(|b| &b.accounts)
            .any(|a| a.id == account.id)
        {
            return Err(CoreError::ValidationError(format!(
                "Account with id {} already exists",
                account.id
            )));
        }
        let bank = self
            .banks
            .iter_mut()
            .find(|b| b.id == account.bank_id)
            .ok_or(CoreError::RecordNotFound {
                entity: "Bank",
                id: account.bank_id,
            })?;
        bank.accounts.push(account);
        Ok(())
    }

    /// Replace an account by id. A changed `bank_id` moves it to the new bank.
    pub fn update_account(&mut self, account: Account) -> Result<(), CoreError> {
        let id = account.id;
        let found = self.remove_account(id);
        if !found {
            return Err(CoreError::RecordNotFound {
                entity: "Account",
                id,
            });
        }
        self.insert_account(account)
    }

    pub fn delete_account(&mut self, id: i64) -> Result<(), CoreError> {
        if self.remove_account(id) {
            Ok(())
        } else {
            Err(CoreError::RecordNotFound {
                entity: "Account",
                id,
            })
        }
    }

    /// All accounts across all banks.
    #[must_use]
    pub fn accounts(&self) -> Vec<&Account> {
        self.banks.iter().flat_map(|b| &b.accounts).collect()
    }

    fn remove_account(&mut self, id: i64) -> bool {
        for bank in &mut self.banks {
            if let Some(idx) = bank.accounts.iter().position(|a| a.id == id) {
                bank.accounts.remove(idx);
                return true;
            }
        }
        false
    }

    // ── Investment Platforms & Investments ──────────────────────────

    pub fn insert_platform(&mut self, platform: InvestmentPlatform) -> Result<(), CoreError> {
        if self.platforms.iter().any(|p| p.id == platform.id) {
            return Err(CoreError::ValidationError(format!(
                "Platform with id {} already exists",
                platform.id
            )));
        }
        self.platforms.push(platform);
        Ok(())
    }

    pub fn update_platform(
        &mut self,
        id: i64,
        name: String,
        is_active: bool,
    ) -> Result<(), CoreError> {
        let platform = self
            .platforms
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::RecordNotFound {
                entity: "InvestmentPlatform",
                id,
            })?;
        platform.name = name;
        platform.is_active = is_active;
        Ok(())
    }

    /// Delete a platform. Cascades: every investment recorded under it
    /// is removed as well.
    pub fn delete_platform(&mut self, id: i64) -> Result<(), CoreError> {
        let before = self.platforms.len();
        self.platforms.retain(|p| p.id != id);
        if self.platforms.len() == before {
            return Err(CoreError::RecordNotFound {
                entity: "InvestmentPlatform",
                id,
            });
        }
        self.investments.retain(|i| i.platform_id != id);
        Ok(())
    }

    #[must_use]
    pub fn platforms(&self) -> &[InvestmentPlatform] {
        &self.platforms
    }

    pub fn insert_investment(&mut self, investment: Investment) -> Result<(), CoreError> {
        if self.investments.iter().any(|i| i.id == investment.id) {
            return Err(CoreError::ValidationError(format!(
                "Investment with id {} already exists",
                investment.id
            )));
        }
        if !self.platforms.iter().any(|p| p.id == investment.platform_id) {
            return Err(CoreError::RecordNotFound {
                entity: "InvestmentPlatform",
                id: investment.platform_id,
            });
        }
        self.investments.push(investment);
        Ok(())
    }

    pub fn update_investment(&mut self, investment: Investment) -> Result<(), CoreError> {
        let slot = self
            .investments
            .iter_mut()
            .find(|i| i.id == investment.id)
            .ok_or(CoreError::RecordNotFound {
                entity: "Investment",
                id: investment.id,
            })?;
        *slot = investment;
        Ok(())
    }

    pub fn delete_investment(&mut self, id: i64) -> Result<(), CoreError> {
        let before = self.investments.len();
        self.investments.retain(|i| i.id != id);
        if self.investments.len() == before {
            return Err(CoreError::RecordNotFound {
                entity: "Investment",
                id,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    /// Investments recorded under one platform.
    #[must_use]
    pub fn investments_for_platform(&self, platform_id: i64) -> Vec<&Investment> {
        self.investments
            .iter()
            .filter(|i| i.platform_id == platform_id)
            .collect()
    }

    // ── Calendar Events ─────────────────────────────────────────────

    /// Add a calendar event. An id of 0 means "unsaved" — the repository
    /// assigns the next free id, like the device database would.
    pub fn insert_event(&mut self, mut event: CalendarEvent) -> Result<i64, CoreError> {
        if event.id == 0 {
            event.id = self.events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        } else if self.events.iter().any(|e| e.id == event.id) {
            return Err(CoreError::ValidationError(format!(
                "CalendarEvent with id {} already exists",
                event.id
            )));
        }
        let id = event.id;
        self.events.push(event);
        Ok(id)
    }

    pub fn update_event(&mut self, event: CalendarEvent) -> Result<(), CoreError> {
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(CoreError::RecordNotFound {
                entity: "CalendarEvent",
                id: event.id,
            })?;
        *slot = event;
        Ok(())
    }

    pub fn delete_event(&mut self, id: i64) -> Result<(), CoreError> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(CoreError::RecordNotFound {
                entity: "CalendarEvent",
                id,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Events falling on one day.
    #[must_use]
    pub fn events_on(&self, date: chrono::NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Build a point-in-time snapshot for the export codec. Credentials
    /// live in the secure store, so the caller passes them in.
    #[must_use]
    pub fn snapshot(&self, credentials: Vec<Credential>) -> ExportData {
        ExportData {
            banks: self.banks.clone(),
            platforms: self.platforms.clone(),
            investments: self.investments.clone(),
            events: self.events.clone(),
            credentials,
        }
    }

    /// Merge a decoded snapshot into this store: records with a known id
    /// are overwritten, new ids are added, nothing local is deleted.
    ///
    /// Returns the snapshot's credentials — they belong in the secure
    /// credential store, not here.
    pub fn import(&mut self, data: ExportData) -> Vec<Credential> {
        for bank in data.banks {
            match self.banks.iter_mut().find(|b| b.id == bank.id) {
                Some(slot) => *slot = bank,
                None => self.banks.push(bank),
            }
        }
        for platform in data.platforms {
            match self.platforms.iter_mut().find(|p| p.id == platform.id) {
                Some(slot) => *slot = platform,
                None => self.platforms.push(platform),
            }
        }
        for investment in data.investments {
            match self.investments.iter_mut().find(|i| i.id == investment.id) {
                Some(slot) => *slot = investment,
                None => self.investments.push(investment),
            }
        }
        for event in data.events {
            match self.events.iter_mut().find(|e| e.id == event.id) {
                Some(slot) => *slot = event,
                None => self.events.push(event),
            }
        }
        data.credentials
    }
}
