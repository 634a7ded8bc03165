// ═══════════════════════════════════════════════════════════════════
// Model & Repository Tests — entities, cascades, import merge, facade
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use pocket_ledger_core::errors::CoreError;
use pocket_ledger_core::models::bank::{Account, Bank};
use pocket_ledger_core::models::calendar::CalendarEvent;
use pocket_ledger_core::models::credential::Credential;
use pocket_ledger_core::models::export::ExportData;
use pocket_ledger_core::models::investment::{Investment, InvestmentPlatform, InvestmentType};
use pocket_ledger_core::storage::repository::MemoryRepository;
use pocket_ledger_core::storage::secure_store::MemoryStore;
use pocket_ledger_core::PocketLedger;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// InvestmentType
// ═══════════════════════════════════════════════════════════════════

mod investment_type {
    use super::*;

    #[test]
    fn wire_strings_round_trip() {
        for t in [
            InvestmentType::Stock,
            InvestmentType::Bond,
            InvestmentType::Fund,
            InvestmentType::Crypto,
            InvestmentType::RealEstate,
            InvestmentType::Other,
        ] {
            assert_eq!(InvestmentType::from_wire_str(t.as_wire_str()), Some(t));
        }
    }

    #[test]
    fn unknown_wire_text_is_none() {
        assert_eq!(InvestmentType::from_wire_str("derivative"), None);
        assert_eq!(InvestmentType::from_wire_str("STOCK"), None);
        assert_eq!(InvestmentType::from_wire_str(""), None);
    }

    #[test]
    fn default_is_other() {
        assert_eq!(InvestmentType::default(), InvestmentType::Other);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(InvestmentType::RealEstate.to_string(), "Real Estate");
        assert_eq!(InvestmentType::Stock.to_string(), "Stock");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Entity defaults & serde
// ═══════════════════════════════════════════════════════════════════

mod entities {
    use super::*;

    #[test]
    fn new_bank_is_active_with_no_accounts() {
        let bank = Bank::new(1, "Test");
        assert!(bank.is_active);
        assert!(bank.accounts.is_empty());
    }

    #[test]
    fn new_account_defaults_to_usd() {
        let account = Account::new(10, 1, "Ana", "123", 50.0);
        assert_eq!(account.currency, "USD");
        assert_eq!(account.account_type, None);
        assert!(account.is_active);
    }

    #[test]
    fn bank_serde_defaults_missing_fields() {
        let bank: Bank = serde_json::from_str(r#"{"id":1,"name":"Test"}"#).unwrap();
        assert!(bank.is_active);
        assert!(bank.accounts.is_empty());
    }

    #[test]
    fn investment_serde_defaults_missing_fields() {
        let inv: Investment =
            serde_json::from_str(r#"{"id":1,"platform_id":5,"name":"X"}"#).unwrap();
        assert_eq!(inv.amount, 0.0);
        assert_eq!(inv.investment_type, InvestmentType::Other);
        assert_eq!(inv.date, None);
        assert!(inv.is_active);
    }

    #[test]
    fn credential_storage_key_forms() {
        let platform_level = Credential::new(5, None, "Ana");
        assert_eq!(platform_level.storage_key(), "5:none:Ana");

        let account_level = Credential::new(1, Some(10), "Ana");
        assert_eq!(account_level.storage_key(), "1:10:Ana");
    }

    #[test]
    fn export_data_is_empty_detects_any_collection() {
        assert!(ExportData::default().is_empty());
        let data = ExportData {
            events: vec![CalendarEvent::new(1, "X", d(2026, 1, 1))],
            ..Default::default()
        };
        assert!(!data.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Repository CRUD
// ═══════════════════════════════════════════════════════════════════

mod repository {
    use super::*;

    fn repo_with_bank_and_accounts() -> MemoryRepository {
        let mut repo = MemoryRepository::new();
        repo.insert_bank(Bank::new(1, "First")).unwrap();
        repo.insert_bank(Bank::new(2, "Second")).unwrap();
        repo.insert_account(Account::new(10, 1, "Ana", "a-1", 100.0))
            .unwrap();
        repo.insert_account(Account::new(11, 1, "Luis", "a-2", 200.0))
            .unwrap();
        repo.insert_account(Account::new(12, 2, "Ana", "b-1", 300.0))
            .unwrap();
        repo
    }

    #[test]
    fn duplicate_bank_id_is_rejected() {
        let mut repo = MemoryRepository::new();
        repo.insert_bank(Bank::new(1, "First")).unwrap();
        assert!(matches!(
            repo.insert_bank(Bank::new(1, "Clone")),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn account_requires_existing_bank() {
        let mut repo = MemoryRepository::new();
        assert!(matches!(
            repo.insert_account(Account::new(10, 99, "Ana", "x", 0.0)),
            Err(CoreError::RecordNotFound {
                entity: "Bank",
                id: 99
            })
        ));
    }

    #[test]
    fn deleting_bank_cascades_to_its_accounts() {
        let mut repo = repo_with_bank_and_accounts();
        repo.delete_bank(1).unwrap();

        let remaining: Vec<i64> = repo.accounts().iter().map(|a| a.id).collect();
        assert_eq!(remaining, vec![12]); // only the other bank's account survives
        assert_eq!(repo.banks().len(), 1);
    }

    #[test]
    fn update_account_can_move_between_banks() {
        let mut repo = repo_with_bank_and_accounts();
        let mut account = Account::new(10, 2, "Ana", "a-1", 100.0);
        account.notes = Some("moved".to_string());
        repo.update_account(account).unwrap();

        assert_eq!(repo.banks()[0].accounts.len(), 1); // bank 1 lost it
        assert_eq!(repo.banks()[1].accounts.len(), 2); // bank 2 gained it
    }

    #[test]
    fn update_bank_preserves_accounts() {
        let mut repo = repo_with_bank_and_accounts();
        repo.update_bank(1, "Renamed".to_string(), false).unwrap();

        let bank = &repo.banks()[0];
        assert_eq!(bank.name, "Renamed");
        assert!(!bank.is_active);
        assert_eq!(bank.accounts.len(), 2);
    }

    #[test]
    fn deleting_platform_cascades_to_investments() {
        let mut repo = MemoryRepository::new();
        repo.insert_platform(InvestmentPlatform::new(5, "Vanguard"))
            .unwrap();
        repo.insert_platform(InvestmentPlatform::new(6, "Broker"))
            .unwrap();
        repo.insert_investment(Investment::new(100, 5, "ETF")).unwrap();
        repo.insert_investment(Investment::new(101, 5, "Bonds")).unwrap();
        repo.insert_investment(Investment::new(102, 6, "Stock")).unwrap();

        repo.delete_platform(5).unwrap();

        let remaining: Vec<i64> = repo.investments().iter().map(|i| i.id).collect();
        assert_eq!(remaining, vec![102]);
    }

    #[test]
    fn investment_requires_existing_platform() {
        let mut repo = MemoryRepository::new();
        assert!(matches!(
            repo.insert_investment(Investment::new(100, 99, "X")),
            Err(CoreError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn event_with_id_zero_gets_next_free_id() {
        let mut repo = MemoryRepository::new();
        let first = repo
            .insert_event(CalendarEvent::new(0, "First", d(2026, 1, 1)))
            .unwrap();
        let second = repo
            .insert_event(CalendarEvent::new(0, "Second", d(2026, 1, 2)))
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn events_on_filters_by_day() {
        let mut repo = MemoryRepository::new();
        repo.insert_event(CalendarEvent::new(1, "A", d(2026, 1, 1)))
            .unwrap();
        repo.insert_event(CalendarEvent::new(2, "B", d(2026, 1, 1)))
            .unwrap();
        repo.insert_event(CalendarEvent::new(3, "C", d(2026, 1, 2)))
            .unwrap();
        assert_eq!(repo.events_on(d(2026, 1, 1)).len(), 2);
    }

    #[test]
    fn delete_missing_record_is_not_found() {
        let mut repo = MemoryRepository::new();
        assert!(matches!(
            repo.delete_event(77),
            Err(CoreError::RecordNotFound {
                entity: "CalendarEvent",
                id: 77
            })
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Import — merge/overwrite by id
// ═══════════════════════════════════════════════════════════════════

mod import_merge {
    use super::*;

    #[test]
    fn known_ids_are_overwritten_new_ids_added() {
        let mut repo = MemoryRepository::new();
        repo.insert_bank(Bank::new(1, "Old Name")).unwrap();
        repo.insert_bank(Bank::new(2, "Untouched")).unwrap();

        let incoming = ExportData {
            banks: vec![Bank::new(1, "New Name"), Bank::new(3, "Brand New")],
            ..Default::default()
        };
        repo.import(incoming);

        let names: Vec<&str> = repo.banks().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["New Name", "Untouched", "Brand New"]);
    }

    #[test]
    fn import_hands_back_credentials_for_the_secure_store() {
        let mut repo = MemoryRepository::new();
        let incoming = ExportData {
            credentials: vec![Credential::new(1, None, "Ana")],
            ..Default::default()
        };
        let credentials = repo.import(incoming);
        assert_eq!(credentials.len(), 1);
    }

    #[test]
    fn snapshot_reflects_current_contents() {
        let mut repo = MemoryRepository::new();
        repo.insert_bank(Bank::new(1, "B")).unwrap();
        repo.insert_platform(InvestmentPlatform::new(5, "V")).unwrap();

        let snapshot = repo.snapshot(vec![Credential::new(1, None, "Ana")]);
        assert_eq!(snapshot.banks.len(), 1);
        assert_eq!(snapshot.platforms.len(), 1);
        assert_eq!(snapshot.credentials.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Facade — device-to-device transfer end to end
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    fn ledger() -> PocketLedger<MemoryStore, MemoryStore> {
        PocketLedger::new(MemoryStore::new(), MemoryStore::new())
    }

    fn populated_ledger() -> PocketLedger<MemoryStore, MemoryStore> {
        let mut ledger = ledger();
        ledger.add_bank(Bank::new(1, "First National")).unwrap();
        ledger
            .add_account(Account::new(10, 1, "Ana", "123-456", 2500.75))
            .unwrap();
        ledger
            .add_platform(InvestmentPlatform::new(5, "Vanguard"))
            .unwrap();
        let mut investment = Investment::new(100, 5, "S&P 500 ETF");
        investment.amount = 12000.0;
        investment.investment_type = InvestmentType::Fund;
        ledger.add_investment(investment).unwrap();
        ledger
            .add_event(CalendarEvent::new(7, "CD matures", d(2026, 1, 15)))
            .unwrap();
        ledger
            .save_credential(Credential {
                platform_id: 1,
                account_id: Some(10),
                holder: "Ana".to_string(),
                username: Some("ana_f".to_string()),
                password: Some("hunter2".to_string()),
            })
            .unwrap();
        ledger
    }

    #[test]
    fn export_then_import_transfers_everything() {
        let source = populated_ledger();
        let payload = source.export_payload().unwrap();

        let mut target = ledger();
        target.import_payload(&payload).unwrap();

        assert_eq!(target.snapshot().unwrap(), source.snapshot().unwrap());
    }

    #[test]
    fn import_of_bad_payload_is_a_decode_error() {
        let mut target = ledger();
        assert!(matches!(
            target.import_payload("{{nope"),
            Err(CoreError::Decode(_))
        ));
    }

    #[test]
    fn credential_overwrite_through_the_facade() {
        let mut ledger = ledger();
        ledger
            .save_credential(Credential {
                platform_id: 1,
                account_id: None,
                holder: "Ana".to_string(),
                username: Some("a".to_string()),
                password: Some("p1".to_string()),
            })
            .unwrap();
        ledger
            .save_credential(Credential {
                platform_id: 1,
                account_id: None,
                holder: "Ana".to_string(),
                username: Some("a".to_string()),
                password: Some("p2".to_string()),
            })
            .unwrap();

        let all = ledger.credentials().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].password.as_deref(), Some("p2"));
    }

    #[test]
    fn pin_flow_through_the_facade() {
        let mut ledger = ledger();
        assert!(!ledger.has_pin().unwrap());

        let card = ledger.set_up_pin("12345678", "12345678").unwrap();
        assert!(ledger.has_pin().unwrap());
        assert_eq!(ledger.recovery_card().unwrap().unwrap(), card);

        use pocket_ledger_core::security::unlock::PinOutcome;
        assert_eq!(
            ledger.submit_pin("00000000").unwrap(),
            PinOutcome::WrongPin { attempts_left: 4 }
        );
        assert_eq!(ledger.submit_pin("12345678").unwrap(), PinOutcome::Unlocked);
    }

    #[test]
    fn deleting_bank_through_facade_cascades() {
        let mut ledger = populated_ledger();
        ledger.delete_bank(1).unwrap();
        assert!(ledger.accounts().is_empty());
    }
}
