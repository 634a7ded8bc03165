use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::security::unlock::{LOCK_COUNT_KEY, PIN_KEY, UNLOCK_AT_KEY};
use crate::storage::secure_store::SecureStore;

/// Required PIN length (digits only).
pub const PIN_LENGTH: usize = 8;

/// Secure-store key for the serialized recovery card.
pub const CARD_KEY: &str = "coordinate_card";

/// Coordinate card side length (4×4 grid).
pub const CARD_SIZE: usize = 4;

/// Column labels, left to right. Rows are numbered 1..=4 top to bottom.
pub const CARD_COLUMNS: [char; CARD_SIZE] = ['A', 'B', 'C', 'D'];

/// The offline PIN-recovery secret: a 4×4 grid of 4-digit codes, each
/// cell addressed by column letter and row number (e.g. "B3").
///
/// Generated once at PIN setup from a cryptographically secure source,
/// shown to the user a single time for safekeeping, then kept only in
/// the secure store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateCard {
    /// `cells[row][column]`, each in 0..=9999
    cells: [[u16; CARD_SIZE]; CARD_SIZE],
}

impl CoordinateCard {
    /// Generate a fresh card from the OS CSPRNG.
    pub fn generate() -> Result<Self, CoreError> {
        let mut cells = [[0u16; CARD_SIZE]; CARD_SIZE];
        for row in &mut cells {
            for cell in row.iter_mut() {
                *cell = random_code()?;
            }
        }
        Ok(Self { cells })
    }

    /// The code at a coordinate, zero-padded to 4 digits.
    /// Returns `None` for coordinates off the grid.
    #[must_use]
    pub fn code(&self, column: char, row: u8) -> Option<String> {
        let col_idx = CARD_COLUMNS
            .iter()
            .position(|c| *c == column.to_ascii_uppercase())?;
        if row == 0 || row as usize > CARD_SIZE {
            return None;
        }
        Some(format!("{:04}", self.cells[row as usize - 1][col_idx]))
    }

    /// Rows of formatted codes, top to bottom — ready for rendering or
    /// image export.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| format!("{c:04}")).collect())
            .collect()
    }
}

/// One-time PIN setup.
///
/// Validates the PIN (exactly 8 ASCII digits) against its confirmation,
/// persists it, clears any stale lockout state, and generates + persists
/// the recovery card. The returned card is the user's one chance to copy
/// it down; afterwards it only exists inside the secure store.
pub fn set_up_pin<S: SecureStore>(
    store: &mut S,
    pin: &str,
    confirmation: &str,
) -> Result<CoordinateCard, CoreError> {
    validate_pin(pin)?;
    if pin != confirmation {
        return Err(CoreError::PinMismatch);
    }

    let card = CoordinateCard::generate()?;
    let card_json = serde_json::to_string(&card)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize card: {e}")))?;

    store.put_string(PIN_KEY, pin)?;
    store.put_string(CARD_KEY, &card_json)?;
    store.put_i64(LOCK_COUNT_KEY, 0)?;
    store.put_i64(UNLOCK_AT_KEY, 0)?;

    Ok(card)
}

/// Load the persisted recovery card, if a PIN setup ever completed.
pub fn stored_card<S: SecureStore>(store: &S) -> Result<Option<CoordinateCard>, CoreError> {
    match store.get_string(CARD_KEY)? {
        None => Ok(None),
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
    }
}

fn validate_pin(pin: &str) -> Result<(), CoreError> {
    if pin.len() != PIN_LENGTH {
        return Err(CoreError::InvalidPin(format!(
            "PIN must be exactly {PIN_LENGTH} digits"
        )));
    }
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidPin("PIN must contain only digits".into()));
    }
    Ok(())
}

/// Uniform 4-digit code via rejection sampling — a plain modulo over the
/// full u16 range would bias the low codes.
fn random_code() -> Result<u16, CoreError> {
    // Largest multiple of 10000 that fits in u16 draws.
    const LIMIT: u16 = 60000;
    loop {
        let mut buf = [0u8; 2];
        getrandom::getrandom(&mut buf)?;
        let value = u16::from_le_bytes(buf);
        if value < LIMIT {
            return Ok(value % 10000);
        }
    }
}
