use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::storage::secure_store::{int_entry, string_entry, SecureStore, StoreValue};

/// Magic bytes identifying a PLSV (Pocket Ledger Secure Vault) blob.
pub const MAGIC: &[u8; 4] = b"PLSV";

/// Current vault format version.
pub const CURRENT_VERSION: u16 = 1;

/// Minimum header size in bytes:
/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8) = 54
pub const MIN_HEADER_SIZE: usize = 54;

/// Argon2id parameters for key derivation.
/// Stored in the vault header so they can be raised in future versions.
#[derive(Debug, Clone, Copy)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost: u32,
    /// Degree of parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 65_536, // 64 MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// What actually gets encrypted: the namespace label plus the entry map.
/// Carrying the namespace inside the ciphertext means a `secure_credentials`
/// blob can never be quietly opened as `secure_prefs`.
#[derive(Debug, Serialize, Deserialize)]
struct VaultPayload {
    namespace: String,
    entries: HashMap<String, StoreValue>,
}

/// Encrypted-at-rest key-value store, one instance per preference namespace
/// (`secure_prefs` for PIN/lock state, `secure_credentials` for logins).
///
/// Flow on save: entries → bincode → AES-256-GCM(Argon2id(passphrase)) → PLSV bytes.
#[derive(Debug)]
pub struct Vault {
    namespace: String,
    entries: HashMap<String, StoreValue>,
}

impl Vault {
    /// Create an empty vault for a namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Encrypt and serialize the vault to raw bytes (portable, platform-independent).
    pub fn save_to_bytes(&self, passphrase: &str) -> Result<Vec<u8>, CoreError> {
        let payload = VaultPayload {
            namespace: self.namespace.clone(),
            entries: self.entries.clone(),
        };
        let plaintext = bincode::serialize(&payload)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize vault: {e}")))?;

        let salt: [u8; 16] = random_bytes()?;
        let nonce: [u8; 12] = random_bytes()?;
        let kdf_params = KdfParams::default();
        let key = derive_key(passphrase, &salt, &kdf_params)?;

        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|e| CoreError::Encryption(format!("Encryption failed: {e}")))?;

        Ok(assemble(CURRENT_VERSION, &kdf_params, &salt, &nonce, &ciphertext))
    }

    /// Decrypt and deserialize a vault from raw bytes.
    ///
    /// `namespace` must match the label sealed inside the ciphertext; a
    /// mismatch means the caller opened the wrong blob.
    pub fn load_from_bytes(
        namespace: &str,
        data: &[u8],
        passphrase: &str,
    ) -> Result<Self, CoreError> {
        let (header, ciphertext) = parse_header(data)?;
        let key = derive_key(passphrase, &header.salt, &header.kdf_params)?;

        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&header.nonce), ciphertext)
            .map_err(|_| CoreError::Decryption)?;

        let payload: VaultPayload = bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize vault: {e}")))?;

        if payload.namespace != namespace {
            return Err(CoreError::InvalidVaultFormat(format!(
                "Vault namespace mismatch: expected '{namespace}', found '{}'",
                payload.namespace
            )));
        }

        Ok(Self {
            namespace: payload.namespace,
            entries: payload.entries,
        })
    }

    /// Save the vault to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&self, path: &str, passphrase: &str) -> Result<(), CoreError> {
        let bytes = self.save_to_bytes(passphrase)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a vault from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(
        namespace: &str,
        path: &str,
        passphrase: &str,
    ) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(namespace, &bytes, passphrase)
    }
}

impl SecureStore for Vault {
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

// ── Wire format ──────────────────────────────────────────────────────

struct VaultHeader {
    kdf_params: KdfParams,
    salt: [u8; 16],
    nonce: [u8; 12],
}

/// Layout:
/// ```text
/// [PLSV: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable, includes AES-GCM auth tag]
/// ```
fn assemble(
    version: u16,
    kdf_params: &KdfParams,
    salt: &[u8; 16],
    nonce: &[u8; 12],
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MIN_HEADER_SIZE + ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(ciphertext);
    buf
}

fn parse_header(data: &[u8]) -> Result<(VaultHeader, &[u8]), CoreError> {
    if data.len() < MIN_HEADER_SIZE {
        return Err(CoreError::InvalidVaultFormat(
            "Data too small to be a valid PLSV vault".into(),
        ));
    }
    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidVaultFormat(
            "Invalid magic bytes — not a PLSV vault".into(),
        ));
    }

    let mut offset = 4;

    let version = u16::from_le_bytes([data[offset], data[offset + 1]]);
    offset += 2;
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let mut read_u32 = |off: &mut usize| -> Result<u32, CoreError> {
        let value = u32::from_le_bytes(data[*off..*off + 4].try_into().map_err(|_| {
            CoreError::InvalidVaultFormat("Failed to read KDF parameter".into())
        })?);
        *off += 4;
        Ok(value)
    };
    let memory_cost = read_u32(&mut offset)?;
    let time_cost = read_u32(&mut offset)?;
    let parallelism = read_u32(&mut offset)?;

    // Range checks keep a crafted header from requesting absurd KDF work.
    if !(8..=1_048_576).contains(&memory_cost) {
        return Err(CoreError::InvalidVaultFormat(format!(
            "KDF memory_cost out of safe range: {memory_cost} KiB (expected 8..1048576)"
        )));
    }
    if !(1..=20).contains(&time_cost) {
        return Err(CoreError::InvalidVaultFormat(format!(
            "KDF time_cost out of safe range: {time_cost} (expected 1..20)"
        )));
    }
    if !(1..=16).contains(&parallelism) {
        return Err(CoreError::InvalidVaultFormat(format!(
            "KDF parallelism out of safe range: {parallelism} (expected 1..16)"
        )));
    }

    let mut salt = [0u8; 16];
    salt.copy_from_slice(&data[offset..offset + 16]);
    offset += 16;

    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(&data[offset..offset + 12]);
    offset += 12;

    let ciphertext_len = u64::from_le_bytes(
        data[offset..offset + 8]
            .try_into()
            .map_err(|_| CoreError::InvalidVaultFormat("Failed to read ciphertext length".into()))?,
    );
    offset += 8;

    // The length field is untrusted input; check it against the bytes
    // actually present before it touches any offset arithmetic.
    let remaining = (data.len() - offset) as u64;
    if ciphertext_len > remaining {
        return Err(CoreError::InvalidVaultFormat(format!(
            "Vault truncated: expected {ciphertext_len} bytes of ciphertext, got {remaining}"
        )));
    }
    let expected_end = offset + ciphertext_len as usize;

    let header = VaultHeader {
        kdf_params: KdfParams {
            memory_cost,
            time_cost,
            parallelism,
        },
        salt,
        nonce,
    };
    Ok((header, &data[offset..expected_end]))
}

// ── Crypto helpers ───────────────────────────────────────────────────

/// Derive a 256-bit key from a passphrase using Argon2id.
/// The salt must be random and unique per save.
fn derive_key(passphrase: &str, salt: &[u8; 16], params: &KdfParams) -> Result<[u8; 32], CoreError> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // output length = 256 bits
    )
    .map_err(|e| CoreError::Encryption(format!("Invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("Argon2 key derivation failed: {e}")))?;
    Ok(key)
}

/// Cryptographically secure random bytes (salts, nonces).
fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)?;
    Ok(buf)
}
