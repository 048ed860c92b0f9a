use std::io::Read;
use std::sync::Arc;

use aes_siv::siv::{Aes128Siv, Aes256Siv};
use aes_siv::KeyInit;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_requested_size,
    validate_version, KeyManager,
};
use crate::primitives::{DeterministicAead, Primitive, PrimitiveKind};
use crate::secure_memory::{read_exact_secret, SecretBytes};

pub const AES_SIV_TYPE_URL: &str = "type.googleapis.com/google.crypto.tink.AesSivKey";

/// Two AES-256 keys: the S2V (CMAC) key followed by the CTR key
pub const AES_SIV_KEY_SIZE: usize = 64;

/// Size of the synthetic IV prepended to every ciphertext
pub const SIV_SIZE: usize = 16;

const AES_SIV_KEY_VERSION: u32 = 0;

/// Key size of AES-SIV-CMAC-256, accepted by [`AesSiv`] but not by the manager
const AES128_SIV_KEY_SIZE: usize = 32;

/// Key manager for RFC 5297 AES-SIV deterministic AEAD
///
/// Only 64-byte keys (AES-SIV-CMAC-512) are accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesSivKeyManager;

impl KeyManager for AesSivKeyManager {
    fn key_type(&self) -> &str {
        AES_SIV_TYPE_URL
    }

    fn version(&self) -> u32 {
        AES_SIV_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::Symmetric
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::DeterministicAead]
    }

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()> {
        validate_version(AES_SIV_TYPE_URL, format.version, AES_SIV_KEY_VERSION)?;
        validate_requested_size(AES_SIV_TYPE_URL, format, AES_SIV_KEY_SIZE)
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Ok(Key::symmetric(
            AES_SIV_TYPE_URL,
            AES_SIV_KEY_VERSION,
            SecretBytes::random(AES_SIV_KEY_SIZE),
        ))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(AES_SIV_TYPE_URL, key.version(), AES_SIV_KEY_VERSION)?;
        validate_key_size(AES_SIV_TYPE_URL, key.key_len(), AES_SIV_KEY_SIZE)
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        validate_key_size(AES_SIV_TYPE_URL, key.key_len(), AES_SIV_KEY_SIZE)?;
        Ok(Primitive::DeterministicAead(Arc::new(AesSiv::from_slice(
            key.material(),
        )?)))
    }

    fn supports_derivation(&self) -> bool {
        true
    }

    fn derive_key(&self, format: &KeyFormat, randomness: &mut dyn Read) -> CryptoResult<Key> {
        self.validate_key_format(format)?;
        let value = read_exact_secret(randomness, AES_SIV_KEY_SIZE)?;
        Ok(Key::symmetric(AES_SIV_TYPE_URL, AES_SIV_KEY_VERSION, value))
    }
}

/// AES-SIV over a single header, the associated data
///
/// Ciphertext layout: `siv (16) || ctr_ciphertext`. Accepts 32-byte
/// (AES-SIV-CMAC-256) and 64-byte (AES-SIV-CMAC-512) keys.
pub struct AesSiv {
    key: SecretBytes,
}

impl AesSiv {
    pub fn new(key: &SecretBytes) -> CryptoResult<Self> {
        Self::from_slice(key.expose())
    }

    fn from_slice(key: &[u8]) -> CryptoResult<Self> {
        match key.len() {
            AES128_SIV_KEY_SIZE | AES_SIV_KEY_SIZE => Ok(Self {
                key: SecretBytes::from_vec(key.to_vec()),
            }),
            n => Err(CryptoError::invalid_key_size(
                AES_SIV_TYPE_URL,
                AES_SIV_KEY_SIZE,
                n,
            )),
        }
    }
}

// The siv ciphers take `&mut self`, so one is built per call
fn siv<S: KeyInit>(key: &[u8]) -> CryptoResult<S> {
    S::new_from_slice(key).map_err(|_| {
        CryptoError::invalid_key(
            AES_SIV_TYPE_URL,
            "bad SIV key",
            error_codes::INVALID_KEY_MATERIAL,
        )
    })
}

fn siv_failure(reason: &str) -> CryptoError {
    CryptoError::aead_error("AES-SIV", reason, error_codes::AEAD_DECRYPTION_FAILED)
}

impl DeterministicAead for AesSiv {
    fn encrypt_deterministically(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let key = self.key.expose();
        let headers = [associated_data];
        let sealed = match key.len() {
            AES_SIV_KEY_SIZE => siv::<Aes256Siv>(key)?.encrypt(headers, plaintext),
            _ => siv::<Aes128Siv>(key)?.encrypt(headers, plaintext),
        };
        sealed.map_err(|_| {
            CryptoError::aead_error(
                "AES-SIV",
                "encryption failed",
                error_codes::AEAD_ENCRYPTION_FAILED,
            )
        })
    }

    fn decrypt_deterministically(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        if ciphertext.len() < SIV_SIZE {
            return Err(siv_failure("ciphertext too short"));
        }

        let key = self.key.expose();
        let headers = [associated_data];
        let opened = match key.len() {
            AES_SIV_KEY_SIZE => siv::<Aes256Siv>(key)?.decrypt(headers, ciphertext),
            _ => siv::<Aes128Siv>(key)?.decrypt(headers, ciphertext),
        };
        opened.map_err(|_| siv_failure("authentication failed"))
    }
}
