use std::io::Read;
use std::sync::Arc;

use aes_gcm::Aes256Gcm;

use super::cipher::NonceAead;
use crate::compliance::FipsCompatibility;
use crate::error::CryptoResult;
use crate::key::{Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_requested_size,
    validate_version, KeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind};
use crate::secure_memory::{read_exact_secret, SecretBytes};

pub const AES_GCM_TYPE_URL: &str = "type.googleapis.com/google.crypto.tink.AesGcmKey";

/// AES-256-GCM key size in bytes
pub const AES_GCM_KEY_SIZE: usize = 32;

const AES_GCM_KEY_VERSION: u32 = 0;

/// Key manager for AES-256-GCM
///
/// # Security Properties
///
/// 1. 256-bit keys drawn from the operating system RNG
/// 2. A random 96-bit nonce per message, prepended to the ciphertext
/// 3. Certified: stays available in restricted compliance mode
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmKeyManager;

impl KeyManager for AesGcmKeyManager {
    fn key_type(&self) -> &str {
        AES_GCM_TYPE_URL
    }

    fn version(&self) -> u32 {
        AES_GCM_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::Symmetric
    }

    fn fips_compatibility(&self) -> FipsCompatibility {
        FipsCompatibility::Certified
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::Aead]
    }

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()> {
        validate_version(AES_GCM_TYPE_URL, format.version, AES_GCM_KEY_VERSION)?;
        validate_requested_size(AES_GCM_TYPE_URL, format, AES_GCM_KEY_SIZE)
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Ok(Key::symmetric(
            AES_GCM_TYPE_URL,
            AES_GCM_KEY_VERSION,
            SecretBytes::random(AES_GCM_KEY_SIZE),
        ))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(AES_GCM_TYPE_URL, key.version(), AES_GCM_KEY_VERSION)?;
        validate_key_size(AES_GCM_TYPE_URL, key.key_len(), AES_GCM_KEY_SIZE)
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        let aead = NonceAead::<Aes256Gcm>::new(key.material(), "AES-256-GCM")?;
        Ok(Primitive::Aead(Arc::new(aead)))
    }

    fn supports_derivation(&self) -> bool {
        true
    }

    fn derive_key(&self, format: &KeyFormat, randomness: &mut dyn Read) -> CryptoResult<Key> {
        self.validate_key_format(format)?;
        let value = read_exact_secret(randomness, AES_GCM_KEY_SIZE)?;
        Ok(Key::symmetric(AES_GCM_TYPE_URL, AES_GCM_KEY_VERSION, value))
    }
}
