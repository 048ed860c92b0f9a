use std::io::Read;
use std::sync::Arc;

use chacha20poly1305::ChaCha20Poly1305;

use super::cipher::NonceAead;
use crate::error::CryptoResult;
use crate::key::{Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_requested_size,
    validate_version, KeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind};
use crate::secure_memory::{read_exact_secret, SecretBytes};

pub const CHACHA20_POLY1305_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.ChaCha20Poly1305Key";

pub const CHACHA20_POLY1305_KEY_SIZE: usize = 32;

const CHACHA20_POLY1305_KEY_VERSION: u32 = 0;

/// Key manager for ChaCha20-Poly1305 (RFC 8439)
///
/// Not certified, so it is withheld in restricted compliance mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChaCha20Poly1305KeyManager;

impl KeyManager for ChaCha20Poly1305KeyManager {
    fn key_type(&self) -> &str {
        CHACHA20_POLY1305_TYPE_URL
    }

    fn version(&self) -> u32 {
        CHACHA20_POLY1305_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::Symmetric
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::Aead]
    }

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()> {
        validate_version(
            CHACHA20_POLY1305_TYPE_URL,
            format.version,
            CHACHA20_POLY1305_KEY_VERSION,
        )?;
        validate_requested_size(CHACHA20_POLY1305_TYPE_URL, format, CHACHA20_POLY1305_KEY_SIZE)
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Ok(Key::symmetric(
            CHACHA20_POLY1305_TYPE_URL,
            CHACHA20_POLY1305_KEY_VERSION,
            SecretBytes::random(CHACHA20_POLY1305_KEY_SIZE),
        ))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(
            CHACHA20_POLY1305_TYPE_URL,
            key.version(),
            CHACHA20_POLY1305_KEY_VERSION,
        )?;
        validate_key_size(
            CHACHA20_POLY1305_TYPE_URL,
            key.key_len(),
            CHACHA20_POLY1305_KEY_SIZE,
        )
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        let aead = NonceAead::<ChaCha20Poly1305>::new(key.material(), "ChaCha20-Poly1305")?;
        Ok(Primitive::Aead(Arc::new(aead)))
    }

    fn supports_derivation(&self) -> bool {
        true
    }

    fn derive_key(&self, format: &KeyFormat, randomness: &mut dyn Read) -> CryptoResult<Key> {
        self.validate_key_format(format)?;
        let value = read_exact_secret(randomness, CHACHA20_POLY1305_KEY_SIZE)?;
        Ok(Key::symmetric(
            CHACHA20_POLY1305_TYPE_URL,
            CHACHA20_POLY1305_KEY_VERSION,
            value,
        ))
    }
}
