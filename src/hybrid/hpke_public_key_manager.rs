use std::sync::Arc;

use super::ecies::X25519_KEY_SIZE;
use super::hpke_x25519::{parse_public_key, HpkeEncrypt};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{HpkeParams, Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_version, KeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind};

pub const HPKE_PUBLIC_KEY_TYPE_URL: &str = "type.googleapis.com/google.crypto.tink.HpkePublicKey";

pub(crate) const HPKE_KEY_VERSION: u32 = 0;

/// Key manager for HPKE public keys
///
/// Produces [`PrimitiveKind::HybridEncrypt`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HpkePublicKeyManager;

impl KeyManager for HpkePublicKeyManager {
    fn key_type(&self) -> &str {
        HPKE_PUBLIC_KEY_TYPE_URL
    }

    fn version(&self) -> u32 {
        HPKE_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::AsymmetricPublic
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::HybridEncrypt]
    }

    fn validate_key_format(&self, _format: &KeyFormat) -> CryptoResult<()> {
        Err(CryptoError::unsupported_operation(
            "validate_key_format",
            HPKE_PUBLIC_KEY_TYPE_URL,
        ))
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Err(CryptoError::unsupported_operation(
            "create_key",
            HPKE_PUBLIC_KEY_TYPE_URL,
        ))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(HPKE_PUBLIC_KEY_TYPE_URL, key.version(), HPKE_KEY_VERSION)?;
        validate_key_size(HPKE_PUBLIC_KEY_TYPE_URL, key.key_len(), X25519_KEY_SIZE)?;
        key_params(key, HPKE_PUBLIC_KEY_TYPE_URL)?;
        parse_public_key(key.material(), HPKE_PUBLIC_KEY_TYPE_URL).map(|_| ())
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        Ok(Primitive::HybridEncrypt(Arc::new(HpkeEncrypt {
            recipient: parse_public_key(key.material(), HPKE_PUBLIC_KEY_TYPE_URL)?,
            params: key_params(key, HPKE_PUBLIC_KEY_TYPE_URL)?,
        })))
    }
}

pub(crate) fn key_params(key: &Key, type_url: &str) -> CryptoResult<HpkeParams> {
    key.hpke().ok_or_else(|| {
        CryptoError::invalid_key(
            type_url,
            "missing HPKE parameters",
            error_codes::INVALID_KEY_MATERIAL,
        )
    })
}
