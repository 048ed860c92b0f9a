use std::sync::Arc;

use super::ecies::X25519_KEY_SIZE;
use super::hpke_public_key_manager::{
    key_params, HpkePublicKeyManager, HPKE_KEY_VERSION, HPKE_PUBLIC_KEY_TYPE_URL,
};
use super::hpke_x25519::{parse_private_key, public_key_bytes, HpkeDecrypt};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{HpkeAead, HpkeParams, Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_requested_size,
    validate_version, KeyManager, PrivateKeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind};
use crate::secure_memory::SecretBytes;
use crate::utils::constant_time_eq;

pub const HPKE_PRIVATE_KEY_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.HpkePrivateKey";

/// Suite used when a key format names none: AES-256-GCM
pub fn default_hpke_params() -> HpkeParams {
    HpkeParams::x25519_hkdf_sha256(HpkeAead::Aes256Gcm)
}

/// Key manager for HPKE private keys (RFC 9180 base mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct HpkePrivateKeyManager;

impl KeyManager for HpkePrivateKeyManager {
    fn key_type(&self) -> &str {
        HPKE_PRIVATE_KEY_TYPE_URL
    }

    fn version(&self) -> u32 {
        HPKE_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::AsymmetricPrivate
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::HybridDecrypt]
    }

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()> {
        validate_version(HPKE_PRIVATE_KEY_TYPE_URL, format.version, HPKE_KEY_VERSION)?;
        validate_requested_size(HPKE_PRIVATE_KEY_TYPE_URL, format, X25519_KEY_SIZE)?;
        if format.dem.is_some() {
            return Err(CryptoError::invalid_key_format(
                HPKE_PRIVATE_KEY_TYPE_URL,
                "HPKE keys take HPKE parameters, not DEM parameters",
            ));
        }
        Ok(())
    }

    fn create_key(&self, format: &KeyFormat) -> CryptoResult<Key> {
        let params = format.hpke.unwrap_or_else(default_hpke_params);
        let secret = SecretBytes::random(X25519_KEY_SIZE);
        let public_bytes =
            public_key_bytes(&parse_private_key(secret.expose(), HPKE_PRIVATE_KEY_TYPE_URL)?);

        let public_key = Key::public(HPKE_PUBLIC_KEY_TYPE_URL, HPKE_KEY_VERSION, public_bytes)
            .with_hpke(params);
        Ok(
            Key::private(HPKE_PRIVATE_KEY_TYPE_URL, HPKE_KEY_VERSION, secret, public_key)
                .with_hpke(params),
        )
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(HPKE_PRIVATE_KEY_TYPE_URL, key.version(), HPKE_KEY_VERSION)?;
        validate_key_size(HPKE_PRIVATE_KEY_TYPE_URL, key.key_len(), X25519_KEY_SIZE)?;

        let public_key = self.public_key(key)?;
        HpkePublicKeyManager.validate_key(&public_key)?;

        let expected =
            public_key_bytes(&parse_private_key(key.material(), HPKE_PRIVATE_KEY_TYPE_URL)?);
        if !constant_time_eq(&expected, public_key.material()) {
            return Err(CryptoError::invalid_key(
                HPKE_PRIVATE_KEY_TYPE_URL,
                "public key does not match private key",
                error_codes::INVALID_PUBLIC_KEY,
            ));
        }
        let params = key_params(key, HPKE_PRIVATE_KEY_TYPE_URL)?;
        if params != key_params(&public_key, HPKE_PUBLIC_KEY_TYPE_URL)? {
            return Err(CryptoError::invalid_key(
                HPKE_PRIVATE_KEY_TYPE_URL,
                "HPKE parameters differ from the public key's",
                error_codes::INVALID_KEY_MATERIAL,
            ));
        }
        Ok(())
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        Ok(Primitive::HybridDecrypt(Arc::new(HpkeDecrypt {
            secret: parse_private_key(key.material(), HPKE_PRIVATE_KEY_TYPE_URL)?,
            params: key_params(key, HPKE_PRIVATE_KEY_TYPE_URL)?,
        })))
    }
}

impl PrivateKeyManager for HpkePrivateKeyManager {
    fn public_key_type(&self) -> &str {
        HPKE_PUBLIC_KEY_TYPE_URL
    }

    fn public_key(&self, private_key: &Key) -> CryptoResult<Key> {
        private_key.public_key().cloned().ok_or_else(|| {
            CryptoError::invalid_key(
                HPKE_PRIVATE_KEY_TYPE_URL,
                "missing public key",
                error_codes::INVALID_PUBLIC_KEY,
            )
        })
    }
}
