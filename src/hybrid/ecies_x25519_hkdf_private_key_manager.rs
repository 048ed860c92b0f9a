use std::sync::Arc;

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use super::ecies::{to_key_array, EciesDecrypt, X25519_KEY_SIZE};
use super::ecies_x25519_hkdf_public_key_manager::{
    key_dem, upgrade, validate_dem, EciesX25519HkdfPublicKeyManager, ECIES_KEY_VERSION,
    ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
};
use crate::aead::{AES_GCM_KEY_SIZE, AES_GCM_TYPE_URL};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{DemParams, Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_requested_size,
    validate_version, KeyManager, PrivateKeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind};
use crate::registry::{Registry, WeakRegistry};
use crate::secure_memory::SecretBytes;
use crate::utils::constant_time_eq;

pub const ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.EciesX25519HkdfPrivateKey";

/// DEM used when a key format names none: AES-256-GCM
pub fn default_dem() -> DemParams {
    DemParams {
        key_type: AES_GCM_TYPE_URL.to_string(),
        key_size: AES_GCM_KEY_SIZE,
    }
}

/// Key manager for ECIES-X25519-HKDF private keys
///
/// # Security Properties
///
/// 1. A fresh ephemeral X25519 key per message
/// 2. The DEM key is bound to the ephemeral key and to the caller's context info
/// 3. Low-order peer points are rejected
#[derive(Debug, Clone)]
pub struct EciesX25519HkdfPrivateKeyManager {
    registry: WeakRegistry,
}

impl EciesX25519HkdfPrivateKeyManager {
    pub fn new(registry: &Registry) -> Self {
        Self {
            registry: registry.downgrade(),
        }
    }

    fn public_manager(&self) -> CryptoResult<EciesX25519HkdfPublicKeyManager> {
        Ok(EciesX25519HkdfPublicKeyManager::new(&upgrade(&self.registry)?))
    }
}

fn static_secret(bytes: &[u8]) -> CryptoResult<StaticSecret> {
    let scalar = Zeroizing::new(to_key_array(bytes, ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL)?);
    Ok(StaticSecret::from(*scalar))
}

impl KeyManager for EciesX25519HkdfPrivateKeyManager {
    fn key_type(&self) -> &str {
        ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL
    }

    fn version(&self) -> u32 {
        ECIES_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::AsymmetricPrivate
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::HybridDecrypt]
    }

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()> {
        validate_version(
            ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
            format.version,
            ECIES_KEY_VERSION,
        )?;
        validate_requested_size(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, format, X25519_KEY_SIZE)?;
        let dem = format.dem.clone().unwrap_or_else(default_dem);
        validate_dem(
            &upgrade(&self.registry)?,
            &dem,
            ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
        )
    }

    fn create_key(&self, format: &KeyFormat) -> CryptoResult<Key> {
        let dem = format.dem.clone().unwrap_or_else(default_dem);
        let secret = SecretBytes::random(X25519_KEY_SIZE);
        let public_bytes = PublicKey::from(&static_secret(secret.expose())?).to_bytes();

        let public_key = Key::public(
            ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
            ECIES_KEY_VERSION,
            public_bytes.to_vec(),
        )
        .with_dem(dem.clone());
        Ok(Key::private(
            ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
            ECIES_KEY_VERSION,
            secret,
            public_key,
        )
        .with_dem(dem))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(
            ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
            key.version(),
            ECIES_KEY_VERSION,
        )?;
        validate_key_size(
            ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
            key.key_len(),
            X25519_KEY_SIZE,
        )?;

        let public_key = key.public_key().ok_or_else(|| {
            CryptoError::invalid_key(
                ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
                "missing public key",
                error_codes::INVALID_PUBLIC_KEY,
            )
        })?;
        self.public_manager()?.validate_key(public_key)?;

        let expected = PublicKey::from(&static_secret(key.material())?).to_bytes();
        if !constant_time_eq(&expected, public_key.material()) {
            return Err(CryptoError::invalid_key(
                ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
                "public key does not match private key",
                error_codes::INVALID_PUBLIC_KEY,
            ));
        }
        let dem = key_dem(key, ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL)?;
        if dem != key_dem(public_key, ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL)? {
            return Err(CryptoError::invalid_key(
                ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
                "DEM parameters differ from the public key's",
                error_codes::INVALID_KEY_MATERIAL,
            ));
        }
        Ok(())
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        Ok(Primitive::HybridDecrypt(Arc::new(EciesDecrypt {
            registry: upgrade(&self.registry)?,
            secret: static_secret(key.material())?,
            dem: key_dem(key, ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL)?.clone(),
        })))
    }
}

impl PrivateKeyManager for EciesX25519HkdfPrivateKeyManager {
    fn public_key_type(&self) -> &str {
        ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL
    }

    fn public_key(&self, private_key: &Key) -> CryptoResult<Key> {
        private_key.public_key().cloned().ok_or_else(|| {
            CryptoError::invalid_key(
                ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
                "missing public key",
                error_codes::INVALID_PUBLIC_KEY,
            )
        })
    }
}
