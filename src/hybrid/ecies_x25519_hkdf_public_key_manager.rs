use std::sync::Arc;

use x25519_dalek::PublicKey;

use super::ecies::{dem_primitive_kind, to_key_array, EciesEncrypt, X25519_KEY_SIZE};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{DemParams, Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_version, KeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind};
use crate::registry::{Registry, WeakRegistry};

pub const ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.EciesX25519HkdfPublicKey";

pub(crate) const ECIES_KEY_VERSION: u32 = 0;

/// Key manager for ECIES-X25519-HKDF public keys
///
/// Produces [`PrimitiveKind::HybridEncrypt`]. The DEM named by the key is
/// resolved through the registry this manager was created for.
#[derive(Debug, Clone)]
pub struct EciesX25519HkdfPublicKeyManager {
    registry: WeakRegistry,
}

impl EciesX25519HkdfPublicKeyManager {
    pub fn new(registry: &Registry) -> Self {
        Self {
            registry: registry.downgrade(),
        }
    }
}

impl KeyManager for EciesX25519HkdfPublicKeyManager {
    fn key_type(&self) -> &str {
        ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL
    }

    fn version(&self) -> u32 {
        ECIES_KEY_VERSION
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
            ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
        ))
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Err(CryptoError::unsupported_operation(
            "create_key",
            ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
        ))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(
            ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
            key.version(),
            ECIES_KEY_VERSION,
        )?;
        validate_key_size(
            ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
            key.key_len(),
            X25519_KEY_SIZE,
        )?;
        let dem = key_dem(key, ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL)?;
        validate_dem(&upgrade(&self.registry)?, dem, ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL)
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        let recipient = to_key_array(key.material(), ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL)?;
        Ok(Primitive::HybridEncrypt(Arc::new(EciesEncrypt {
            registry: upgrade(&self.registry)?,
            recipient: PublicKey::from(recipient),
            dem: key_dem(key, ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL)?.clone(),
        })))
    }
}

/// The registry a hybrid manager resolves its DEM through
pub(crate) fn upgrade(registry: &WeakRegistry) -> CryptoResult<Registry> {
    registry.upgrade().ok_or_else(|| CryptoError::UnsupportedOperation {
        operation: "resolve DEM key type".to_string(),
        key_type: ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL.to_string(),
        error_code: error_codes::REGISTRY_DETACHED,
    })
}

pub(crate) fn key_dem<'a>(key: &'a Key, type_url: &str) -> CryptoResult<&'a DemParams> {
    key.dem().ok_or_else(|| {
        CryptoError::invalid_key(type_url, "missing DEM parameters", error_codes::INVALID_KEY_MATERIAL)
    })
}

/// Fail unless `dem` names a registered AEAD or deterministic AEAD key type
/// of a size it accepts
pub(crate) fn validate_dem(registry: &Registry, dem: &DemParams, type_url: &str) -> CryptoResult<()> {
    let manager = registry.key_manager(&dem.key_type)?;
    if dem_primitive_kind(manager.as_ref()).is_none() {
        return Err(CryptoError::invalid_key_format(
            type_url,
            &format!(
                "DEM key type {} is neither an AEAD nor a deterministic AEAD",
                dem.key_type
            ),
        ));
    }
    manager
        .validate_key_format(&KeyFormat::new().with_key_size(dem.key_size))
        .map_err(|e| {
            CryptoError::invalid_key_format(type_url, &format!("invalid DEM parameters: {}", e))
        })
}
