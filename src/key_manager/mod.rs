/*!
 * Key Manager Interface
 *
 * A key manager owns one key type: it creates, validates and derives keys of
 * that type and turns them into primitives. Key managers for asymmetric
 * schemes additionally implement [`PrivateKeyManager`] on the private half so
 * the public key can be extracted.
 *
 * The helpers in this module hold the checks every manager shares: version
 * gating, fixed key sizes and type URL matching.
 */

use std::fmt;
use std::io::Read;

use crate::compliance::FipsCompatibility;
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{Key, KeyFormat, KeyMaterialType};
use crate::primitives::{Primitive, PrimitiveKind};

#[cfg(test)]
mod tests;

/// Operations for one key type
pub trait KeyManager: fmt::Debug + Send + Sync {
    /// The type URL this manager handles
    fn key_type(&self) -> &str;

    /// Highest key version this manager understands
    fn version(&self) -> u32;

    fn key_material_type(&self) -> KeyMaterialType;

    /// Whether the algorithm may be registered in restricted mode
    fn fips_compatibility(&self) -> FipsCompatibility {
        FipsCompatibility::NotCertified
    }

    /// Primitive interfaces [`KeyManager::primitive`] can produce
    fn primitive_kinds(&self) -> &'static [PrimitiveKind];

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()>;

    /// Generate a fresh key
    fn create_key(&self, format: &KeyFormat) -> CryptoResult<Key>;

    /// Reject structurally invalid keys
    fn validate_key(&self, key: &Key) -> CryptoResult<()>;

    /// Build the primitive of kind `kind` from a valid key
    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive>;

    fn supports_derivation(&self) -> bool {
        false
    }

    /// Derive a key from a randomness stream
    ///
    /// Implementations check the format version before reading anything from
    /// `randomness` and then read exactly the bytes they need.
    fn derive_key(&self, _format: &KeyFormat, _randomness: &mut dyn Read) -> CryptoResult<Key> {
        Err(CryptoError::unsupported_operation(
            "derive_key",
            self.key_type(),
        ))
    }
}

/// Private half of an asymmetric key type
pub trait PrivateKeyManager: KeyManager {
    /// Type URL of the matching public key manager
    fn public_key_type(&self) -> &str;

    /// The public key embedded in `private_key`
    fn public_key(&self, private_key: &Key) -> CryptoResult<Key>;
}

/// Fail with `UnsupportedVersion` if `version` is newer than `max_version`
pub fn validate_version(type_url: &str, version: u32, max_version: u32) -> CryptoResult<()> {
    if version > max_version {
        return Err(CryptoError::unsupported_version(type_url, version, max_version));
    }
    Ok(())
}

/// Fail unless `actual` equals the key type's fixed size
pub fn validate_key_size(type_url: &str, actual: usize, expected: usize) -> CryptoResult<()> {
    if actual != expected {
        return Err(CryptoError::invalid_key_size(type_url, expected, actual));
    }
    Ok(())
}

/// Fail unless `key` belongs to `manager`
pub fn validate_key_type(manager: &dyn KeyManager, key: &Key) -> CryptoResult<()> {
    if key.type_url() != manager.key_type() {
        return Err(CryptoError::invalid_key(
            manager.key_type(),
            &format!("key has type {}", key.type_url()),
            error_codes::KEY_TYPE_MISMATCH,
        ));
    }
    Ok(())
}

/// Fail unless `manager` can produce `kind`
pub fn ensure_primitive_kind(manager: &dyn KeyManager, kind: PrimitiveKind) -> CryptoResult<()> {
    if !manager.primitive_kinds().contains(&kind) {
        return Err(CryptoError::unsupported_primitive(
            manager.key_type(),
            kind.name(),
        ));
    }
    Ok(())
}

/// Fail unless a requested key size, if any, equals the fixed size
pub fn validate_requested_size(
    type_url: &str,
    format: &KeyFormat,
    expected: usize,
) -> CryptoResult<()> {
    match format.key_size {
        Some(size) if size != expected => Err(CryptoError::invalid_key_format(
            type_url,
            &format!("key size must be {} bytes, requested {}", expected, size),
        )),
        _ => Ok(()),
    }
}
