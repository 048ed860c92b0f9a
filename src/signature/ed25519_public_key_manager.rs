use std::sync::Arc;

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_version, KeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind, PublicKeyVerify};

pub const ED25519_PUBLIC_KEY_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.Ed25519PublicKey";

pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of a raw Ed25519 signature
pub const ED25519_SIGNATURE_SIZE: usize = 64;

pub(crate) const ED25519_KEY_VERSION: u32 = 0;

/// Key manager for Ed25519 public keys
///
/// Public keys are only ever extracted from private keys, so
/// [`KeyManager::create_key`] is unsupported.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519PublicKeyManager;

impl KeyManager for Ed25519PublicKeyManager {
    fn key_type(&self) -> &str {
        ED25519_PUBLIC_KEY_TYPE_URL
    }

    fn version(&self) -> u32 {
        ED25519_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::AsymmetricPublic
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::PublicKeyVerify]
    }

    fn validate_key_format(&self, _format: &KeyFormat) -> CryptoResult<()> {
        Err(CryptoError::unsupported_operation(
            "validate_key_format",
            ED25519_PUBLIC_KEY_TYPE_URL,
        ))
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Err(CryptoError::unsupported_operation(
            "create_key",
            ED25519_PUBLIC_KEY_TYPE_URL,
        ))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(ED25519_PUBLIC_KEY_TYPE_URL, key.version(), ED25519_KEY_VERSION)?;
        validate_key_size(
            ED25519_PUBLIC_KEY_TYPE_URL,
            key.key_len(),
            ED25519_PUBLIC_KEY_SIZE,
        )?;
        verifying_key(key.material()).map(|_| ())
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        Ok(Primitive::PublicKeyVerify(Arc::new(Ed25519Verifier {
            verifying_key: verifying_key(key.material())?,
        })))
    }
}

/// Parse and check a 32-byte compressed Edwards point
pub(crate) fn verifying_key(bytes: &[u8]) -> CryptoResult<VerifyingKey> {
    let bytes: &[u8; ED25519_PUBLIC_KEY_SIZE] = bytes.try_into().map_err(|_| {
        CryptoError::invalid_key_size(ED25519_PUBLIC_KEY_TYPE_URL, ED25519_PUBLIC_KEY_SIZE, bytes.len())
    })?;
    VerifyingKey::from_bytes(bytes).map_err(|_| {
        CryptoError::invalid_key(
            ED25519_PUBLIC_KEY_TYPE_URL,
            "not a valid Ed25519 point",
            error_codes::INVALID_PUBLIC_KEY,
        )
    })
}

struct Ed25519Verifier {
    verifying_key: VerifyingKey,
}

impl PublicKeyVerify for Ed25519Verifier {
    fn verify(&self, signature: &[u8], data: &[u8]) -> CryptoResult<()> {
        let signature = Signature::from_slice(signature).map_err(|_| {
            CryptoError::signature_error(
                "verify",
                "signature must be 64 bytes",
                error_codes::VERIFICATION_FAILED,
            )
        })?;
        self.verifying_key.verify(data, &signature).map_err(|_| {
            CryptoError::signature_error(
                "verify",
                "invalid signature",
                error_codes::VERIFICATION_FAILED,
            )
        })
    }
}
