use std::io::Read;
use std::sync::Arc;

use ed25519_dalek::{Signer, SigningKey};

use super::ed25519_public_key_manager::{
    verifying_key, Ed25519PublicKeyManager, ED25519_KEY_VERSION, ED25519_PUBLIC_KEY_TYPE_URL,
};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{Key, KeyFormat, KeyMaterialType};
use crate::key_manager::{
    ensure_primitive_kind, validate_key_size, validate_key_type, validate_requested_size,
    validate_version, KeyManager, PrivateKeyManager,
};
use crate::primitives::{Primitive, PrimitiveKind, PublicKeySign};
use crate::secure_memory::{read_exact_secret, SecretBytes};
use crate::utils::constant_time_eq;

pub const ED25519_PRIVATE_KEY_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.Ed25519PrivateKey";

/// Size of the private seed
pub const ED25519_PRIVATE_KEY_SIZE: usize = 32;

/// Key manager for Ed25519 private keys
///
/// A private key holds the 32-byte seed and embeds its public key. Keys can be
/// created from the OS RNG or derived from the first 32 bytes of a stream.
///
/// # Example
///
/// ```
/// use keyreg::key::KeyFormat;
/// use keyreg::key_manager::{KeyManager, PrivateKeyManager};
/// use keyreg::primitives::PrimitiveKind;
/// use keyreg::signature::{Ed25519PrivateKeyManager, Ed25519PublicKeyManager};
///
/// let manager = Ed25519PrivateKeyManager;
/// let private_key = manager.create_key(&KeyFormat::new()).unwrap();
/// let public_key = manager.public_key(&private_key).unwrap();
///
/// let signer = manager
///     .primitive(&private_key, PrimitiveKind::PublicKeySign)
///     .unwrap()
///     .into_public_key_sign()
///     .unwrap();
/// let verifier = Ed25519PublicKeyManager
///     .primitive(&public_key, PrimitiveKind::PublicKeyVerify)
///     .unwrap()
///     .into_public_key_verify()
///     .unwrap();
///
/// let signature = signer.sign(b"message").unwrap();
/// assert!(verifier.verify(&signature, b"message").is_ok());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519PrivateKeyManager;

impl Ed25519PrivateKeyManager {
    fn key_from_seed(seed: SecretBytes) -> CryptoResult<Key> {
        let public_bytes = signing_key(seed.expose())?.verifying_key().to_bytes();
        let public_key = Key::public(
            ED25519_PUBLIC_KEY_TYPE_URL,
            ED25519_KEY_VERSION,
            public_bytes.to_vec(),
        );
        Ok(Key::private(
            ED25519_PRIVATE_KEY_TYPE_URL,
            ED25519_KEY_VERSION,
            seed,
            public_key,
        ))
    }
}

impl KeyManager for Ed25519PrivateKeyManager {
    fn key_type(&self) -> &str {
        ED25519_PRIVATE_KEY_TYPE_URL
    }

    fn version(&self) -> u32 {
        ED25519_KEY_VERSION
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::AsymmetricPrivate
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::PublicKeySign]
    }

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()> {
        validate_version(ED25519_PRIVATE_KEY_TYPE_URL, format.version, ED25519_KEY_VERSION)?;
        validate_requested_size(ED25519_PRIVATE_KEY_TYPE_URL, format, ED25519_PRIVATE_KEY_SIZE)
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Self::key_from_seed(SecretBytes::random(ED25519_PRIVATE_KEY_SIZE))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(ED25519_PRIVATE_KEY_TYPE_URL, key.version(), ED25519_KEY_VERSION)?;
        validate_key_size(
            ED25519_PRIVATE_KEY_TYPE_URL,
            key.key_len(),
            ED25519_PRIVATE_KEY_SIZE,
        )?;

        let public_key = key.public_key().ok_or_else(|| {
            CryptoError::invalid_key(
                ED25519_PRIVATE_KEY_TYPE_URL,
                "missing public key",
                error_codes::INVALID_PUBLIC_KEY,
            )
        })?;
        Ed25519PublicKeyManager.validate_key(public_key)?;

        let expected = signing_key(key.material())?.verifying_key().to_bytes();
        if !constant_time_eq(&expected, public_key.material()) {
            return Err(CryptoError::invalid_key(
                ED25519_PRIVATE_KEY_TYPE_URL,
                "public key does not match private key",
                error_codes::INVALID_PUBLIC_KEY,
            ));
        }
        Ok(())
    }

    fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        Ok(Primitive::PublicKeySign(Arc::new(Ed25519Signer {
            signing_key: signing_key(key.material())?,
        })))
    }

    fn supports_derivation(&self) -> bool {
        true
    }

    fn derive_key(&self, format: &KeyFormat, randomness: &mut dyn Read) -> CryptoResult<Key> {
        self.validate_key_format(format)?;
        Self::key_from_seed(read_exact_secret(randomness, ED25519_PRIVATE_KEY_SIZE)?)
    }
}

impl PrivateKeyManager for Ed25519PrivateKeyManager {
    fn public_key_type(&self) -> &str {
        ED25519_PUBLIC_KEY_TYPE_URL
    }

    fn public_key(&self, private_key: &Key) -> CryptoResult<Key> {
        private_key.public_key().cloned().ok_or_else(|| {
            CryptoError::invalid_key(
                ED25519_PRIVATE_KEY_TYPE_URL,
                "missing public key",
                error_codes::INVALID_PUBLIC_KEY,
            )
        })
    }
}

fn signing_key(seed: &[u8]) -> CryptoResult<SigningKey> {
    let seed: &[u8; ED25519_PRIVATE_KEY_SIZE] = seed.try_into().map_err(|_| {
        CryptoError::invalid_key_size(
            ED25519_PRIVATE_KEY_TYPE_URL,
            ED25519_PRIVATE_KEY_SIZE,
            seed.len(),
        )
    })?;
    Ok(SigningKey::from_bytes(seed))
}

struct Ed25519Signer {
    signing_key: SigningKey,
}

impl PublicKeySign for Ed25519Signer {
    fn sign(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(self.signing_key.sign(data).to_bytes().to_vec())
    }
}
