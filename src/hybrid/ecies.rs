//! ECIES over X25519 with an HKDF-SHA256 derived DEM key
//!
//! Ciphertext layout: `ephemeral_public_key (32) || dem_ciphertext`. The DEM
//! key is `HKDF-SHA256(ikm = ephemeral_public_key || shared_secret, info =
//! context_info)`, truncated to the DEM key size, and turned into an AEAD or
//! a deterministic AEAD by the registry.

use rand::rngs::OsRng;
use x25519_dalek::{EphemeralSecret, PublicKey, SharedSecret, StaticSecret};
use zeroize::Zeroizing;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{DemParams, Key};
use crate::key_manager::KeyManager;
use crate::primitives::{Aead, DeterministicAead, HybridDecrypt, HybridEncrypt, PrimitiveKind};
use crate::registry::Registry;
use crate::utils::hkdf_sha256;

use std::sync::Arc;

/// Size of an X25519 public key or secret scalar
pub const X25519_KEY_SIZE: usize = 32;

/// The primitive kind a DEM key type is used as, preferring AEAD
pub(crate) fn dem_primitive_kind(manager: &dyn KeyManager) -> Option<PrimitiveKind> {
    [PrimitiveKind::Aead, PrimitiveKind::DeterministicAead]
        .into_iter()
        .find(|kind| manager.primitive_kinds().contains(kind))
}

/// A per-message DEM
///
/// The DEM key is fresh for every message, so a deterministic AEAD is as
/// good as a randomized one here.
enum Dem {
    Aead(Arc<dyn Aead>),
    Deterministic(Arc<dyn DeterministicAead>),
}

impl Dem {
    fn seal(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        match self {
            Dem::Aead(aead) => aead.encrypt(plaintext, &[]),
            Dem::Deterministic(daead) => daead.encrypt_deterministically(plaintext, &[]),
        }
    }

    fn open(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        match self {
            Dem::Aead(aead) => aead.decrypt(ciphertext, &[]),
            Dem::Deterministic(daead) => daead.decrypt_deterministically(ciphertext, &[]),
        }
    }
}

/// Resolve the DEM for one message
fn dem_for_message(
    registry: &Registry,
    dem: &DemParams,
    ephemeral_public: &[u8; X25519_KEY_SIZE],
    shared: &SharedSecret,
    context_info: &[u8],
) -> CryptoResult<Dem> {
    if !shared.was_contributory() {
        return Err(CryptoError::invalid_key(
            "X25519",
            "shared secret is not contributory",
            error_codes::INVALID_PUBLIC_KEY,
        ));
    }

    let manager = registry.key_manager(&dem.key_type)?;
    let kind = dem_primitive_kind(manager.as_ref()).ok_or_else(|| {
        CryptoError::invalid_key_format(
            &dem.key_type,
            "DEM key type is neither an AEAD nor a deterministic AEAD",
        )
    })?;

    let mut ikm = Zeroizing::new(Vec::with_capacity(2 * X25519_KEY_SIZE));
    ikm.extend_from_slice(ephemeral_public);
    ikm.extend_from_slice(shared.as_bytes());

    let okm = hkdf_sha256(&ikm, None, context_info, dem.key_size)?;
    let dem_key = Key::symmetric(dem.key_type.as_str(), 0, okm);
    let primitive = registry.primitive(&dem_key, kind)?;
    match kind {
        PrimitiveKind::Aead => Ok(Dem::Aead(primitive.into_aead()?)),
        _ => Ok(Dem::Deterministic(primitive.into_deterministic_aead()?)),
    }
}

pub(crate) fn to_key_array(bytes: &[u8], type_url: &str) -> CryptoResult<[u8; X25519_KEY_SIZE]> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::invalid_key_size(type_url, X25519_KEY_SIZE, bytes.len()))
}

pub(crate) struct EciesEncrypt {
    pub(crate) registry: Registry,
    pub(crate) recipient: PublicKey,
    pub(crate) dem: DemParams,
}

impl HybridEncrypt for EciesEncrypt {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>> {
        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = PublicKey::from(&ephemeral).to_bytes();
        let shared = ephemeral.diffie_hellman(&self.recipient);

        let dem = dem_for_message(
            &self.registry,
            &self.dem,
            &ephemeral_public,
            &shared,
            context_info,
        )?;
        let ciphertext = dem.seal(plaintext).map_err(|e| {
            log::debug!("DEM encryption failed: {}", e);
            CryptoError::aead_error(
                "hybrid encrypt",
                "DEM encryption failed",
                error_codes::HYBRID_ENCRYPTION_FAILED,
            )
        })?;

        Ok([ephemeral_public.as_slice(), ciphertext.as_slice()].concat())
    }
}

pub(crate) struct EciesDecrypt {
    pub(crate) registry: Registry,
    pub(crate) secret: StaticSecret,
    pub(crate) dem: DemParams,
}

impl HybridDecrypt for EciesDecrypt {
    fn decrypt(&self, ciphertext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>> {
        if ciphertext.len() < X25519_KEY_SIZE {
            return Err(CryptoError::aead_error(
                "hybrid decrypt",
                "ciphertext too short",
                error_codes::HYBRID_DECRYPTION_FAILED,
            ));
        }

        let (encapsulated, payload) = ciphertext.split_at(X25519_KEY_SIZE);
        let ephemeral_public = to_key_array(encapsulated, "X25519")?;
        let shared = self
            .secret
            .diffie_hellman(&PublicKey::from(ephemeral_public));

        let dem = dem_for_message(
            &self.registry,
            &self.dem,
            &ephemeral_public,
            &shared,
            context_info,
        )?;
        dem.open(payload).map_err(|_| {
            CryptoError::aead_error(
                "hybrid decrypt",
                "authentication failed",
                error_codes::HYBRID_DECRYPTION_FAILED,
            )
        })
    }
}
