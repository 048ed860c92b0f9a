//! HPKE base mode over DHKEM(X25519, HKDF-SHA256) and HKDF-SHA256
//!
//! Ciphertext layout: `encapsulated_key (32) || aead_ciphertext`. The caller's
//! context info is the HPKE `info`; the associated data is empty.

use hpke::aead::{Aead as HpkeAeadAlgorithm, AesGcm128, AesGcm256, ChaCha20Poly1305};
use hpke::kdf::HkdfSha256;
use hpke::kem::X25519HkdfSha256;
use hpke::{
    single_shot_open, single_shot_seal, Deserializable, Kem, OpModeR, OpModeS, Serializable,
};
use rand::rngs::OsRng;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{HpkeAead, HpkeParams};
use crate::primitives::{HybridDecrypt, HybridEncrypt};

use super::ecies::X25519_KEY_SIZE;

pub(crate) type HpkePublicKey = <X25519HkdfSha256 as Kem>::PublicKey;
pub(crate) type HpkePrivateKey = <X25519HkdfSha256 as Kem>::PrivateKey;
type EncappedKey = <X25519HkdfSha256 as Kem>::EncappedKey;

pub(crate) fn parse_public_key(bytes: &[u8], type_url: &str) -> CryptoResult<HpkePublicKey> {
    HpkePublicKey::from_bytes(bytes).map_err(|e| {
        log::debug!("HPKE public key rejected: {:?}", e);
        CryptoError::invalid_key(
            type_url,
            "malformed X25519 public key",
            error_codes::INVALID_PUBLIC_KEY,
        )
    })
}

pub(crate) fn parse_private_key(bytes: &[u8], type_url: &str) -> CryptoResult<HpkePrivateKey> {
    HpkePrivateKey::from_bytes(bytes).map_err(|_| {
        CryptoError::invalid_key(
            type_url,
            "malformed X25519 private key",
            error_codes::INVALID_KEY_MATERIAL,
        )
    })
}

/// Public key bytes of an X25519 private key
pub(crate) fn public_key_bytes(private_key: &HpkePrivateKey) -> Vec<u8> {
    X25519HkdfSha256::sk_to_pk(private_key).to_bytes().to_vec()
}

fn seal<A: HpkeAeadAlgorithm>(
    recipient: &HpkePublicKey,
    plaintext: &[u8],
    context_info: &[u8],
) -> Result<(EncappedKey, Vec<u8>), hpke::HpkeError> {
    single_shot_seal::<A, HkdfSha256, X25519HkdfSha256, _>(
        &OpModeS::Base,
        recipient,
        context_info,
        plaintext,
        &[],
        &mut OsRng,
    )
}

fn open<A: HpkeAeadAlgorithm>(
    secret: &HpkePrivateKey,
    encapsulated: &EncappedKey,
    ciphertext: &[u8],
    context_info: &[u8],
) -> Result<Vec<u8>, hpke::HpkeError> {
    single_shot_open::<A, HkdfSha256, X25519HkdfSha256>(
        &OpModeR::Base,
        secret,
        encapsulated,
        context_info,
        ciphertext,
        &[],
    )
}

pub(crate) struct HpkeEncrypt {
    pub(crate) recipient: HpkePublicKey,
    pub(crate) params: HpkeParams,
}

impl HybridEncrypt for HpkeEncrypt {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>> {
        let sealed = match self.params.aead {
            HpkeAead::Aes128Gcm => seal::<AesGcm128>(&self.recipient, plaintext, context_info),
            HpkeAead::Aes256Gcm => seal::<AesGcm256>(&self.recipient, plaintext, context_info),
            HpkeAead::ChaCha20Poly1305 => {
                seal::<ChaCha20Poly1305>(&self.recipient, plaintext, context_info)
            }
        };
        let (encapsulated, ciphertext) = sealed.map_err(|e| {
            log::debug!("HPKE seal failed: {:?}", e);
            CryptoError::aead_error(
                "hybrid encrypt",
                "HPKE seal failed",
                error_codes::HYBRID_ENCRYPTION_FAILED,
            )
        })?;

        Ok([encapsulated.to_bytes().as_slice(), ciphertext.as_slice()].concat())
    }
}

pub(crate) struct HpkeDecrypt {
    pub(crate) secret: HpkePrivateKey,
    pub(crate) params: HpkeParams,
}

impl HybridDecrypt for HpkeDecrypt {
    fn decrypt(&self, ciphertext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>> {
        let failed = || {
            CryptoError::aead_error(
                "hybrid decrypt",
                "HPKE open failed",
                error_codes::HYBRID_DECRYPTION_FAILED,
            )
        };
        if ciphertext.len() < X25519_KEY_SIZE {
            return Err(failed());
        }

        let (encapsulated, payload) = ciphertext.split_at(X25519_KEY_SIZE);
        let encapsulated = EncappedKey::from_bytes(encapsulated).map_err(|_| failed())?;
        let opened = match self.params.aead {
            HpkeAead::Aes128Gcm => {
                open::<AesGcm128>(&self.secret, &encapsulated, payload, context_info)
            }
            HpkeAead::Aes256Gcm => {
                open::<AesGcm256>(&self.secret, &encapsulated, payload, context_info)
            }
            HpkeAead::ChaCha20Poly1305 => {
                open::<ChaCha20Poly1305>(&self.secret, &encapsulated, payload, context_info)
            }
        };
        opened.map_err(|_| failed())
    }
}
