use aes_gcm::aead::{generic_array::typenum::Unsigned, AeadCore, KeyInit, OsRng, Payload};

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::primitives::Aead;

/// Randomized-nonce AEAD over a RustCrypto cipher
///
/// Ciphertexts are laid out as `nonce || ciphertext || tag`; a fresh random
/// nonce is drawn for every encryption.
pub(crate) struct NonceAead<C> {
    cipher: C,
    algorithm: &'static str,
}

impl<C> NonceAead<C>
where
    C: KeyInit + AeadCore,
{
    pub(crate) fn new(key: &[u8], algorithm: &'static str) -> CryptoResult<Self> {
        let cipher = C::new_from_slice(key).map_err(|_| {
            CryptoError::invalid_parameter(
                "key",
                &format!("{} key", algorithm),
                &format!("{} bytes", key.len()),
            )
        })?;
        Ok(Self { cipher, algorithm })
    }
}

impl<C> Aead for NonceAead<C>
where
    C: aes_gcm::aead::Aead + AeadCore + Send + Sync,
{
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> CryptoResult<Vec<u8>> {
        let nonce = C::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: associated_data,
                },
            )
            .map_err(|_| {
                CryptoError::aead_error(
                    self.algorithm,
                    "encryption failed",
                    error_codes::AEAD_ENCRYPTION_FAILED,
                )
            })?;

        let mut output = Vec::with_capacity(nonce.len() + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> CryptoResult<Vec<u8>> {
        let nonce_size = C::NonceSize::USIZE;
        let tag_size = C::TagSize::USIZE;
        if ciphertext.len() < nonce_size + tag_size {
            return Err(CryptoError::aead_error(
                self.algorithm,
                "ciphertext too short",
                error_codes::AEAD_DECRYPTION_FAILED,
            ));
        }

        let (nonce, body) = ciphertext.split_at(nonce_size);
        self.cipher
            .decrypt(
                aes_gcm::aead::Nonce::<C>::from_slice(nonce),
                Payload {
                    msg: body,
                    aad: associated_data,
                },
            )
            .map_err(|_| {
                CryptoError::aead_error(
                    self.algorithm,
                    "authentication failed",
                    error_codes::AEAD_DECRYPTION_FAILED,
                )
            })
    }
}
