use std::sync::Arc;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::primitive_set::{candidates, PrimitiveSet};
use crate::primitives::{HybridDecrypt, HybridEncrypt, Primitive, PrimitiveKind};
use crate::wrapper::PrimitiveWrapper;

/// Encrypts to the primary entry's public key
#[derive(Debug, Default, Clone, Copy)]
pub struct HybridEncryptWrapper;

impl PrimitiveWrapper for HybridEncryptWrapper {
    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::HybridEncrypt
    }

    fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive> {
        let primary = set.require_primary()?;
        Ok(Primitive::HybridEncrypt(Arc::new(WrappedHybridEncrypt {
            prefix: primary.prefix(),
            inner: primary.primitive.clone().into_hybrid_encrypt()?,
        })))
    }
}

struct WrappedHybridEncrypt {
    prefix: Vec<u8>,
    inner: Arc<dyn HybridEncrypt>,
}

impl HybridEncrypt for WrappedHybridEncrypt {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>> {
        let ciphertext = self.inner.encrypt(plaintext, context_info)?;
        Ok([self.prefix.as_slice(), ciphertext.as_slice()].concat())
    }
}

/// Decrypts with whichever entry of the set accepts the ciphertext
#[derive(Debug, Default, Clone, Copy)]
pub struct HybridDecryptWrapper;

impl PrimitiveWrapper for HybridDecryptWrapper {
    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::HybridDecrypt
    }

    fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive> {
        Ok(Primitive::HybridDecrypt(Arc::new(WrappedHybridDecrypt { set })))
    }
}

struct WrappedHybridDecrypt {
    set: PrimitiveSet,
}

impl HybridDecrypt for WrappedHybridDecrypt {
    fn decrypt(&self, ciphertext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>> {
        for (entry, payload) in candidates(&self.set, ciphertext) {
            let decrypter = entry.primitive.clone().into_hybrid_decrypt()?;
            if let Ok(plaintext) = decrypter.decrypt(payload, context_info) {
                return Ok(plaintext);
            }
        }
        Err(CryptoError::aead_error(
            "hybrid decrypt",
            "no key in the set decrypts the ciphertext",
            error_codes::HYBRID_DECRYPTION_FAILED,
        ))
    }
}
