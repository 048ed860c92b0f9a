use std::sync::Arc;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::primitive_set::{candidates, PrimitiveSet};
use crate::primitives::{Aead, Primitive, PrimitiveKind};
use crate::wrapper::PrimitiveWrapper;

/// Combines a set of AEAD primitives into one
///
/// Encryption uses the primary entry and prepends its output prefix.
/// Decryption tries every enabled entry whose prefix matches, then every raw
/// entry, and returns the first plaintext that authenticates.
#[derive(Debug, Default, Clone, Copy)]
pub struct AeadWrapper;

impl PrimitiveWrapper for AeadWrapper {
    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::Aead
    }

    fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive> {
        let primary = set.require_primary()?;
        let primary_prefix = primary.prefix();
        let primary = primary.primitive.clone().into_aead()?;
        Ok(Primitive::Aead(Arc::new(WrappedAead {
            primary,
            primary_prefix,
            set,
        })))
    }
}

struct WrappedAead {
    primary: Arc<dyn Aead>,
    primary_prefix: Vec<u8>,
    set: PrimitiveSet,
}

impl Aead for WrappedAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> CryptoResult<Vec<u8>> {
        let ciphertext = self.primary.encrypt(plaintext, associated_data)?;
        let mut output = Vec::with_capacity(self.primary_prefix.len() + ciphertext.len());
        output.extend_from_slice(&self.primary_prefix);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> CryptoResult<Vec<u8>> {
        for (entry, payload) in candidates(&self.set, ciphertext) {
            let aead = entry.primitive.clone().into_aead()?;
            match aead.decrypt(payload, associated_data) {
                Ok(plaintext) => return Ok(plaintext),
                Err(_) => log::debug!("AEAD key {} did not decrypt", entry.key_id),
            }
        }
        Err(CryptoError::aead_error(
            "decrypt",
            "no key in the set decrypts the ciphertext",
            error_codes::AEAD_DECRYPTION_FAILED,
        ))
    }
}
