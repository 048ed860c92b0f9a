use std::sync::Arc;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::primitive_set::{candidates, PrimitiveSet};
use crate::primitives::{DeterministicAead, Primitive, PrimitiveKind};
use crate::wrapper::PrimitiveWrapper;

/// Combines a set of deterministic AEAD primitives into one
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicAeadWrapper;

impl PrimitiveWrapper for DeterministicAeadWrapper {
    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::DeterministicAead
    }

    fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive> {
        let primary = set.require_primary()?;
        let primary_prefix = primary.prefix();
        let primary = primary.primitive.clone().into_deterministic_aead()?;
        Ok(Primitive::DeterministicAead(Arc::new(WrappedDeterministicAead {
            primary,
            primary_prefix,
            set,
        })))
    }
}

struct WrappedDeterministicAead {
    primary: Arc<dyn DeterministicAead>,
    primary_prefix: Vec<u8>,
    set: PrimitiveSet,
}

impl DeterministicAead for WrappedDeterministicAead {
    fn encrypt_deterministically(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let ciphertext = self
            .primary
            .encrypt_deterministically(plaintext, associated_data)?;
        Ok([self.primary_prefix.as_slice(), ciphertext.as_slice()].concat())
    }

    fn decrypt_deterministically(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        for (entry, payload) in candidates(&self.set, ciphertext) {
            let daead = entry.primitive.clone().into_deterministic_aead()?;
            if let Ok(plaintext) = daead.decrypt_deterministically(payload, associated_data) {
                return Ok(plaintext);
            }
        }
        Err(CryptoError::aead_error(
            "decrypt_deterministically",
            "no key in the set decrypts the ciphertext",
            error_codes::AEAD_DECRYPTION_FAILED,
        ))
    }
}
