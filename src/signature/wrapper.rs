use std::sync::Arc;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::primitive_set::{candidates, PrimitiveSet};
use crate::primitives::{Primitive, PrimitiveKind, PublicKeySign, PublicKeyVerify};
use crate::wrapper::PrimitiveWrapper;

/// Signs with the primary entry and prefixes its output prefix
#[derive(Debug, Default, Clone, Copy)]
pub struct PublicKeySignWrapper;

impl PrimitiveWrapper for PublicKeySignWrapper {
    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::PublicKeySign
    }

    fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive> {
        let primary = set.require_primary()?;
        Ok(Primitive::PublicKeySign(Arc::new(WrappedSign {
            prefix: primary.prefix(),
            signer: primary.primitive.clone().into_public_key_sign()?,
        })))
    }
}

struct WrappedSign {
    prefix: Vec<u8>,
    signer: Arc<dyn PublicKeySign>,
}

impl PublicKeySign for WrappedSign {
    fn sign(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let signature = self.signer.sign(data)?;
        Ok([self.prefix.as_slice(), signature.as_slice()].concat())
    }
}

/// Accepts a signature from any enabled entry of the set
///
/// Verification needs no primary: signatures carrying a prefix are checked
/// against the matching entries, then every raw entry is tried.
#[derive(Debug, Default, Clone, Copy)]
pub struct PublicKeyVerifyWrapper;

impl PrimitiveWrapper for PublicKeyVerifyWrapper {
    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::PublicKeyVerify
    }

    fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive> {
        Ok(Primitive::PublicKeyVerify(Arc::new(WrappedVerify { set })))
    }
}

struct WrappedVerify {
    set: PrimitiveSet,
}

impl PublicKeyVerify for WrappedVerify {
    fn verify(&self, signature: &[u8], data: &[u8]) -> CryptoResult<()> {
        for (entry, raw_signature) in candidates(&self.set, signature) {
            let verifier = entry.primitive.clone().into_public_key_verify()?;
            if verifier.verify(raw_signature, data).is_ok() {
                return Ok(());
            }
        }
        Err(CryptoError::signature_error(
            "verify",
            "no key in the set accepts the signature",
            error_codes::VERIFICATION_FAILED,
        ))
    }
}
