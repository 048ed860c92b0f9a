use super::{
    Ed25519PrivateKeyManager, Ed25519PublicKeyManager, PublicKeySignWrapper,
    PublicKeyVerifyWrapper,
};
use crate::error::CryptoResult;
use crate::registry::{self, Registry};

/// Register the signature family with the process-wide registry
pub fn register() -> CryptoResult<()> {
    register_with(registry::global())
}

/// Register the signature family with `registry`
///
/// Both wrappers are always registered. The Ed25519 pair is not certified and
/// is withheld in restricted compliance mode.
pub fn register_with(registry: &Registry) -> CryptoResult<()> {
    registry.transaction(|tx| {
        tx.register_wrapper(PublicKeySignWrapper)?;
        tx.register_wrapper(PublicKeyVerifyWrapper)?;

        if tx.compliance_mode().is_restricted() {
            log::info!("restricted mode: withholding Ed25519");
            return Ok(());
        }
        tx.register_asymmetric_key_pair(Ed25519PrivateKeyManager, Ed25519PublicKeyManager, true)
    })?;

    log::debug!("signature family registered");
    Ok(())
}
