use super::{AesSivKeyManager, DeterministicAeadWrapper};
use crate::error::CryptoResult;
use crate::registry::{self, Registry};

/// Register the deterministic AEAD family with the process-wide registry
pub fn register() -> CryptoResult<()> {
    register_with(registry::global())
}

/// Register the deterministic AEAD family with `registry`
///
/// The wrapper is always registered. The AES-SIV manager is not
/// certified and is withheld in restricted compliance mode.
pub fn register_with(registry: &Registry) -> CryptoResult<()> {
    registry.transaction(|tx| {
        tx.register_wrapper(DeterministicAeadWrapper)?;

        if tx.compliance_mode().is_restricted() {
            log::info!("restricted mode: withholding AES-SIV");
            return Ok(());
        }
        tx.register_key_manager(AesSivKeyManager, true)
    })?;

    log::debug!("deterministic AEAD family registered");
    Ok(())
}
