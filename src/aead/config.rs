use super::{AeadWrapper, AesGcmKeyManager, ChaCha20Poly1305KeyManager};
use crate::error::CryptoResult;
use crate::registry::{self, Registry};

/// Register the AEAD family with the process-wide registry
pub fn register() -> CryptoResult<()> {
    register_with(registry::global())
}

/// Register the AEAD family with `registry`
///
/// Idempotent. In restricted compliance mode only AES-GCM is registered.
pub fn register_with(registry: &Registry) -> CryptoResult<()> {
    registry.transaction(|tx| {
        tx.register_wrapper(AeadWrapper)?;
        tx.register_key_manager(AesGcmKeyManager, true)?;

        if tx.compliance_mode().is_restricted() {
            log::info!("restricted mode: withholding ChaCha20-Poly1305");
            return Ok(());
        }
        tx.register_key_manager(ChaCha20Poly1305KeyManager, true)
    })?;

    log::debug!("AEAD family registered");
    Ok(())
}
