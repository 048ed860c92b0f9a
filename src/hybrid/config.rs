use super::{
    EciesX25519HkdfPrivateKeyManager, EciesX25519HkdfPublicKeyManager, HpkePrivateKeyManager,
    HpkePublicKeyManager, HybridDecryptWrapper, HybridEncryptWrapper,
};
use crate::error::CryptoResult;
use crate::registry::{self, Registry};
use crate::{aead, daead};

/// Register the hybrid encryption family with the process-wide registry
pub fn register() -> CryptoResult<()> {
    register_with(registry::global())
}

/// Register the hybrid encryption family with `registry`
///
/// Order: the hybrid wrappers, then the AEAD and deterministic AEAD families
/// (ECIES keys resolve their DEM through them), then the ECIES and HPKE
/// pairs. Each step commits on its own; the two pairs commit together. No
/// hybrid scheme is certified, so in restricted compliance mode the pairs are
/// skipped and only the wrappers and the certified dependencies remain.
pub fn register_with(registry: &Registry) -> CryptoResult<()> {
    registry.transaction(|tx| {
        tx.register_wrapper(HybridDecryptWrapper)?;
        tx.register_wrapper(HybridEncryptWrapper)
    })?;

    aead::register_with(registry)?;
    daead::register_with(registry)?;

    if registry.compliance_mode().is_restricted() {
        log::info!("restricted mode: withholding ECIES-X25519-HKDF and HPKE");
        return Ok(());
    }

    registry.transaction(|tx| {
        tx.register_asymmetric_key_pair(
            EciesX25519HkdfPrivateKeyManager::new(registry),
            EciesX25519HkdfPublicKeyManager::new(registry),
            true,
        )?;
        tx.register_asymmetric_key_pair(HpkePrivateKeyManager, HpkePublicKeyManager, true)
    })?;

    log::debug!("hybrid family registered");
    Ok(())
}
