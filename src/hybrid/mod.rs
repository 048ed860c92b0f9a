//! Hybrid Public-Key Encryption
//!
//! ECIES over X25519: a per-message ephemeral key agreement feeds HKDF-SHA256,
//! whose output keys an AEAD or deterministic AEAD taken from the registry
//! (the DEM). Which DEM is used is a property of the key, so any registered
//! key type of either kind can serve.
//!
//! HPKE (RFC 9180) in base mode with DHKEM(X25519, HKDF-SHA256), HKDF-SHA256
//! and AES-128-GCM, AES-256-GCM or ChaCha20-Poly1305. The AEAD is fixed by
//! the key's parameters rather than looked up in the registry.
//!
//! Registering this family also registers the AEAD and deterministic AEAD
//! families.

mod config;
mod ecies;
mod ecies_x25519_hkdf_private_key_manager;
mod ecies_x25519_hkdf_public_key_manager;
mod hpke_private_key_manager;
mod hpke_public_key_manager;
mod hpke_x25519;
mod wrapper;

#[cfg(test)]
mod tests;

pub use config::{register, register_with};
pub use ecies::X25519_KEY_SIZE;
pub use ecies_x25519_hkdf_private_key_manager::{
    default_dem, EciesX25519HkdfPrivateKeyManager, ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
};
pub use ecies_x25519_hkdf_public_key_manager::{
    EciesX25519HkdfPublicKeyManager, ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
};
pub use hpke_private_key_manager::{
    default_hpke_params, HpkePrivateKeyManager, HPKE_PRIVATE_KEY_TYPE_URL,
};
pub use hpke_public_key_manager::{HpkePublicKeyManager, HPKE_PUBLIC_KEY_TYPE_URL};
pub use wrapper::{HybridDecryptWrapper, HybridEncryptWrapper};
