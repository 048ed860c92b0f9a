/*!
 * keyreg: Key Manager Registry
 *
 * A registry that maps key type URLs to key managers and primitive interfaces
 * to wrappers, so that independently written algorithm families plug into
 * one lookup table and compose into usable primitives.
 *
 * - Secret key bytes are reachable only by presenting a [`SecretKeyAccess`]
 *   token.
 * - A compliance mode, fixed at startup, keeps non-certified algorithms out
 *   of the registry entirely.
 * - Registration is idempotent and append-only; a silently substituted
 *   implementation is rejected.
 *
 * The bundled families are:
 *
 * - [`aead`]: AES-256-GCM, ChaCha20-Poly1305
 * - [`daead`]: AES-SIV
 * - [`signature`]: Ed25519
 * - [`hybrid`]: ECIES over X25519 with HKDF-SHA256 and a registry-resolved DEM;
 *   HPKE with DHKEM(X25519, HKDF-SHA256)
 */

/// Authenticated encryption family
pub mod aead;

/// Compliance (FIPS) mode
pub mod compliance;

/// Deterministic authenticated encryption family
pub mod daead;

/// Common error types
pub mod error;

/// Hybrid public-key encryption family
pub mod hybrid;

/// Keys, key formats and key templates
pub mod key;

/// The per key type manager interface
pub mod key_manager;

/// Primitive sets handed to wrappers
pub mod primitive_set;

/// Primitive interfaces
pub mod primitives;

/// Key manager and wrapper registry
pub mod registry;

/// Capability token for secret key material
pub mod secret_access;

/// Secure memory handling utilities
pub mod secure_memory;

/// Digital signature family
pub mod signature;

/// Named key templates
pub mod templates;

/// Utilities for key managers
pub mod utils;

/// Primitive wrapper interface
pub mod wrapper;

pub use error::{CryptoError, CryptoResult};
pub use registry::Registry;
pub use secret_access::SecretKeyAccess;

/// Register every bundled family with the process-wide registry
///
/// Safe to call repeatedly. A family that fails to register is reported as
/// [`CryptoError::Initialization`]; families registered before it stay
/// registered in full.
///
/// # Example
///
/// ```
/// use keyreg::prelude::*;
///
/// fn main() -> Result<(), CryptoError> {
///     init()?;
///     let manager = keyreg::registry::global().key_manager(keyreg::aead::AES_GCM_TYPE_URL)?;
///     assert_eq!(manager.key_type(), keyreg::aead::AES_GCM_TYPE_URL);
///     Ok(())
/// }
/// ```
pub fn init() -> CryptoResult<()> {
    init_with(registry::global())
}

/// Register every bundled family with `registry`
pub fn init_with(registry: &Registry) -> CryptoResult<()> {
    aead::register_with(registry).map_err(|e| CryptoError::initialization("aead", e))?;
    daead::register_with(registry).map_err(|e| CryptoError::initialization("daead", e))?;
    signature::register_with(registry)
        .map_err(|e| CryptoError::initialization("signature", e))?;
    hybrid::register_with(registry).map_err(|e| CryptoError::initialization("hybrid", e))?;

    log::info!(
        "registered {} key types in {} mode",
        registry.registered_key_types().len(),
        registry.compliance_mode()
    );
    Ok(())
}

/// The types most callers need
pub mod prelude {
    pub use crate::compliance::ComplianceMode;
    pub use crate::init;
    pub use crate::key::{Key, KeyFormat, KeyTemplate, OutputPrefixType};
    pub use crate::key_manager::{KeyManager, PrivateKeyManager};
    pub use crate::primitive_set::{PrimitiveEntry, PrimitiveSet};
    pub use crate::primitives::{
        Aead, DeterministicAead, HybridDecrypt, HybridEncrypt, Primitive, PrimitiveKind,
        PublicKeySign, PublicKeyVerify,
    };
    pub use crate::registry::Registry;
    pub use crate::secret_access::SecretKeyAccess;
    pub use crate::CryptoError;
    pub use crate::CryptoResult;
}
