/*!
 * Digital Signatures
 *
 * Ed25519 key managers, registered as an asymmetric pair, and the sign and
 * verify wrappers.
 *
 * # Security Properties
 *
 * 1. Private keys embed their public key; validation checks that they match
 * 2. Seeds are held in zeroizing memory and read only by the key manager
 * 3. Signatures are deterministic (RFC 8032)
 */

mod config;
mod ed25519_private_key_manager;
mod ed25519_public_key_manager;
mod wrapper;

#[cfg(test)]
mod tests;

pub use config::{register, register_with};
pub use ed25519_private_key_manager::{
    Ed25519PrivateKeyManager, ED25519_PRIVATE_KEY_SIZE, ED25519_PRIVATE_KEY_TYPE_URL,
};
pub use ed25519_public_key_manager::{
    Ed25519PublicKeyManager, ED25519_PUBLIC_KEY_SIZE, ED25519_PUBLIC_KEY_TYPE_URL,
    ED25519_SIGNATURE_SIZE,
};
pub use wrapper::{PublicKeySignWrapper, PublicKeyVerifyWrapper};
