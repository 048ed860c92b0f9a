/*!
 * Authenticated Encryption with Associated Data
 *
 * Key managers for AES-256-GCM and ChaCha20-Poly1305, the AEAD wrapper and
 * the family's registration entry points.
 *
 * # Example
 *
 * ```
 * use keyreg::compliance::ComplianceMode;
 * use keyreg::key::{KeyFormat, OutputPrefixType};
 * use keyreg::primitive_set::PrimitiveSet;
 * use keyreg::primitives::PrimitiveKind;
 * use keyreg::registry::Registry;
 *
 * let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
 * keyreg::aead::register_with(&registry).unwrap();
 *
 * let key = registry
 *     .new_key_data(keyreg::aead::AES_GCM_TYPE_URL, &KeyFormat::new())
 *     .unwrap();
 * let entry = registry
 *     .primitive_entry(&key, PrimitiveKind::Aead, 1, OutputPrefixType::Tink)
 *     .unwrap();
 * let mut set = PrimitiveSet::new(PrimitiveKind::Aead);
 * set.add_primary(entry).unwrap();
 *
 * let aead = registry.wrap(set).unwrap().into_aead().unwrap();
 * let ciphertext = aead.encrypt(b"message", b"context").unwrap();
 * assert_eq!(aead.decrypt(&ciphertext, b"context").unwrap(), b"message");
 * ```
 */

mod aes_gcm_key_manager;
mod chacha20poly1305_key_manager;
mod cipher;
mod config;
mod wrapper;


pub use aes_gcm_key_manager::{AesGcmKeyManager, AES_GCM_KEY_SIZE, AES_GCM_TYPE_URL};
pub use chacha20poly1305_key_manager::{
    ChaCha20Poly1305KeyManager, CHACHA20_POLY1305_KEY_SIZE, CHACHA20_POLY1305_TYPE_URL,
};
pub use config::{register, register_with};
pub use wrapper::AeadWrapper;
