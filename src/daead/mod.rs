//! Deterministic Authenticated Encryption
//!
//! AES-SIV (RFC 5297): the same plaintext and associated data under the same
//! key always yield the same ciphertext. Useful for encrypted lookup keys;
//! leaks equality of plaintexts by construction.

mod aes_siv_key_manager;
mod config;
mod wrapper;


pub use aes_siv_key_manager::{
    AesSiv, AesSivKeyManager, AES_SIV_KEY_SIZE, AES_SIV_TYPE_URL, SIV_SIZE,
};
pub use config::{register, register_with};
pub use wrapper::DeterministicAeadWrapper;
