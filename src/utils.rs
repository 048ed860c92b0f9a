/*!
 * Shared helpers for the key managers
 */

use hkdf::Hkdf;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{CryptoError, CryptoResult};
use crate::secure_memory::SecretBytes;

/// Fill a fresh buffer with OS randomness
pub fn random_bytes(length: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// HKDF-SHA256 extract-and-expand into `length` secret bytes
///
/// # Arguments
///
/// * `ikm` - Input keying material
/// * `salt` - Optional salt; `None` uses the all-zero salt
/// * `info` - Context bound into the output
/// * `length` - Output size, at most 255 * 32 bytes
pub fn hkdf_sha256(
    ikm: &[u8],
    salt: Option<&[u8]>,
    info: &[u8],
    length: usize,
) -> CryptoResult<SecretBytes> {
    let hk = Hkdf::<Sha256>::new(salt, ikm);
    let mut okm = SecretBytes::from_vec(vec![0u8; length]);
    hk.expand(info, okm.expose_mut()).map_err(|_| {
        CryptoError::invalid_parameter(
            "length",
            "at most 8160 bytes",
            &length.to_string(),
        )
    })?;
    Ok(okm)
}

/// Compare two byte strings without leaking where they differ
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
