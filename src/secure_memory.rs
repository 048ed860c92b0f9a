//! Secure Memory Handling for Key Material
//!
//! This module provides [`SecretBytes`], the container every key manager uses
//! for secret key values. The contents are zeroed when dropped, never shown by
//! `Debug`, compared in constant time, and can only be read by presenting a
//! [`SecretKeyAccess`] token.

use std::fmt;
use std::io::{ErrorKind, Read};

use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::secret_access::SecretKeyAccess;

/// Secret byte string that is zeroed on drop
///
/// # Security Properties
///
/// 1. Automatically zeroes memory when dropped
/// 2. Prevents contents from being inadvertently logged or displayed
/// 3. Reading the bytes requires a [`SecretKeyAccess`] token
/// 4. Equality is evaluated in constant time
///
/// # Example
///
/// ```
/// use keyreg::secret_access::SecretKeyAccess;
/// use keyreg::secure_memory::SecretBytes;
///
/// let secret = SecretBytes::new(&[0x01, 0x02, 0x03, 0x04], SecretKeyAccess::get());
/// assert_eq!(secret.len(), 4);
/// assert_eq!(secret.to_bytes(SecretKeyAccess::get()), &[0x01, 0x02, 0x03, 0x04]);
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes {
    bytes: Vec<u8>,
}

impl SecretBytes {
    /// Copy `data` into a new secret container
    ///
    /// Wrapping caller-supplied bytes as a secret is itself a secret-handling
    /// operation, so the token is required here as well.
    pub fn new(data: &[u8], _access: &SecretKeyAccess) -> Self {
        Self {
            bytes: data.to_vec(),
        }
    }

    /// Generate `length` bytes from the operating system RNG
    pub fn random(length: usize) -> Self {
        let mut bytes = vec![0u8; length];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Take ownership of bytes produced inside the crate
    pub(crate) fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read the secret bytes
    pub fn to_bytes(&self, _access: &SecretKeyAccess) -> &[u8] {
        &self.bytes
    }

    /// Crate-internal read used by the key managers themselves
    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn expose_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for SecretBytes {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.len() == other.bytes.len() && bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl Eq for SecretBytes {}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBytes")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Read exactly `length` bytes of key material from `stream`
///
/// The stream may return fewer bytes than requested on each call; reading
/// continues until `length` bytes are collected. A stream that ends early
/// yields [`CryptoError::InsufficientRandomness`].
pub fn read_exact_secret<R: Read + ?Sized>(
    stream: &mut R,
    length: usize,
) -> CryptoResult<SecretBytes> {
    let mut buffer = SecretBytes::from_vec(vec![0u8; length]);
    let mut filled = 0;

    while filled < length {
        match stream.read(&mut buffer.bytes[filled..]) {
            Ok(0) => {
                return Err(CryptoError::InsufficientRandomness {
                    needed: length,
                    available: filled,
                    error_code: error_codes::INSUFFICIENT_RANDOMNESS,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                log::debug!("randomness stream failed after {} bytes: {}", filled, e);
                return Err(CryptoError::InsufficientRandomness {
                    needed: length,
                    available: filled,
                    error_code: error_codes::INSUFFICIENT_RANDOMNESS,
                });
            }
        }
    }

    Ok(buffer)
}
