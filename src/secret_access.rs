//! Capability token for revealing secret key material
//!
//! Secret key bytes are only reachable through accessors that take a
//! [`SecretKeyAccess`]. The token cannot be constructed outside this module and
//! cannot be cloned; the one instance is handed out by [`SecretKeyAccess::get`]
//! as a `&'static` reference.
//!
//! The token documents intent. It does not protect secrets from hostile code
//! running in the same process.
//!
//! Two kinds of accessors exist:
//!
//! - Accessors taking `&SecretKeyAccess` always require the token. Callers
//!   cannot omit it, so there is nothing to check at run time.
//! - Accessors taking `Option<&SecretKeyAccess>` serve both public and secret
//!   material; they call [`SecretKeyAccess::require`] before revealing secrets,
//!   which turns a missing token into a recoverable
//!   [`CryptoError::AccessDenied`].
//!
//! # Example
//!
//! ```
//! use keyreg::secret_access::SecretKeyAccess;
//!
//! let token = SecretKeyAccess::get();
//! assert!(SecretKeyAccess::require(Some(token)).is_ok());
//! assert!(SecretKeyAccess::require(None).is_err());
//! ```

use std::fmt;

use crate::error::{CryptoError, CryptoResult};

/// Proof that the caller intends to read secret key bytes
pub struct SecretKeyAccess {
    _private: (),
}

static INSTANCE: SecretKeyAccess = SecretKeyAccess { _private: () };

impl SecretKeyAccess {
    /// Returns the process-wide token
    pub fn get() -> &'static SecretKeyAccess {
        &INSTANCE
    }

    /// Returns the token if present, `AccessDenied` otherwise
    ///
    /// Only use this where the API parameter is optional. Where the parameter
    /// is `&SecretKeyAccess`, the compiler already guarantees presence.
    pub fn require(access: Option<&SecretKeyAccess>) -> CryptoResult<&SecretKeyAccess> {
        access.ok_or_else(|| CryptoError::access_denied("SecretKeyAccess::require"))
    }
}

impl fmt::Debug for SecretKeyAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKeyAccess")
    }
}
