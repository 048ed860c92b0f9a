//! Primitive interfaces produced by key managers
//!
//! Each interface is a trait object behind an `Arc` so that one primitive can
//! be shared by several wrapped sets and threads. [`Primitive`] is the
//! type-erased form the registry passes around; [`PrimitiveKind`] names the
//! interface and keys the wrapper table.

use std::fmt;
use std::sync::Arc;

use crate::error::{CryptoError, CryptoResult};

/// Authenticated encryption with associated data
pub trait Aead: Send + Sync {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> CryptoResult<Vec<u8>>;
    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> CryptoResult<Vec<u8>>;
}

/// Deterministic authenticated encryption
pub trait DeterministicAead: Send + Sync {
    fn encrypt_deterministically(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>>;
    fn decrypt_deterministically(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> CryptoResult<Vec<u8>>;
}

/// Public-key encryption of arbitrary-length messages
pub trait HybridEncrypt: Send + Sync {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>>;
}

pub trait HybridDecrypt: Send + Sync {
    fn decrypt(&self, ciphertext: &[u8], context_info: &[u8]) -> CryptoResult<Vec<u8>>;
}

pub trait PublicKeySign: Send + Sync {
    fn sign(&self, data: &[u8]) -> CryptoResult<Vec<u8>>;
}

pub trait PublicKeyVerify: Send + Sync {
    fn verify(&self, signature: &[u8], data: &[u8]) -> CryptoResult<()>;
}

/// Names a primitive interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Aead,
    DeterministicAead,
    HybridEncrypt,
    HybridDecrypt,
    PublicKeySign,
    PublicKeyVerify,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Aead => "Aead",
            PrimitiveKind::DeterministicAead => "DeterministicAead",
            PrimitiveKind::HybridEncrypt => "HybridEncrypt",
            PrimitiveKind::HybridDecrypt => "HybridDecrypt",
            PrimitiveKind::PublicKeySign => "PublicKeySign",
            PrimitiveKind::PublicKeyVerify => "PublicKeyVerify",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive of any kind
#[derive(Clone)]
pub enum Primitive {
    Aead(Arc<dyn Aead>),
    DeterministicAead(Arc<dyn DeterministicAead>),
    HybridEncrypt(Arc<dyn HybridEncrypt>),
    HybridDecrypt(Arc<dyn HybridDecrypt>),
    PublicKeySign(Arc<dyn PublicKeySign>),
    PublicKeyVerify(Arc<dyn PublicKeyVerify>),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Aead(_) => PrimitiveKind::Aead,
            Primitive::DeterministicAead(_) => PrimitiveKind::DeterministicAead,
            Primitive::HybridEncrypt(_) => PrimitiveKind::HybridEncrypt,
            Primitive::HybridDecrypt(_) => PrimitiveKind::HybridDecrypt,
            Primitive::PublicKeySign(_) => PrimitiveKind::PublicKeySign,
            Primitive::PublicKeyVerify(_) => PrimitiveKind::PublicKeyVerify,
        }
    }

    pub fn into_aead(self) -> CryptoResult<Arc<dyn Aead>> {
        match self {
            Primitive::Aead(p) => Ok(p),
            other => Err(mismatch(PrimitiveKind::Aead, other.kind())),
        }
    }

    pub fn into_deterministic_aead(self) -> CryptoResult<Arc<dyn DeterministicAead>> {
        match self {
            Primitive::DeterministicAead(p) => Ok(p),
            other => Err(mismatch(PrimitiveKind::DeterministicAead, other.kind())),
        }
    }

    pub fn into_hybrid_encrypt(self) -> CryptoResult<Arc<dyn HybridEncrypt>> {
        match self {
            Primitive::HybridEncrypt(p) => Ok(p),
            other => Err(mismatch(PrimitiveKind::HybridEncrypt, other.kind())),
        }
    }

    pub fn into_hybrid_decrypt(self) -> CryptoResult<Arc<dyn HybridDecrypt>> {
        match self {
            Primitive::HybridDecrypt(p) => Ok(p),
            other => Err(mismatch(PrimitiveKind::HybridDecrypt, other.kind())),
        }
    }

    pub fn into_public_key_sign(self) -> CryptoResult<Arc<dyn PublicKeySign>> {
        match self {
            Primitive::PublicKeySign(p) => Ok(p),
            other => Err(mismatch(PrimitiveKind::PublicKeySign, other.kind())),
        }
    }

    pub fn into_public_key_verify(self) -> CryptoResult<Arc<dyn PublicKeyVerify>> {
        match self {
            Primitive::PublicKeyVerify(p) => Ok(p),
            other => Err(mismatch(PrimitiveKind::PublicKeyVerify, other.kind())),
        }
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive::{}", self.kind())
    }
}

fn mismatch(expected: PrimitiveKind, actual: PrimitiveKind) -> CryptoError {
    CryptoError::invalid_parameter("primitive", expected.name(), actual.name())
}
