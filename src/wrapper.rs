//! Primitive wrapper interface
//!
//! A wrapper turns a [`PrimitiveSet`] into one primitive of the same
//! interface. It sees only resolved primitives and their key set metadata,
//! never keys or key types. The registry holds exactly one wrapper per
//! [`PrimitiveKind`].

use crate::error::CryptoResult;
use crate::primitive_set::PrimitiveSet;
use crate::primitives::{Primitive, PrimitiveKind};

pub trait PrimitiveWrapper: Send + Sync {
    /// Interface this wrapper combines
    fn primitive_kind(&self) -> PrimitiveKind;

    /// Combine the set into one primitive
    fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive>;
}
