//! Resolved primitives together with their key set position
//!
//! Wrappers never see keys. They receive a [`PrimitiveSet`]: the primitives of
//! one interface, each tagged with its key id, status and output prefix, and at
//! most one of them marked primary.

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::OutputPrefixType;
use crate::primitives::{Primitive, PrimitiveKind};

/// Size of the `0x01 || key_id` prefix on non-raw outputs
pub const NON_RAW_PREFIX_SIZE: usize = 5;

/// First byte of a non-raw output prefix
pub const TINK_START_BYTE: u8 = 0x01;

/// Whether a key set entry may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Enabled,
    Disabled,
}

/// The output prefix for a key id
pub fn output_prefix(key_id: u32, prefix_type: OutputPrefixType) -> Vec<u8> {
    match prefix_type {
        OutputPrefixType::Raw => Vec::new(),
        OutputPrefixType::Tink => {
            let mut prefix = Vec::with_capacity(NON_RAW_PREFIX_SIZE);
            prefix.push(TINK_START_BYTE);
            prefix.extend_from_slice(&key_id.to_be_bytes());
            prefix
        }
    }
}

/// One primitive and its metadata
#[derive(Debug, Clone)]
pub struct PrimitiveEntry {
    pub primitive: Primitive,
    pub key_id: u32,
    pub status: KeyStatus,
    pub output_prefix: OutputPrefixType,
    pub type_url: String,
}

impl PrimitiveEntry {
    pub fn new(
        primitive: Primitive,
        key_id: u32,
        output_prefix: OutputPrefixType,
        type_url: &str,
    ) -> Self {
        Self {
            primitive,
            key_id,
            status: KeyStatus::Enabled,
            output_prefix,
            type_url: type_url.to_string(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.status = KeyStatus::Disabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.status == KeyStatus::Enabled
    }

    /// Prefix this entry puts in front of its outputs
    pub fn prefix(&self) -> Vec<u8> {
        output_prefix(self.key_id, self.output_prefix)
    }
}

/// Primitives of one interface plus the primary selection
#[derive(Debug, Clone)]
pub struct PrimitiveSet {
    kind: PrimitiveKind,
    entries: Vec<PrimitiveEntry>,
    primary: Option<usize>,
}

impl PrimitiveSet {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            primary: None,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Add an entry; its primitive must be of the set's kind
    pub fn add(&mut self, entry: PrimitiveEntry) -> CryptoResult<()> {
        if entry.primitive.kind() != self.kind {
            return Err(CryptoError::invalid_parameter(
                "primitive",
                self.kind.name(),
                entry.primitive.kind().name(),
            ));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Add an entry and make it the primary
    pub fn add_primary(&mut self, entry: PrimitiveEntry) -> CryptoResult<()> {
        self.add(entry)?;
        self.primary = Some(self.entries.len() - 1);
        Ok(())
    }

    /// Make the first entry with `key_id` the primary
    pub fn set_primary(&mut self, key_id: u32) -> CryptoResult<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.key_id == key_id)
            .ok_or_else(|| CryptoError::InvalidParameter {
                parameter: "key_id".to_string(),
                expected: "id of an entry in the set".to_string(),
                actual: key_id.to_string(),
                error_code: error_codes::NO_MATCHING_KEY,
            })?;
        self.primary = Some(index);
        Ok(())
    }

    /// The primary entry, if one is set and enabled
    pub fn primary(&self) -> Option<&PrimitiveEntry> {
        self.primary
            .and_then(|i| self.entries.get(i))
            .filter(|e| e.is_enabled())
    }

    /// The primary entry or `NoPrimaryKey`
    pub fn require_primary(&self) -> CryptoResult<&PrimitiveEntry> {
        self.primary()
            .ok_or_else(|| CryptoError::no_primary_key(self.kind.name()))
    }

    /// Enabled entries whose non-empty prefix equals `prefix`
    pub fn entries_with_prefix<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> impl Iterator<Item = &'a PrimitiveEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.is_enabled() && e.output_prefix != OutputPrefixType::Raw)
            .filter(move |e| e.prefix().as_slice() == prefix)
    }

    /// Enabled entries without an output prefix
    pub fn raw_entries(&self) -> impl Iterator<Item = &PrimitiveEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_enabled() && e.output_prefix == OutputPrefixType::Raw)
    }

    pub fn entries(&self) -> &[PrimitiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Candidate entries for an input: prefix matches first, then raw entries
///
/// Returns pairs of entry and the input with the prefix removed.
pub(crate) fn candidates<'a>(
    set: &'a PrimitiveSet,
    input: &'a [u8],
) -> Vec<(&'a PrimitiveEntry, &'a [u8])> {
    let mut found = Vec::new();
    if input.len() > NON_RAW_PREFIX_SIZE {
        let (prefix, rest) = input.split_at(NON_RAW_PREFIX_SIZE);
        found.extend(set.entries_with_prefix(prefix).map(|e| (e, rest)));
    }
    found.extend(set.raw_entries().map(|e| (e, input)));
    found
}
