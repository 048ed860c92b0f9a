use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use arc_swap::ArcSwap;

use crate::compliance::{self, ComplianceMode};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{Key, KeyFormat, KeyMaterialType, KeyTemplate, OutputPrefixType};
use crate::key_manager::{KeyManager, PrivateKeyManager};
use crate::primitive_set::{PrimitiveEntry, PrimitiveSet};
use crate::primitives::{Primitive, PrimitiveKind};
use crate::wrapper::PrimitiveWrapper;

/// Stable identity of a registered implementation type
///
/// Two registrations are the same implementation exactly when their tags are
/// equal.
#[derive(Debug, Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

/// A registered key manager and its registration flags
#[derive(Clone)]
pub struct KeyManagerEntry {
    manager: Arc<dyn KeyManager>,
    private_manager: Option<Arc<dyn PrivateKeyManager>>,
    tag: TypeTag,
    new_key_allowed: bool,
    key_material_type: KeyMaterialType,
    paired_type: Option<String>,
}

impl KeyManagerEntry {
    pub fn type_url(&self) -> &str {
        self.manager.key_type()
    }

    pub fn manager(&self) -> Arc<dyn KeyManager> {
        Arc::clone(&self.manager)
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn new_key_allowed(&self) -> bool {
        self.new_key_allowed
    }

    pub fn key_material_type(&self) -> KeyMaterialType {
        self.key_material_type
    }

    /// Type URL of the other half of an asymmetric pair
    pub fn paired_type(&self) -> Option<&str> {
        self.paired_type.as_deref()
    }
}

impl fmt::Debug for KeyManagerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManagerEntry")
            .field("type_url", &self.type_url())
            .field("manager", &self.tag.name())
            .field("new_key_allowed", &self.new_key_allowed)
            .field("key_material_type", &self.key_material_type)
            .field("paired_type", &self.paired_type)
            .finish()
    }
}

#[derive(Clone)]
struct WrapperEntry {
    wrapper: Arc<dyn PrimitiveWrapper>,
    tag: TypeTag,
}

#[derive(Clone, Default)]
struct RegistryState {
    key_managers: HashMap<String, KeyManagerEntry>,
    wrappers: HashMap<PrimitiveKind, WrapperEntry>,
}

struct RegistryInner {
    state: ArcSwap<RegistryState>,
    write_lock: Mutex<()>,
    compliance_mode: ComplianceMode,
}

/// Registry of key managers and primitive wrappers
///
/// Cloning is cheap and yields a handle to the same registry.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

/// Non-owning handle to a [`Registry`]
///
/// Key managers that need to resolve other key types hold one of these so the
/// registry does not keep itself alive through its own entries.
#[derive(Clone)]
pub struct WeakRegistry {
    inner: Weak<RegistryInner>,
}

impl WeakRegistry {
    pub fn upgrade(&self) -> Option<Registry> {
        self.inner.upgrade().map(|inner| Registry { inner })
    }
}

impl fmt::Debug for WeakRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRegistry")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Registry {
    /// An empty registry in the process compliance mode
    pub fn new() -> Self {
        Self::with_compliance_mode(compliance::mode())
    }

    /// An empty registry in an explicit compliance mode
    pub fn with_compliance_mode(compliance_mode: ComplianceMode) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                state: ArcSwap::from_pointee(RegistryState::default()),
                write_lock: Mutex::new(()),
                compliance_mode,
            }),
        }
    }

    pub fn compliance_mode(&self) -> ComplianceMode {
        self.inner.compliance_mode
    }

    pub fn downgrade(&self) -> WeakRegistry {
        WeakRegistry {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Stage several registrations and publish them together
    ///
    /// Nothing becomes visible unless `f` succeeds. Registrations are
    /// serialized; lookups keep reading the previous state meanwhile.
    pub fn transaction<T, F>(&self, f: F) -> CryptoResult<T>
    where
        F: FnOnce(&mut RegistryTransaction) -> CryptoResult<T>,
    {
        // The lock guards no data of its own, so a poisoned lock is still usable.
        let _guard = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut tx = RegistryTransaction {
            state: RegistryState::clone(&self.inner.state.load()),
            compliance_mode: self.inner.compliance_mode,
            changed: false,
        };
        let result = f(&mut tx)?;
        if tx.changed {
            self.inner.state.store(Arc::new(tx.state));
        }
        Ok(result)
    }

    /// Register a symmetric or remote key manager
    pub fn register_key_manager<M>(&self, manager: M, new_key_allowed: bool) -> CryptoResult<()>
    where
        M: KeyManager + 'static,
    {
        self.transaction(|tx| tx.register_key_manager(manager, new_key_allowed))
    }

    /// Register the private and public halves of an asymmetric key type at once
    pub fn register_asymmetric_key_pair<P, Q>(
        &self,
        private_manager: P,
        public_manager: Q,
        new_key_allowed: bool,
    ) -> CryptoResult<()>
    where
        P: PrivateKeyManager + 'static,
        Q: KeyManager + 'static,
    {
        self.transaction(|tx| {
            tx.register_asymmetric_key_pair(private_manager, public_manager, new_key_allowed)
        })
    }

    pub fn register_wrapper<W>(&self, wrapper: W) -> CryptoResult<()>
    where
        W: PrimitiveWrapper + 'static,
    {
        self.transaction(|tx| tx.register_wrapper(wrapper))
    }

    /// The registration entry for `type_url`
    pub fn key_manager_entry(&self, type_url: &str) -> CryptoResult<KeyManagerEntry> {
        self.inner
            .state
            .load()
            .key_managers
            .get(type_url)
            .cloned()
            .ok_or_else(|| CryptoError::unknown_key_type(type_url))
    }

    /// The key manager for `type_url`
    pub fn key_manager(&self, type_url: &str) -> CryptoResult<Arc<dyn KeyManager>> {
        Ok(self.key_manager_entry(type_url)?.manager)
    }

    pub fn is_registered(&self, type_url: &str) -> bool {
        self.inner.state.load().key_managers.contains_key(type_url)
    }

    pub fn new_key_allowed(&self, type_url: &str) -> CryptoResult<bool> {
        Ok(self.key_manager_entry(type_url)?.new_key_allowed)
    }

    /// All registered type URLs, sorted
    pub fn registered_key_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .inner
            .state
            .load()
            .key_managers
            .keys()
            .cloned()
            .collect();
        types.sort();
        types
    }

    /// All primitive interfaces with a wrapper, sorted
    pub fn registered_primitive_kinds(&self) -> Vec<PrimitiveKind> {
        let mut kinds: Vec<PrimitiveKind> =
            self.inner.state.load().wrappers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Generate a new key of type `type_url`
    pub fn new_key_data(&self, type_url: &str, format: &KeyFormat) -> CryptoResult<Key> {
        let entry = self.generation_entry(type_url)?;
        entry.manager.validate_key_format(format)?;
        entry.manager.create_key(format)
    }

    pub fn new_key_data_from_template(&self, template: &KeyTemplate) -> CryptoResult<Key> {
        self.new_key_data(&template.type_url, &template.format)
    }

    /// Derive a key of type `type_url` from `randomness`
    ///
    /// The stream is read without holding any registry lock.
    pub fn derive_key(
        &self,
        type_url: &str,
        format: &KeyFormat,
        randomness: &mut dyn Read,
    ) -> CryptoResult<Key> {
        let entry = self.generation_entry(type_url)?;
        entry.manager.derive_key(format, randomness)
    }

    pub fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        self.key_manager(key.type_url())?.validate_key(key)
    }

    /// Extract the public key from a private key
    pub fn public_key_data(&self, private_key: &Key) -> CryptoResult<Key> {
        let entry = self.key_manager_entry(private_key.type_url())?;
        let private_manager = entry.private_manager.ok_or_else(|| {
            CryptoError::invalid_parameter(
                "private_key",
                "key of an ASYMMETRIC_PRIVATE type",
                &entry.key_material_type.to_string(),
            )
        })?;
        private_manager.validate_key(private_key)?;
        private_manager.public_key(private_key)
    }

    /// Validate `key` and build its primitive of kind `kind`
    pub fn primitive(&self, key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        let manager = self.key_manager(key.type_url())?;
        manager.validate_key(key)?;
        manager.primitive(key, kind)
    }

    /// Build a key set entry for `key`
    pub fn primitive_entry(
        &self,
        key: &Key,
        kind: PrimitiveKind,
        key_id: u32,
        output_prefix: OutputPrefixType,
    ) -> CryptoResult<PrimitiveEntry> {
        let primitive = self.primitive(key, kind)?;
        Ok(PrimitiveEntry::new(
            primitive,
            key_id,
            output_prefix,
            key.type_url(),
        ))
    }

    pub fn wrapper(&self, kind: PrimitiveKind) -> CryptoResult<Arc<dyn PrimitiveWrapper>> {
        self.inner
            .state
            .load()
            .wrappers
            .get(&kind)
            .map(|entry| Arc::clone(&entry.wrapper))
            .ok_or_else(|| CryptoError::unsupported_primitive("wrapper registry", kind.name()))
    }

    /// Combine a primitive set with the wrapper registered for its kind
    pub fn wrap(&self, set: PrimitiveSet) -> CryptoResult<Primitive> {
        self.wrapper(set.kind())?.wrap(set)
    }

    fn generation_entry(&self, type_url: &str) -> CryptoResult<KeyManagerEntry> {
        let entry = self.key_manager_entry(type_url)?;
        if !entry.new_key_allowed {
            return Err(CryptoError::KeyGenerationDisabled {
                type_url: type_url.to_string(),
                error_code: error_codes::KEY_GENERATION_DISABLED,
            });
        }
        Ok(entry)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("compliance_mode", &self.inner.compliance_mode)
            .field("key_types", &self.registered_key_types())
            .field("primitives", &self.registered_primitive_kinds())
            .finish()
    }
}

/// Staged registrations, published by [`Registry::transaction`]
pub struct RegistryTransaction {
    state: RegistryState,
    compliance_mode: ComplianceMode,
    changed: bool,
}

impl RegistryTransaction {
    pub fn compliance_mode(&self) -> ComplianceMode {
        self.compliance_mode
    }

    pub fn register_key_manager<M>(&mut self, manager: M, new_key_allowed: bool) -> CryptoResult<()>
    where
        M: KeyManager + 'static,
    {
        let material = manager.key_material_type();
        if material.is_asymmetric() {
            return Err(CryptoError::InvalidParameter {
                parameter: "manager".to_string(),
                expected: "SYMMETRIC or REMOTE key manager".to_string(),
                actual: format!("{} manager for {}", material, manager.key_type()),
                error_code: error_codes::UNPAIRED_ASYMMETRIC_MANAGER,
            });
        }
        self.insert_manager(
            Arc::new(manager),
            None,
            TypeTag::of::<M>(),
            new_key_allowed,
            None,
        )
    }

    pub fn register_asymmetric_key_pair<P, Q>(
        &mut self,
        private_manager: P,
        public_manager: Q,
        new_key_allowed: bool,
    ) -> CryptoResult<()>
    where
        P: PrivateKeyManager + 'static,
        Q: KeyManager + 'static,
    {
        if private_manager.key_material_type() != KeyMaterialType::AsymmetricPrivate {
            return Err(CryptoError::invalid_parameter(
                "private_manager",
                "ASYMMETRIC_PRIVATE",
                &private_manager.key_material_type().to_string(),
            ));
        }
        if public_manager.key_material_type() != KeyMaterialType::AsymmetricPublic {
            return Err(CryptoError::invalid_parameter(
                "public_manager",
                "ASYMMETRIC_PUBLIC",
                &public_manager.key_material_type().to_string(),
            ));
        }
        if private_manager.public_key_type() != public_manager.key_type() {
            return Err(CryptoError::invalid_parameter(
                "public_manager",
                private_manager.public_key_type(),
                public_manager.key_type(),
            ));
        }

        let private_type = private_manager.key_type().to_string();
        let public_type = public_manager.key_type().to_string();
        let private_manager = Arc::new(private_manager);

        // Both halves land in the staged state; a failure on either discards both.
        self.insert_manager(
            Arc::clone(&private_manager) as Arc<dyn KeyManager>,
            Some(private_manager as Arc<dyn PrivateKeyManager>),
            TypeTag::of::<P>(),
            new_key_allowed,
            Some(public_type),
        )?;
        self.insert_manager(
            Arc::new(public_manager),
            None,
            TypeTag::of::<Q>(),
            false,
            Some(private_type),
        )
    }

    pub fn register_wrapper<W>(&mut self, wrapper: W) -> CryptoResult<()>
    where
        W: PrimitiveWrapper + 'static,
    {
        let kind = wrapper.primitive_kind();
        let tag = TypeTag::of::<W>();

        if let Some(existing) = self.state.wrappers.get(&kind) {
            if existing.tag != tag {
                return Err(CryptoError::WrapperConflict {
                    primitive: kind.name().to_string(),
                    existing: existing.tag.name().to_string(),
                    attempted: tag.name().to_string(),
                    error_code: error_codes::WRAPPER_CONFLICT,
                });
            }
            log::debug!("wrapper for {} already registered", kind);
            return Ok(());
        }

        self.state.wrappers.insert(
            kind,
            WrapperEntry {
                wrapper: Arc::new(wrapper),
                tag,
            },
        );
        self.changed = true;
        log::info!("registered {} wrapper {}", kind, tag.name());
        Ok(())
    }

    fn insert_manager(
        &mut self,
        manager: Arc<dyn KeyManager>,
        private_manager: Option<Arc<dyn PrivateKeyManager>>,
        tag: TypeTag,
        new_key_allowed: bool,
        paired_type: Option<String>,
    ) -> CryptoResult<()> {
        let type_url = manager.key_type().to_string();

        if !self.compliance_mode.permits(manager.fips_compatibility()) {
            return Err(CryptoError::ComplianceViolation {
                type_url,
                mode: self.compliance_mode.to_string(),
                error_code: error_codes::COMPLIANCE_VIOLATION,
            });
        }

        if let Some(existing) = self.state.key_managers.get_mut(&type_url) {
            if existing.tag != tag || existing.paired_type != paired_type {
                return Err(CryptoError::DuplicateKeyType {
                    type_url,
                    existing: existing.tag.name().to_string(),
                    attempted: tag.name().to_string(),
                    error_code: error_codes::DUPLICATE_KEY_TYPE,
                });
            }
            if existing.new_key_allowed && !new_key_allowed {
                return Err(CryptoError::KeyGenerationDowngrade {
                    type_url,
                    error_code: error_codes::KEY_GENERATION_DOWNGRADE,
                });
            }
            if !existing.new_key_allowed && new_key_allowed {
                existing.new_key_allowed = true;
                self.changed = true;
                log::info!("enabled key generation for {}", type_url);
            } else {
                log::debug!("key manager for {} already registered", type_url);
            }
            return Ok(());
        }

        let entry = KeyManagerEntry {
            key_material_type: manager.key_material_type(),
            manager,
            private_manager,
            tag,
            new_key_allowed,
            paired_type,
        };
        log::info!(
            "registered {} key manager {} for {}",
            entry.key_material_type,
            tag.name(),
            type_url
        );
        self.state.key_managers.insert(type_url, entry);
        self.changed = true;
        Ok(())
    }
}
