/*!
 * Key Manager Registry
 *
 * Maps key type URLs to key managers and primitive interfaces to wrappers.
 *
 * # Design
 *
 * - **Append-only**: entries are never removed or replaced. Re-registering an
 *   identical manager is a no-op apart from enabling key generation.
 * - **Atomic**: every mutation, including an asymmetric pair or a whole family,
 *   is staged on a private copy and published in one step.
 * - **Non-blocking reads**: lookups read the last published snapshot and never
 *   wait for a registration in progress.
 * - **Compliance-gated**: a registry built in restricted mode refuses managers
 *   that are not certified.
 *
 * [`global()`] is the process-wide instance used by the family `register()`
 * functions. Tests build their own with [`Registry::with_compliance_mode`].
 *
 * # Example
 *
 * ```
 * use keyreg::compliance::ComplianceMode;
 * use keyreg::registry::Registry;
 *
 * let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
 * keyreg::aead::register_with(&registry).unwrap();
 *
 * assert!(registry.key_manager(keyreg::aead::AES_GCM_TYPE_URL).is_ok());
 * assert!(registry.key_manager("type.googleapis.com/unknown").is_err());
 * ```
 */

mod registry;


pub use registry::KeyManagerEntry;
pub use registry::Registry;
pub use registry::RegistryTransaction;
pub use registry::TypeTag;
pub use registry::WeakRegistry;

use once_cell::sync::Lazy;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry
///
/// Created empty on first use, in the process compliance mode.
pub fn global() -> &'static Registry {
    &GLOBAL
}
