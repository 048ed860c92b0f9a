use super::*;

use crate::compliance::ComplianceMode;
use crate::error::CryptoError;
use crate::key::{Key, KeyFormat, OutputPrefixType};
use crate::key_manager::{KeyManager, PrivateKeyManager};
use crate::primitive_set::{PrimitiveSet, NON_RAW_PREFIX_SIZE};
use crate::primitives::PrimitiveKind;
use crate::registry::Registry;

fn registry() -> Registry {
    let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
    register_with(&registry).unwrap();
    registry
}

fn sign_and_verify_sets(
    registry: &Registry,
    key: &Key,
    key_id: u32,
    prefix: OutputPrefixType,
) -> (PrimitiveSet, PrimitiveSet) {
    let public_key = registry.public_key_data(key).unwrap();

    let mut sign_set = PrimitiveSet::new(PrimitiveKind::PublicKeySign);
    sign_set
        .add_primary(
            registry
                .primitive_entry(key, PrimitiveKind::PublicKeySign, key_id, prefix)
                .unwrap(),
        )
        .unwrap();

    let mut verify_set = PrimitiveSet::new(PrimitiveKind::PublicKeyVerify);
    verify_set
        .add(
            registry
                .primitive_entry(&public_key, PrimitiveKind::PublicKeyVerify, key_id, prefix)
                .unwrap(),
        )
        .unwrap();

    (sign_set, verify_set)
}

#[test]
fn test_registers_pair() {
    let registry = registry();
    let private_entry = registry
        .key_manager_entry(ED25519_PRIVATE_KEY_TYPE_URL)
        .unwrap();
    assert!(private_entry.new_key_allowed());
    assert_eq!(private_entry.paired_type(), Some(ED25519_PUBLIC_KEY_TYPE_URL));
    assert!(!registry.new_key_allowed(ED25519_PUBLIC_KEY_TYPE_URL).unwrap());

    let err = registry
        .new_key_data(ED25519_PUBLIC_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap_err();
    assert!(matches!(err, CryptoError::KeyGenerationDisabled { .. }));
}

#[test]
fn test_restricted_mode_withholds_pair() {
    let registry = Registry::with_compliance_mode(ComplianceMode::Restricted);
    register_with(&registry).unwrap();
    assert!(!registry.is_registered(ED25519_PRIVATE_KEY_TYPE_URL));
    assert!(!registry.is_registered(ED25519_PUBLIC_KEY_TYPE_URL));
    assert_eq!(
        registry.registered_primitive_kinds(),
        vec![PrimitiveKind::PublicKeySign, PrimitiveKind::PublicKeyVerify]
    );
}

#[test]
fn test_wrapped_signature_carries_prefix() {
    let registry = registry();
    let key = registry
        .new_key_data(ED25519_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let (sign_set, verify_set) =
        sign_and_verify_sets(&registry, &key, 0x0102_0304, OutputPrefixType::Tink);

    let signer = registry.wrap(sign_set).unwrap().into_public_key_sign().unwrap();
    let verifier = registry
        .wrap(verify_set)
        .unwrap()
        .into_public_key_verify()
        .unwrap();

    let signature = signer.sign(b"data").unwrap();
    assert_eq!(signature.len(), NON_RAW_PREFIX_SIZE + ED25519_SIGNATURE_SIZE);
    assert_eq!(&signature[..NON_RAW_PREFIX_SIZE], &[1, 1, 2, 3, 4]);
    assert!(verifier.verify(&signature, b"data").is_ok());
    assert!(verifier.verify(&signature, b"other data").is_err());
    assert!(verifier
        .verify(&signature[NON_RAW_PREFIX_SIZE..], b"data")
        .is_err());
}

#[test]
fn test_raw_signature_has_no_prefix() {
    let registry = registry();
    let key = registry
        .new_key_data(ED25519_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let (sign_set, verify_set) = sign_and_verify_sets(&registry, &key, 9, OutputPrefixType::Raw);

    let signer = registry.wrap(sign_set).unwrap().into_public_key_sign().unwrap();
    let verifier = registry
        .wrap(verify_set)
        .unwrap()
        .into_public_key_verify()
        .unwrap();

    let signature = signer.sign(b"raw").unwrap();
    assert_eq!(signature.len(), ED25519_SIGNATURE_SIZE);
    assert!(verifier.verify(&signature, b"raw").is_ok());
}

#[test]
fn test_verify_set_without_primary() {
    let registry = registry();
    let first = registry
        .new_key_data(ED25519_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let second = registry
        .new_key_data(ED25519_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();

    let mut verify_set = PrimitiveSet::new(PrimitiveKind::PublicKeyVerify);
    for (id, key) in [(1u32, &first), (2u32, &second)] {
        let public_key = Ed25519PrivateKeyManager.public_key(key).unwrap();
        verify_set
            .add(
                registry
                    .primitive_entry(&public_key, PrimitiveKind::PublicKeyVerify, id, OutputPrefixType::Tink)
                    .unwrap(),
            )
            .unwrap();
    }
    let verifier = registry
        .wrap(verify_set)
        .unwrap()
        .into_public_key_verify()
        .unwrap();

    let (sign_set, _) = sign_and_verify_sets(&registry, &second, 2, OutputPrefixType::Tink);
    let signer = registry.wrap(sign_set).unwrap().into_public_key_sign().unwrap();
    assert!(verifier.verify(&signer.sign(b"m").unwrap(), b"m").is_ok());

    // Same signature under the other key's prefix
    let mut relabeled = signer.sign(b"m").unwrap();
    relabeled[4] = 1;
    assert!(verifier.verify(&relabeled, b"m").is_err());
}

#[test]
fn test_sign_set_needs_primary() {
    let registry = registry();
    let err = registry
        .wrap(PrimitiveSet::new(PrimitiveKind::PublicKeySign))
        .unwrap_err();
    assert!(matches!(err, CryptoError::NoPrimaryKey { .. }));
}

#[test]
fn test_mismatched_embedded_public_key() {
    let manager = Ed25519PrivateKeyManager;
    let a = manager.create_key(&KeyFormat::new()).unwrap();
    let b = manager.create_key(&KeyFormat::new()).unwrap();
    let b_public = b.public_key().cloned().unwrap();

    let mixed = a.with_public_key(b_public);
    assert!(manager.validate_key(&mixed).is_err());
}
