// Registry behaviour seen through the public API: initialization, the
// compliance gate, secret access and key templates.

use std::sync::Arc;

use keyreg::aead::{AES_GCM_TYPE_URL, CHACHA20_POLY1305_TYPE_URL};
use keyreg::compliance::{self, ComplianceMode};
use keyreg::daead::AES_SIV_TYPE_URL;
use keyreg::error::{error_codes, CryptoError};
use keyreg::hybrid::{
    ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
    HPKE_PRIVATE_KEY_TYPE_URL, HPKE_PUBLIC_KEY_TYPE_URL,
};
use keyreg::key::{KeyFormat, KeyTemplate, OutputPrefixType};
use keyreg::primitive_set::PrimitiveSet;
use keyreg::primitives::PrimitiveKind;
use keyreg::registry::{self, Registry};
use keyreg::secret_access::SecretKeyAccess;
use keyreg::signature::{ED25519_PRIVATE_KEY_TYPE_URL, ED25519_PUBLIC_KEY_TYPE_URL};
use keyreg::templates;

const ALL_KEY_TYPES: [&str; 9] = [
    AES_GCM_TYPE_URL,
    CHACHA20_POLY1305_TYPE_URL,
    AES_SIV_TYPE_URL,
    ED25519_PRIVATE_KEY_TYPE_URL,
    ED25519_PUBLIC_KEY_TYPE_URL,
    ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
    ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
    HPKE_PRIVATE_KEY_TYPE_URL,
    HPKE_PUBLIC_KEY_TYPE_URL,
];

fn unrestricted() -> Registry {
    let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
    keyreg::init_with(&registry).unwrap();
    registry
}

#[test]
fn test_init_is_idempotent() {
    keyreg::init().unwrap();
    keyreg::init().unwrap();

    let global = registry::global();
    assert_eq!(global.compliance_mode(), compliance::mode());
    // Certified in every mode
    assert!(global.is_registered(AES_GCM_TYPE_URL));
    assert!(global.wrapper(PrimitiveKind::Aead).is_ok());
}

#[test]
fn test_init_with_registers_every_family() {
    let registry = unrestricted();
    for type_url in ALL_KEY_TYPES {
        assert!(registry.is_registered(type_url), "{} missing", type_url);
    }
    assert_eq!(
        registry.registered_primitive_kinds(),
        vec![
            PrimitiveKind::Aead,
            PrimitiveKind::DeterministicAead,
            PrimitiveKind::HybridEncrypt,
            PrimitiveKind::HybridDecrypt,
            PrimitiveKind::PublicKeySign,
            PrimitiveKind::PublicKeyVerify,
        ]
    );

    let before = registry.registered_key_types();
    keyreg::init_with(&registry).unwrap();
    assert_eq!(registry.registered_key_types(), before);
}

#[test]
fn test_restricted_registry_holds_only_certified_managers() {
    let registry = Registry::with_compliance_mode(ComplianceMode::Restricted);
    keyreg::init_with(&registry).unwrap();

    assert_eq!(registry.registered_key_types(), vec![AES_GCM_TYPE_URL.to_string()]);
    assert_eq!(registry.registered_primitive_kinds().len(), 6);

    let err = registry
        .new_key_data(CHACHA20_POLY1305_TYPE_URL, &KeyFormat::new())
        .unwrap_err();
    assert!(matches!(err, CryptoError::UnknownKeyType { .. }));

    let err = registry
        .register_key_manager(keyreg::aead::ChaCha20Poly1305KeyManager, true)
        .unwrap_err();
    assert_eq!(err.error_code(), error_codes::COMPLIANCE_VIOLATION);
}

#[test]
fn test_public_key_types_do_not_generate_keys() {
    let registry = unrestricted();
    assert!(registry.new_key_allowed(ED25519_PRIVATE_KEY_TYPE_URL).unwrap());
    assert!(registry
        .new_key_data(ED25519_PUBLIC_KEY_TYPE_URL, &KeyFormat::new())
        .is_err());
}

#[test]
fn test_public_key_data_requires_private_type() {
    let registry = unrestricted();
    let symmetric = registry
        .new_key_data(AES_GCM_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let err = registry.public_key_data(&symmetric).unwrap_err();
    assert!(matches!(err, CryptoError::InvalidParameter { .. }));

    let private_key = registry
        .new_key_data(ED25519_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let public_key = registry.public_key_data(&private_key).unwrap();
    assert_eq!(public_key.type_url(), ED25519_PUBLIC_KEY_TYPE_URL);
    assert!(!public_key.has_secret());
}

#[test]
fn test_secret_bytes_need_the_token() {
    let registry = unrestricted();
    let key = registry
        .new_key_data(AES_GCM_TYPE_URL, &KeyFormat::new())
        .unwrap();

    let err = key.key_value(None).unwrap_err();
    assert_eq!(err.error_code(), error_codes::ACCESS_DENIED);
    assert_eq!(key.key_value(Some(SecretKeyAccess::get())).unwrap().len(), 32);

    // Debug output never carries the secret
    let secret_hex = hex::encode(key.key_bytes(SecretKeyAccess::get()));
    assert!(!format!("{:?}", key).contains(&secret_hex));
}

#[test]
fn test_derive_key_through_registry() {
    let registry = unrestricted();
    let material = [7u8; 64];
    let key = registry
        .derive_key(AES_SIV_TYPE_URL, &KeyFormat::new(), &mut &material[..])
        .unwrap();
    assert_eq!(key.key_bytes(SecretKeyAccess::get()), &material[..]);

    let err = registry
        .derive_key(
            ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
            &KeyFormat::new(),
            &mut &material[..],
        )
        .unwrap_err();
    assert!(matches!(err, CryptoError::UnsupportedOperation { .. }));
}

#[test]
fn test_template_json() {
    let template = templates::get("X25519_HKDF_SHA256_AES256_GCM").unwrap();
    let json = template.to_json().unwrap();
    assert_eq!(KeyTemplate::from_json(&json).unwrap(), template);

    let parsed = KeyTemplate::from_json(
        r#"{"type_url":"type.googleapis.com/google.crypto.tink.AesGcmKey","output_prefix":"raw"}"#,
    )
    .unwrap();
    assert_eq!(parsed.type_url, AES_GCM_TYPE_URL);
    assert_eq!(parsed.format, KeyFormat::new());
    assert_eq!(parsed.output_prefix, OutputPrefixType::Raw);

    let err = KeyTemplate::from_json("{not json").unwrap_err();
    assert!(matches!(err, CryptoError::SerializationError(_)));
}

#[test]
fn test_wrap_needs_registered_wrapper() {
    let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
    let err = registry
        .wrap(PrimitiveSet::new(PrimitiveKind::Aead))
        .unwrap_err();
    assert!(matches!(err, CryptoError::UnsupportedPrimitive { .. }));
}

#[test]
fn test_wrapped_aead_from_template() {
    let registry = unrestricted();
    let template = templates::get("AES256_GCM").unwrap();
    let key = registry.new_key_data_from_template(&template).unwrap();

    let mut set = PrimitiveSet::new(PrimitiveKind::Aead);
    set.add_primary(
        registry
            .primitive_entry(&key, PrimitiveKind::Aead, 0x0102_0304, template.output_prefix)
            .unwrap(),
    )
    .unwrap();
    let aead = registry.wrap(set).unwrap().into_aead().unwrap();

    let ciphertext = aead.encrypt(b"payload", b"ad").unwrap();
    assert_eq!(&ciphertext[..5], &[0x01, 0x01, 0x02, 0x03, 0x04]);
    assert_eq!(aead.decrypt(&ciphertext, b"ad").unwrap(), b"payload");
}

#[test]
fn test_managers_are_shared() {
    let registry = unrestricted();
    let a = registry.key_manager(AES_GCM_TYPE_URL).unwrap();
    let b = registry.key_manager(AES_GCM_TYPE_URL).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}
