use super::*;

use crate::aead::{AES_GCM_TYPE_URL, CHACHA20_POLY1305_TYPE_URL};
use crate::compliance::ComplianceMode;
use crate::daead::{AES_SIV_KEY_SIZE, AES_SIV_TYPE_URL, SIV_SIZE};
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::{DemParams, HpkeAead, HpkeParams, Key, KeyFormat, OutputPrefixType};
use crate::key_manager::{KeyManager, PrivateKeyManager};
use crate::primitive_set::PrimitiveSet;
use crate::primitives::{HybridDecrypt, HybridEncrypt, Primitive, PrimitiveKind};
use crate::registry::Registry;
use crate::signature::ED25519_PRIVATE_KEY_TYPE_URL;
use crate::wrapper::PrimitiveWrapper;

use std::sync::Arc;

fn registry() -> Registry {
    let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
    register_with(&registry).unwrap();
    registry
}

fn primitives(
    registry: &Registry,
    private_key: &Key,
) -> (Arc<dyn HybridEncrypt>, Arc<dyn HybridDecrypt>) {
    let public_key = registry.public_key_data(private_key).unwrap();
    let encrypter = registry
        .primitive(&public_key, PrimitiveKind::HybridEncrypt)
        .unwrap()
        .into_hybrid_encrypt()
        .unwrap();
    let decrypter = registry
        .primitive(private_key, PrimitiveKind::HybridDecrypt)
        .unwrap()
        .into_hybrid_decrypt()
        .unwrap();
    (encrypter, decrypter)
}

#[test]
fn test_register_pulls_in_dependencies() {
    let registry = registry();
    for type_url in [
        AES_GCM_TYPE_URL,
        CHACHA20_POLY1305_TYPE_URL,
        AES_SIV_TYPE_URL,
        ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
        ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
        HPKE_PRIVATE_KEY_TYPE_URL,
        HPKE_PUBLIC_KEY_TYPE_URL,
    ] {
        assert!(registry.is_registered(type_url), "{} missing", type_url);
    }
    register_with(&registry).unwrap();
}

#[test]
fn test_restricted_mode_keeps_certified_dependencies() {
    let registry = Registry::with_compliance_mode(ComplianceMode::Restricted);
    register_with(&registry).unwrap();

    assert!(registry.is_registered(AES_GCM_TYPE_URL));
    for type_url in [
        CHACHA20_POLY1305_TYPE_URL,
        AES_SIV_TYPE_URL,
        ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
        ECIES_X25519_HKDF_PUBLIC_KEY_TYPE_URL,
        HPKE_PRIVATE_KEY_TYPE_URL,
        HPKE_PUBLIC_KEY_TYPE_URL,
    ] {
        let err = registry.key_manager(type_url).unwrap_err();
        assert!(matches!(err, CryptoError::UnknownKeyType { .. }));
    }
    assert!(registry.wrapper(PrimitiveKind::HybridEncrypt).is_ok());
    assert!(registry.wrapper(PrimitiveKind::HybridDecrypt).is_ok());
}

#[test]
fn test_encrypt_decrypt_default_dem() {
    let registry = registry();
    let private_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    assert_eq!(private_key.dem(), Some(&default_dem()));

    let (encrypter, decrypter) = primitives(&registry, &private_key);
    let ciphertext = encrypter.encrypt(b"hybrid message", b"context").unwrap();
    assert_eq!(ciphertext.len(), X25519_KEY_SIZE + 12 + 14 + 16);
    assert_eq!(
        decrypter.decrypt(&ciphertext, b"context").unwrap(),
        b"hybrid message"
    );

    let err = decrypter.decrypt(&ciphertext, b"other context").unwrap_err();
    assert_eq!(err.error_code(), error_codes::HYBRID_DECRYPTION_FAILED);
}

#[test]
fn test_chacha_dem() {
    let registry = registry();
    let format = KeyFormat::new().with_dem(DemParams {
        key_type: CHACHA20_POLY1305_TYPE_URL.to_string(),
        key_size: 32,
    });
    let private_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &format)
        .unwrap();
    let (encrypter, decrypter) = primitives(&registry, &private_key);
    let ciphertext = encrypter.encrypt(b"via chacha", b"").unwrap();
    assert_eq!(decrypter.decrypt(&ciphertext, b"").unwrap(), b"via chacha");
}

#[test]
fn test_deterministic_aead_dem() {
    let registry = registry();
    let format = KeyFormat::new().with_dem(DemParams {
        key_type: AES_SIV_TYPE_URL.to_string(),
        key_size: AES_SIV_KEY_SIZE,
    });
    let private_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &format)
        .unwrap();
    registry.validate_key(&private_key).unwrap();

    let (encrypter, decrypter) = primitives(&registry, &private_key);
    let a = encrypter.encrypt(b"via siv", b"context").unwrap();
    let b = encrypter.encrypt(b"via siv", b"context").unwrap();
    // Fresh ephemeral key, so fresh DEM key
    assert_ne!(a, b);
    assert_eq!(a.len(), X25519_KEY_SIZE + SIV_SIZE + 7);
    assert_eq!(decrypter.decrypt(&a, b"context").unwrap(), b"via siv");
    assert_eq!(decrypter.decrypt(&b, b"context").unwrap(), b"via siv");

    let err = decrypter.decrypt(&a, b"other").unwrap_err();
    assert_eq!(err.error_code(), error_codes::HYBRID_DECRYPTION_FAILED);
}

#[test]
fn test_dem_must_be_registered_symmetric_cipher() {
    let registry = registry();

    let signer = KeyFormat::new().with_dem(DemParams {
        key_type: ED25519_PRIVATE_KEY_TYPE_URL.to_string(),
        key_size: 32,
    });
    crate::signature::register_with(&registry).unwrap();
    let err = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &signer)
        .unwrap_err();
    assert!(matches!(err, CryptoError::InvalidKeyFormat { .. }));

    let unknown = KeyFormat::new().with_dem(DemParams {
        key_type: "type.googleapis.com/google.crypto.tink.Unknown".to_string(),
        key_size: 32,
    });
    let err = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &unknown)
        .unwrap_err();
    assert!(matches!(err, CryptoError::UnknownKeyType { .. }));

    let wrong_size = KeyFormat::new().with_dem(DemParams {
        key_type: AES_GCM_TYPE_URL.to_string(),
        key_size: 16,
    });
    assert!(registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &wrong_size)
        .is_err());

    let short_siv = KeyFormat::new().with_dem(DemParams {
        key_type: AES_SIV_TYPE_URL.to_string(),
        key_size: 32,
    });
    assert!(registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &short_siv)
        .is_err());
}

#[test]
fn test_ciphertexts_are_randomized() {
    let registry = registry();
    let private_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let (encrypter, _) = primitives(&registry, &private_key);
    let a = encrypter.encrypt(b"same", b"").unwrap();
    let b = encrypter.encrypt(b"same", b"").unwrap();
    assert_ne!(a[..X25519_KEY_SIZE], b[..X25519_KEY_SIZE]);
}

#[test]
fn test_low_order_point_rejected() {
    let registry = registry();
    let private_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let (_, decrypter) = primitives(&registry, &private_key);

    let mut ciphertext = vec![0u8; X25519_KEY_SIZE];
    ciphertext.extend_from_slice(&[0u8; 28]);
    assert!(decrypter.decrypt(&ciphertext, b"").is_err());
    assert!(decrypter.decrypt(&[0u8; 8], b"").is_err());
}

#[test]
fn test_validate_key_rejects_mismatched_public_key() {
    let registry = registry();
    let a = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let b = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let mixed = a.clone().with_public_key(b.public_key().cloned().unwrap());
    assert!(registry.validate_key(&a).is_ok());
    assert!(registry.validate_key(&mixed).is_err());
}

#[test]
fn test_wrapped_hybrid_with_rotation() {
    let registry = registry();
    let old_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let new_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();

    let mut encrypt_set = PrimitiveSet::new(PrimitiveKind::HybridEncrypt);
    encrypt_set
        .add_primary(
            registry
                .primitive_entry(
                    &registry.public_key_data(&old_key).unwrap(),
                    PrimitiveKind::HybridEncrypt,
                    10,
                    OutputPrefixType::Tink,
                )
                .unwrap(),
        )
        .unwrap();
    let encrypter = registry
        .wrap(encrypt_set)
        .unwrap()
        .into_hybrid_encrypt()
        .unwrap();
    let ciphertext = encrypter.encrypt(b"old", b"ctx").unwrap();

    let mut decrypt_set = PrimitiveSet::new(PrimitiveKind::HybridDecrypt);
    decrypt_set
        .add(
            registry
                .primitive_entry(&new_key, PrimitiveKind::HybridDecrypt, 11, OutputPrefixType::Raw)
                .unwrap(),
        )
        .unwrap();
    decrypt_set
        .add(
            registry
                .primitive_entry(&old_key, PrimitiveKind::HybridDecrypt, 10, OutputPrefixType::Tink)
                .unwrap(),
        )
        .unwrap();
    let decrypter = registry
        .wrap(decrypt_set)
        .unwrap()
        .into_hybrid_decrypt()
        .unwrap();
    assert_eq!(decrypter.decrypt(&ciphertext, b"ctx").unwrap(), b"old");
}

#[test]
fn test_detached_registry() {
    let registry = registry();
    let private_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();

    let orphan = EciesX25519HkdfPrivateKeyManager::new(&Registry::with_compliance_mode(
        ComplianceMode::Unrestricted,
    ));
    let err = crate::key_manager::KeyManager::primitive(
        &orphan,
        &private_key,
        PrimitiveKind::HybridDecrypt,
    )
    .unwrap_err();
    assert_eq!(err.error_code(), error_codes::REGISTRY_DETACHED);
}

#[derive(Debug)]
struct ForeignDaeadWrapper;

impl PrimitiveWrapper for ForeignDaeadWrapper {
    fn primitive_kind(&self) -> PrimitiveKind {
        PrimitiveKind::DeterministicAead
    }
    fn wrap(&self, _set: PrimitiveSet) -> CryptoResult<Primitive> {
        Err(CryptoError::unsupported_operation("wrap", "none"))
    }
}

#[test]
fn test_wrappers_registered_before_dependencies() {
    let registry = Registry::with_compliance_mode(ComplianceMode::Unrestricted);
    registry.register_wrapper(ForeignDaeadWrapper).unwrap();

    // The deterministic AEAD family cannot take its wrapper slot
    let err = register_with(&registry).unwrap_err();
    assert_eq!(err.error_code(), error_codes::WRAPPER_CONFLICT);

    assert!(registry.wrapper(PrimitiveKind::HybridEncrypt).is_ok());
    assert!(registry.wrapper(PrimitiveKind::HybridDecrypt).is_ok());
    assert!(registry.is_registered(AES_GCM_TYPE_URL));
    assert!(!registry.is_registered(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL));
    assert!(!registry.is_registered(HPKE_PRIVATE_KEY_TYPE_URL));
}

#[test]
fn test_hpke_pair_registered_with_ecies() {
    let registry = registry();
    let private_key = registry
        .new_key_data(HPKE_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    assert_eq!(private_key.hpke(), Some(default_hpke_params()));
    assert_eq!(
        registry.public_key_data(&private_key).unwrap().type_url(),
        HPKE_PUBLIC_KEY_TYPE_URL
    );

    let err = registry
        .new_key_data(HPKE_PUBLIC_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap_err();
    assert!(matches!(err, CryptoError::UnsupportedOperation { .. }));
}

#[test]
fn test_hpke_round_trip_each_aead() {
    let registry = registry();
    for aead in [
        HpkeAead::Aes128Gcm,
        HpkeAead::Aes256Gcm,
        HpkeAead::ChaCha20Poly1305,
    ] {
        let format = KeyFormat::new().with_hpke(HpkeParams::x25519_hkdf_sha256(aead));
        let private_key = registry
            .new_key_data(HPKE_PRIVATE_KEY_TYPE_URL, &format)
            .unwrap();
        registry.validate_key(&private_key).unwrap();

        let (encrypter, decrypter) = primitives(&registry, &private_key);
        let ciphertext = encrypter.encrypt(b"hpke message", b"info").unwrap();
        assert_eq!(ciphertext.len(), X25519_KEY_SIZE + 12 + 16, "{:?}", aead);
        assert_eq!(
            decrypter.decrypt(&ciphertext, b"info").unwrap(),
            b"hpke message"
        );

        let err = decrypter.decrypt(&ciphertext, b"other info").unwrap_err();
        assert_eq!(err.error_code(), error_codes::HYBRID_DECRYPTION_FAILED);
        assert!(decrypter.decrypt(&ciphertext[..X25519_KEY_SIZE - 1], b"info").is_err());
    }
}

#[test]
fn test_hpke_suites_do_not_mix() {
    let registry = registry();
    let gcm = registry
        .new_key_data(
            HPKE_PRIVATE_KEY_TYPE_URL,
            &KeyFormat::new().with_hpke(HpkeParams::x25519_hkdf_sha256(HpkeAead::Aes256Gcm)),
        )
        .unwrap();
    let (encrypter, _) = primitives(&registry, &gcm);
    let ciphertext = encrypter.encrypt(b"suite bound", b"").unwrap();

    // Same key pair, different AEAD
    let chacha = HpkeParams::x25519_hkdf_sha256(HpkeAead::ChaCha20Poly1305);
    let public_key = gcm.public_key().cloned().unwrap().with_hpke(chacha);
    let relabelled = gcm.clone().with_hpke(chacha).with_public_key(public_key);
    let decrypter = registry
        .primitive(&relabelled, PrimitiveKind::HybridDecrypt)
        .unwrap()
        .into_hybrid_decrypt()
        .unwrap();
    assert!(decrypter.decrypt(&ciphertext, b"").is_err());
}

#[test]
fn test_hpke_validate_key() {
    let registry = registry();
    let a = registry
        .new_key_data(HPKE_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let b = registry
        .new_key_data(HPKE_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();

    let mixed = a.clone().with_public_key(b.public_key().cloned().unwrap());
    assert!(registry.validate_key(&mixed).is_err());

    let other_suite = a
        .clone()
        .with_hpke(HpkeParams::x25519_hkdf_sha256(HpkeAead::Aes128Gcm));
    assert!(HpkePrivateKeyManager.validate_key(&other_suite).is_err());

    let bare_public = Key::public(
        HPKE_PUBLIC_KEY_TYPE_URL,
        0,
        HpkePrivateKeyManager.public_key(&a).unwrap().key_value(None).unwrap().to_vec(),
    );
    let err = HpkePublicKeyManager.validate_key(&bare_public).unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_KEY_MATERIAL);

    let with_dem = KeyFormat::new().with_dem(default_dem());
    let err = registry
        .new_key_data(HPKE_PRIVATE_KEY_TYPE_URL, &with_dem)
        .unwrap_err();
    assert!(matches!(err, CryptoError::InvalidKeyFormat { .. }));
}

#[test]
fn test_hpke_and_ecies_rotate_in_one_set() {
    let registry = registry();
    let ecies_key = registry
        .new_key_data(ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();
    let hpke_key = registry
        .new_key_data(HPKE_PRIVATE_KEY_TYPE_URL, &KeyFormat::new())
        .unwrap();

    let (ecies_encrypter, _) = primitives(&registry, &ecies_key);
    let (hpke_encrypter, _) = primitives(&registry, &hpke_key);
    let from_ecies = ecies_encrypter.encrypt(b"ecies", b"ctx").unwrap();
    let from_hpke = hpke_encrypter.encrypt(b"hpke", b"ctx").unwrap();

    let mut set = PrimitiveSet::new(PrimitiveKind::HybridDecrypt);
    for (key, key_id) in [(&ecies_key, 1), (&hpke_key, 2)] {
        set.add(
            registry
                .primitive_entry(key, PrimitiveKind::HybridDecrypt, key_id, OutputPrefixType::Raw)
                .unwrap(),
        )
        .unwrap();
    }
    let decrypter = registry.wrap(set).unwrap().into_hybrid_decrypt().unwrap();
    assert_eq!(decrypter.decrypt(&from_ecies, b"ctx").unwrap(), b"ecies");
    assert_eq!(decrypter.decrypt(&from_hpke, b"ctx").unwrap(), b"hpke");
}
