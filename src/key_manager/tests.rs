use super::*;
use crate::secure_memory::SecretBytes;

const TYPE_URL: &str = "type.googleapis.com/google.crypto.tink.TestKey";

#[derive(Debug)]
struct SymmetricOnly;

impl KeyManager for SymmetricOnly {
    fn key_type(&self) -> &str {
        TYPE_URL
    }

    fn version(&self) -> u32 {
        0
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::Symmetric
    }

    fn primitive_kinds(&self) -> &'static [PrimitiveKind] {
        &[PrimitiveKind::Aead]
    }

    fn validate_key_format(&self, format: &KeyFormat) -> CryptoResult<()> {
        validate_requested_size(TYPE_URL, format, 16)
    }

    fn create_key(&self, _format: &KeyFormat) -> CryptoResult<Key> {
        Ok(Key::symmetric(TYPE_URL, 0, SecretBytes::random(16)))
    }

    fn validate_key(&self, key: &Key) -> CryptoResult<()> {
        validate_key_type(self, key)?;
        validate_version(TYPE_URL, key.version(), self.version())?;
        validate_key_size(TYPE_URL, key.key_len(), 16)
    }

    fn primitive(&self, _key: &Key, kind: PrimitiveKind) -> CryptoResult<Primitive> {
        ensure_primitive_kind(self, kind)?;
        Err(CryptoError::unsupported_operation("primitive", TYPE_URL))
    }
}

#[test]
fn test_default_derivation_is_unsupported() {
    let manager = SymmetricOnly;
    let mut stream: &[u8] = &[0u8; 64];
    assert!(!manager.supports_derivation());
    let err = manager.derive_key(&KeyFormat::new(), &mut stream).unwrap_err();
    assert!(matches!(err, CryptoError::UnsupportedOperation { .. }));
    assert_eq!(stream.len(), 64);
}

#[test]
fn test_default_compliance_is_not_certified() {
    assert_eq!(
        SymmetricOnly.fips_compatibility(),
        FipsCompatibility::NotCertified
    );
}

#[test]
fn test_validate_version() {
    assert!(validate_version(TYPE_URL, 0, 0).is_ok());
    let err = validate_version(TYPE_URL, 1, 0).unwrap_err();
    assert!(matches!(
        err,
        CryptoError::UnsupportedVersion {
            version: 1,
            max_version: 0,
            ..
        }
    ));
}

#[test]
fn test_validate_key_rejects_wrong_type_url() {
    let key = Key::symmetric("type.googleapis.com/other", 0, SecretBytes::random(16));
    let err = SymmetricOnly.validate_key(&key).unwrap_err();
    assert_eq!(err.error_code(), error_codes::KEY_TYPE_MISMATCH);
}

#[test]
fn test_validate_key_rejects_wrong_size() {
    let key = Key::symmetric(TYPE_URL, 0, SecretBytes::random(17));
    let err = SymmetricOnly.validate_key(&key).unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_KEY_SIZE);
}

#[test]
fn test_requested_size_must_match() {
    assert!(validate_requested_size(TYPE_URL, &KeyFormat::new(), 16).is_ok());
    assert!(validate_requested_size(TYPE_URL, &KeyFormat::new().with_key_size(16), 16).is_ok());
    assert!(validate_requested_size(TYPE_URL, &KeyFormat::new().with_key_size(32), 16).is_err());
}

#[test]
fn test_unsupported_primitive_kind() {
    let key = Key::symmetric(TYPE_URL, 0, SecretBytes::random(16));
    let err = SymmetricOnly
        .primitive(&key, PrimitiveKind::PublicKeySign)
        .unwrap_err();
    assert!(matches!(err, CryptoError::UnsupportedPrimitive { .. }));
}
