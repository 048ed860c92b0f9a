//! Keys and key formats
//!
//! A [`Key`] is produced and consumed by the key manager registered for its
//! type URL. Public key bytes can be read freely; secret key bytes are only
//! handed out against a [`SecretKeyAccess`] token.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::secret_access::SecretKeyAccess;
use crate::secure_memory::SecretBytes;

/// Kind of material a key type holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMaterialType {
    Symmetric,
    AsymmetricPrivate,
    AsymmetricPublic,
    /// Material held by an external service; only a reference is local
    Remote,
}

impl KeyMaterialType {
    pub fn is_asymmetric(&self) -> bool {
        matches!(
            self,
            KeyMaterialType::AsymmetricPrivate | KeyMaterialType::AsymmetricPublic
        )
    }
}

impl fmt::Display for KeyMaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterialType::Symmetric => write!(f, "SYMMETRIC"),
            KeyMaterialType::AsymmetricPrivate => write!(f, "ASYMMETRIC_PRIVATE"),
            KeyMaterialType::AsymmetricPublic => write!(f, "ASYMMETRIC_PUBLIC"),
            KeyMaterialType::Remote => write!(f, "REMOTE"),
        }
    }
}

/// Data encapsulation parameters for hybrid keys
///
/// `key_type` names the AEAD key type used to seal the payload; `key_size` is
/// the number of bytes derived for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemParams {
    pub key_type: String,
    pub key_size: usize,
}

/// HPKE key encapsulation mechanism
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HpkeKem {
    #[default]
    #[serde(rename = "DHKEM_X25519_HKDF_SHA256")]
    DhkemX25519HkdfSha256,
}

/// HPKE key derivation function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HpkeKdf {
    #[default]
    #[serde(rename = "HKDF_SHA256")]
    HkdfSha256,
}

/// HPKE payload AEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HpkeAead {
    #[serde(rename = "AES_128_GCM")]
    Aes128Gcm,
    #[serde(rename = "AES_256_GCM")]
    Aes256Gcm,
    #[serde(rename = "CHACHA20_POLY1305")]
    ChaCha20Poly1305,
}

/// Algorithm suite of an HPKE key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HpkeParams {
    #[serde(default)]
    pub kem: HpkeKem,
    #[serde(default)]
    pub kdf: HpkeKdf,
    pub aead: HpkeAead,
}

impl HpkeParams {
    /// DHKEM(X25519, HKDF-SHA256) and HKDF-SHA256 with `aead`
    pub fn x25519_hkdf_sha256(aead: HpkeAead) -> Self {
        Self {
            kem: HpkeKem::DhkemX25519HkdfSha256,
            kdf: HpkeKdf::HkdfSha256,
            aead,
        }
    }
}

/// Parameters for creating or deriving a key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFormat {
    #[serde(default)]
    pub version: u32,
    /// Requested key size; `None` selects the key type's fixed size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dem: Option<DemParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hpke: Option<HpkeParams>,
}

impl KeyFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_key_size(mut self, key_size: usize) -> Self {
        self.key_size = Some(key_size);
        self
    }

    pub fn with_dem(mut self, dem: DemParams) -> Self {
        self.dem = Some(dem);
        self
    }

    pub fn with_hpke(mut self, params: HpkeParams) -> Self {
        self.hpke = Some(params);
        self
    }
}

#[derive(Clone, PartialEq, Eq)]
enum KeyValue {
    Secret(SecretBytes),
    Public(Vec<u8>),
}

/// A key of one registered key type
///
/// # Example
///
/// ```
/// use keyreg::key::Key;
/// use keyreg::secret_access::SecretKeyAccess;
/// use keyreg::secure_memory::SecretBytes;
///
/// let key = Key::symmetric("type.googleapis.com/example.Key", 0, SecretBytes::random(32));
/// assert!(key.key_value(None).is_err());
/// assert_eq!(key.key_value(Some(SecretKeyAccess::get())).unwrap().len(), 32);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    type_url: String,
    version: u32,
    value: KeyValue,
    public_key: Option<Box<Key>>,
    dem: Option<DemParams>,
    hpke: Option<HpkeParams>,
}

impl Key {
    /// A symmetric key holding secret bytes
    pub fn symmetric(type_url: impl Into<String>, version: u32, value: SecretBytes) -> Self {
        Self {
            type_url: type_url.into(),
            version,
            value: KeyValue::Secret(value),
            public_key: None,
            dem: None,
            hpke: None,
        }
    }

    /// A private key with its embedded public component
    pub fn private(
        type_url: impl Into<String>,
        version: u32,
        value: SecretBytes,
        public_key: Key,
    ) -> Self {
        Self {
            type_url: type_url.into(),
            version,
            value: KeyValue::Secret(value),
            public_key: Some(Box::new(public_key)),
            dem: None,
            hpke: None,
        }
    }

    /// A public key
    pub fn public(type_url: impl Into<String>, version: u32, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            version,
            value: KeyValue::Public(value),
            public_key: None,
            dem: None,
            hpke: None,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Replace the secret value, keeping everything else
    pub fn with_secret_value(mut self, value: SecretBytes) -> Self {
        self.value = KeyValue::Secret(value);
        self
    }

    /// Replace the public value, keeping everything else
    pub fn with_public_value(mut self, value: Vec<u8>) -> Self {
        self.value = KeyValue::Public(value);
        self
    }

    pub fn with_public_key(mut self, public_key: Key) -> Self {
        self.public_key = Some(Box::new(public_key));
        self
    }

    pub fn with_dem(mut self, dem: DemParams) -> Self {
        self.dem = Some(dem);
        self
    }

    pub fn with_hpke(mut self, params: HpkeParams) -> Self {
        self.hpke = Some(params);
        self
    }

    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether the key value is secret material
    pub fn has_secret(&self) -> bool {
        matches!(self.value, KeyValue::Secret(_))
    }

    /// Length of the key value in bytes
    pub fn key_len(&self) -> usize {
        match &self.value {
            KeyValue::Secret(secret) => secret.len(),
            KeyValue::Public(bytes) => bytes.len(),
        }
    }

    /// The key value
    ///
    /// Public values are returned regardless of `access`. Secret values need
    /// a token and fail with `AccessDenied` without one.
    pub fn key_value(&self, access: Option<&SecretKeyAccess>) -> CryptoResult<&[u8]> {
        match &self.value {
            KeyValue::Public(bytes) => Ok(bytes),
            KeyValue::Secret(secret) => {
                let access = SecretKeyAccess::require(access)
                    .map_err(|_| CryptoError::access_denied("Key::key_value"))?;
                Ok(secret.to_bytes(access))
            }
        }
    }

    /// The key value, for callers that always hold a token
    pub fn key_bytes(&self, access: &SecretKeyAccess) -> &[u8] {
        match &self.value {
            KeyValue::Public(bytes) => bytes,
            KeyValue::Secret(secret) => secret.to_bytes(access),
        }
    }

    /// Embedded public component of a private key
    pub fn public_key(&self) -> Option<&Key> {
        self.public_key.as_deref()
    }

    pub fn dem(&self) -> Option<&DemParams> {
        self.dem.as_ref()
    }

    pub fn hpke(&self) -> Option<HpkeParams> {
        self.hpke
    }

    /// Crate-internal view of the key bytes for the key managers
    pub(crate) fn material(&self) -> &[u8] {
        match &self.value {
            KeyValue::Public(bytes) => bytes,
            KeyValue::Secret(secret) => secret.expose(),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Key");
        s.field("type_url", &self.type_url)
            .field("version", &self.version);
        match &self.value {
            KeyValue::Secret(secret) => s.field("value", secret),
            KeyValue::Public(bytes) => s.field("value", &hex::encode(bytes)),
        };
        s.field("public_key", &self.public_key)
            .field("dem", &self.dem)
            .field("hpke", &self.hpke)
            .finish()
    }
}

/// How wrapped outputs identify the key that produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPrefixType {
    /// Outputs start with `0x01 || key_id`
    Tink,
    /// Outputs carry no prefix
    Raw,
}

/// Everything needed to generate a key: type, format and output prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTemplate {
    pub type_url: String,
    #[serde(default)]
    pub format: KeyFormat,
    pub output_prefix: OutputPrefixType,
}

impl KeyTemplate {
    pub fn new(type_url: &str, format: KeyFormat, output_prefix: OutputPrefixType) -> Self {
        Self {
            type_url: type_url.to_string(),
            format,
            output_prefix,
        }
    }

    pub fn from_json(json: &str) -> CryptoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPE_URL: &str = "type.googleapis.com/google.crypto.tink.AesGcmKey";

    #[test]
    fn test_public_value_needs_no_token() {
        let key = Key::public(TYPE_URL, 0, vec![1, 2, 3]);
        assert_eq!(key.key_value(None).unwrap(), &[1, 2, 3]);
        assert!(!key.has_secret());
    }

    #[test]
    fn test_secret_value_needs_token() {
        let key = Key::symmetric(TYPE_URL, 0, SecretBytes::random(32));
        let err = key.key_value(None).unwrap_err();
        assert!(matches!(err, CryptoError::AccessDenied { .. }));
        assert_eq!(key.key_bytes(SecretKeyAccess::get()).len(), 32);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let secret = SecretBytes::new(&[0x5A; 32], SecretKeyAccess::get());
        let key = Key::symmetric(TYPE_URL, 0, secret);
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("5a5a"));
    }

    #[test]
    fn test_template_json() {
        let template = KeyTemplate::from_json(
            r#"{"type_url":"type.googleapis.com/google.crypto.tink.AesGcmKey","format":{"key_size":32},"output_prefix":"raw"}"#,
        )
        .unwrap();
        assert_eq!(template.type_url, TYPE_URL);
        assert_eq!(template.format.key_size, Some(32));
        assert_eq!(template.format.version, 0);
        assert_eq!(template.output_prefix, OutputPrefixType::Raw);

        let again = KeyTemplate::from_json(&template.to_json().unwrap()).unwrap();
        assert_eq!(again, template);
    }

    #[test]
    fn test_hpke_params_json() {
        let format: KeyFormat =
            serde_json::from_str(r#"{"hpke":{"aead":"CHACHA20_POLY1305"}}"#).unwrap();
        assert_eq!(
            format.hpke,
            Some(HpkeParams::x25519_hkdf_sha256(HpkeAead::ChaCha20Poly1305))
        );

        let format = KeyFormat::new().with_hpke(HpkeParams::x25519_hkdf_sha256(HpkeAead::Aes256Gcm));
        let json = serde_json::to_string(&format).unwrap();
        assert!(json.contains(r#""kem":"DHKEM_X25519_HKDF_SHA256""#), "{}", json);
        assert!(json.contains(r#""aead":"AES_256_GCM""#), "{}", json);
    }
}
