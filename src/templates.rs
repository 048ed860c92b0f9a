//! Named key templates
//!
//! ```
//! use keyreg::key::OutputPrefixType;
//!
//! let template = keyreg::templates::get("ED25519_RAW").unwrap();
//! assert_eq!(template.output_prefix, OutputPrefixType::Raw);
//! assert!(keyreg::templates::get("NO_SUCH_TEMPLATE").is_err());
//! ```

use crate::aead::{AES_GCM_KEY_SIZE, AES_GCM_TYPE_URL, CHACHA20_POLY1305_TYPE_URL};
use crate::daead::{AES_SIV_KEY_SIZE, AES_SIV_TYPE_URL};
use crate::error::{CryptoError, CryptoResult};
use crate::hybrid::{ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL, HPKE_PRIVATE_KEY_TYPE_URL};
use crate::key::{DemParams, HpkeAead, HpkeParams, KeyFormat, KeyTemplate, OutputPrefixType};
use crate::signature::ED25519_PRIVATE_KEY_TYPE_URL;

/// Every name accepted by [`get`]
pub const TEMPLATE_NAMES: &[&str] = &[
    "AES256_GCM",
    "AES256_GCM_RAW",
    "CHACHA20_POLY1305",
    "AES256_SIV",
    "ED25519",
    "ED25519_RAW",
    "ED25519WithRawOutput",
    "X25519_HKDF_SHA256_AES256_GCM",
    "X25519_HKDF_SHA256_CHACHA20_POLY1305",
    "DHKEM_X25519_HKDF_SHA256_HKDF_SHA256_AES_128_GCM",
    "DHKEM_X25519_HKDF_SHA256_HKDF_SHA256_AES_256_GCM",
    "DHKEM_X25519_HKDF_SHA256_HKDF_SHA256_CHACHA20_POLY1305",
];

/// Look up a template by name
pub fn get(name: &str) -> CryptoResult<KeyTemplate> {
    let template = match name {
        "AES256_GCM" => aes256_gcm(OutputPrefixType::Tink),
        "AES256_GCM_RAW" => aes256_gcm(OutputPrefixType::Raw),
        "CHACHA20_POLY1305" => KeyTemplate::new(
            CHACHA20_POLY1305_TYPE_URL,
            KeyFormat::new(),
            OutputPrefixType::Tink,
        ),
        "AES256_SIV" => KeyTemplate::new(
            AES_SIV_TYPE_URL,
            KeyFormat::new().with_key_size(AES_SIV_KEY_SIZE),
            OutputPrefixType::Tink,
        ),
        "ED25519" => ed25519(OutputPrefixType::Tink),
        // ED25519WithRawOutput is the older name of ED25519_RAW
        "ED25519_RAW" | "ED25519WithRawOutput" => ed25519(OutputPrefixType::Raw),
        "X25519_HKDF_SHA256_AES256_GCM" => ecies(AES_GCM_TYPE_URL, AES_GCM_KEY_SIZE),
        "X25519_HKDF_SHA256_CHACHA20_POLY1305" => ecies(CHACHA20_POLY1305_TYPE_URL, 32),
        "DHKEM_X25519_HKDF_SHA256_HKDF_SHA256_AES_128_GCM" => hpke(HpkeAead::Aes128Gcm),
        "DHKEM_X25519_HKDF_SHA256_HKDF_SHA256_AES_256_GCM" => hpke(HpkeAead::Aes256Gcm),
        "DHKEM_X25519_HKDF_SHA256_HKDF_SHA256_CHACHA20_POLY1305" => {
            hpke(HpkeAead::ChaCha20Poly1305)
        }
        _ => {
            return Err(CryptoError::invalid_parameter(
                "name",
                "a known template name",
                name,
            ))
        }
    };
    Ok(template)
}

fn aes256_gcm(output_prefix: OutputPrefixType) -> KeyTemplate {
    KeyTemplate::new(
        AES_GCM_TYPE_URL,
        KeyFormat::new().with_key_size(AES_GCM_KEY_SIZE),
        output_prefix,
    )
}

fn ed25519(output_prefix: OutputPrefixType) -> KeyTemplate {
    KeyTemplate::new(ED25519_PRIVATE_KEY_TYPE_URL, KeyFormat::new(), output_prefix)
}

fn ecies(dem_type: &str, dem_key_size: usize) -> KeyTemplate {
    KeyTemplate::new(
        ECIES_X25519_HKDF_PRIVATE_KEY_TYPE_URL,
        KeyFormat::new().with_dem(DemParams {
            key_type: dem_type.to_string(),
            key_size: dem_key_size,
        }),
        OutputPrefixType::Tink,
    )
}

fn hpke(aead: HpkeAead) -> KeyTemplate {
    KeyTemplate::new(
        HPKE_PRIVATE_KEY_TYPE_URL,
        KeyFormat::new().with_hpke(HpkeParams::x25519_hkdf_sha256(aead)),
        OutputPrefixType::Tink,
    )
}
