/*!
 * Error Handling for the Key Manager Registry
 *
 * Provides the error type shared by the registry, the key managers and the
 * primitive wrappers, with error codes, user-friendly messages and suggested
 * remediation strategies.
 */

use std::collections::HashMap;
use thiserror::Error;

/// Error type for all registry and key manager operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Secret key access denied: {operation} requires a SecretKeyAccess token")]
    AccessDenied { operation: String, error_code: u32 },

    #[error("Unknown key type: {type_url}")]
    UnknownKeyType { type_url: String, error_code: u32 },

    #[error("Duplicate key type: {type_url} is registered by {existing}, refusing {attempted}")]
    DuplicateKeyType {
        type_url: String,
        existing: String,
        attempted: String,
        error_code: u32,
    },

    #[error("Key generation downgrade refused for {type_url}")]
    KeyGenerationDowngrade { type_url: String, error_code: u32 },

    #[error("Key generation disabled for {type_url}")]
    KeyGenerationDisabled { type_url: String, error_code: u32 },

    #[error("Wrapper conflict for {primitive}: {existing} is registered, refusing {attempted}")]
    WrapperConflict {
        primitive: String,
        existing: String,
        attempted: String,
        error_code: u32,
    },

    #[error("No primary key available for {primitive}")]
    NoPrimaryKey { primitive: String, error_code: u32 },

    #[error("Insufficient randomness: needed {needed} bytes, stream ended after {available}")]
    InsufficientRandomness {
        needed: usize,
        available: usize,
        error_code: u32,
    },

    #[error("Unsupported version {version} for {type_url}: highest supported is {max_version}")]
    UnsupportedVersion {
        type_url: String,
        version: u32,
        max_version: u32,
        error_code: u32,
    },

    #[error("Invalid key for {type_url}: {cause}")]
    InvalidKey {
        type_url: String,
        cause: String,
        error_code: u32,
        context: HashMap<String, String>,
    },

    #[error("Invalid key format for {type_url}: {cause}")]
    InvalidKeyFormat {
        type_url: String,
        cause: String,
        error_code: u32,
    },

    #[error("Compliance violation: {type_url} is not permitted in {mode} mode")]
    ComplianceViolation {
        type_url: String,
        mode: String,
        error_code: u32,
    },

    #[error("Unsupported primitive: {type_url} cannot produce {primitive}")]
    UnsupportedPrimitive {
        type_url: String,
        primitive: String,
        error_code: u32,
    },

    #[error("AEAD operation failed: {operation} - {cause}")]
    AeadError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Signature operation failed: {operation} - {cause}")]
    SignatureError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Invalid parameter: {parameter} - {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Operation not supported: {operation} on {key_type}")]
    UnsupportedOperation {
        operation: String,
        key_type: String,
        error_code: u32,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Initialization of the {family} family failed: {source}")]
    Initialization {
        family: String,
        #[source]
        source: Box<CryptoError>,
    },
}

/// Error code constants for different error categories
pub mod error_codes {
    // Capability errors: 1000-1999
    pub const ACCESS_DENIED: u32 = 1001;

    // Registry errors: 2000-2999
    pub const UNKNOWN_KEY_TYPE: u32 = 2001;
    pub const DUPLICATE_KEY_TYPE: u32 = 2002;
    pub const KEY_GENERATION_DOWNGRADE: u32 = 2003;
    pub const KEY_GENERATION_DISABLED: u32 = 2004;
    pub const WRAPPER_CONFLICT: u32 = 2005;
    pub const UNPAIRED_ASYMMETRIC_MANAGER: u32 = 2006;
    pub const REGISTRY_DETACHED: u32 = 2007;

    // Key manager errors: 3000-3999
    pub const INSUFFICIENT_RANDOMNESS: u32 = 3001;
    pub const UNSUPPORTED_VERSION: u32 = 3002;
    pub const INVALID_KEY_SIZE: u32 = 3003;
    pub const INVALID_PUBLIC_KEY: u32 = 3004;
    pub const INVALID_KEY_MATERIAL: u32 = 3005;
    pub const INVALID_KEY_FORMAT: u32 = 3006;
    pub const KEY_TYPE_MISMATCH: u32 = 3007;
    pub const UNSUPPORTED_PRIMITIVE: u32 = 3008;
    pub const DERIVATION_NOT_SUPPORTED: u32 = 3009;

    // Wrapper errors: 4000-4999
    pub const NO_PRIMARY_KEY: u32 = 4001;
    pub const NO_MATCHING_KEY: u32 = 4002;

    // Compliance errors: 5000-5999
    pub const COMPLIANCE_VIOLATION: u32 = 5001;
    pub const COMPLIANCE_MODE_FIXED: u32 = 5002;

    // Primitive errors: 6000-6999
    pub const AEAD_ENCRYPTION_FAILED: u32 = 6001;
    pub const AEAD_DECRYPTION_FAILED: u32 = 6002;
    pub const SIGNING_FAILED: u32 = 6003;
    pub const VERIFICATION_FAILED: u32 = 6004;
    pub const HYBRID_ENCRYPTION_FAILED: u32 = 6005;
    pub const HYBRID_DECRYPTION_FAILED: u32 = 6006;

    pub const INVALID_PARAMETER: u32 = 9999;
}

impl CryptoError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CryptoError::AccessDenied { error_code, .. } => *error_code,
            CryptoError::UnknownKeyType { error_code, .. } => *error_code,
            CryptoError::DuplicateKeyType { error_code, .. } => *error_code,
            CryptoError::KeyGenerationDowngrade { error_code, .. } => *error_code,
            CryptoError::KeyGenerationDisabled { error_code, .. } => *error_code,
            CryptoError::WrapperConflict { error_code, .. } => *error_code,
            CryptoError::NoPrimaryKey { error_code, .. } => *error_code,
            CryptoError::InsufficientRandomness { error_code, .. } => *error_code,
            CryptoError::UnsupportedVersion { error_code, .. } => *error_code,
            CryptoError::InvalidKey { error_code, .. } => *error_code,
            CryptoError::InvalidKeyFormat { error_code, .. } => *error_code,
            CryptoError::ComplianceViolation { error_code, .. } => *error_code,
            CryptoError::UnsupportedPrimitive { error_code, .. } => *error_code,
            CryptoError::AeadError { error_code, .. } => *error_code,
            CryptoError::SignatureError { error_code, .. } => *error_code,
            CryptoError::InvalidParameter { error_code, .. } => *error_code,
            CryptoError::UnsupportedOperation { error_code, .. } => *error_code,
            CryptoError::SerializationError(_) => 9001,
            CryptoError::Initialization { source, .. } => source.error_code(),
        }
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            CryptoError::AccessDenied { operation, .. } => format!(
                "'{}' reveals secret key material and needs an explicit SecretKeyAccess token.",
                operation
            ),
            CryptoError::UnknownKeyType { type_url, .. } => format!(
                "No key manager is registered for '{}'. Register its algorithm family first.",
                type_url
            ),
            CryptoError::DuplicateKeyType { type_url, .. } => format!(
                "A different key manager already handles '{}'. Key types cannot be replaced.",
                type_url
            ),
            CryptoError::KeyGenerationDowngrade { type_url, .. } => format!(
                "Key generation for '{}' was already enabled and cannot be disabled again.",
                type_url
            ),
            CryptoError::KeyGenerationDisabled { type_url, .. } => {
                format!("New keys of type '{}' may not be generated.", type_url)
            }
            CryptoError::WrapperConflict { primitive, .. } => format!(
                "A different wrapper is already registered for the {} primitive.",
                primitive
            ),
            CryptoError::NoPrimaryKey { primitive, .. } => format!(
                "The key set for {} has no enabled primary key.",
                primitive
            ),
            CryptoError::InsufficientRandomness { needed, .. } => format!(
                "The randomness source ended before {} bytes could be read.",
                needed
            ),
            CryptoError::UnsupportedVersion { type_url, version, .. } => format!(
                "Version {} of '{}' is not supported by this release.",
                version, type_url
            ),
            CryptoError::InvalidKey { type_url, .. } => {
                format!("The key of type '{}' is malformed.", type_url)
            }
            CryptoError::InvalidKeyFormat { type_url, .. } => {
                format!("The key format requested for '{}' is not valid.", type_url)
            }
            CryptoError::ComplianceViolation { type_url, mode, .. } => format!(
                "'{}' cannot be used while the process runs in {} compliance mode.",
                type_url, mode
            ),
            CryptoError::UnsupportedPrimitive { type_url, primitive, .. } => format!(
                "Keys of type '{}' cannot be used as {}.",
                type_url, primitive
            ),
            CryptoError::AeadError { operation, .. } => format!(
                "Encryption operation '{}' failed. Data may be corrupted or tampered with.",
                operation
            ),
            CryptoError::SignatureError { operation, .. } => format!(
                "Signature operation '{}' failed. Message authenticity cannot be verified.",
                operation
            ),
            CryptoError::InvalidParameter {
                parameter,
                expected,
                ..
            } => format!(
                "Invalid parameter '{}'. Expected '{}' format.",
                parameter, expected
            ),
            CryptoError::UnsupportedOperation {
                operation,
                key_type,
                ..
            } => format!(
                "Operation '{}' is not supported for '{}'.",
                operation, key_type
            ),
            CryptoError::SerializationError(_) => {
                "Data serialization failed. Data format may be corrupted.".to_string()
            }
            CryptoError::Initialization { family, .. } => format!(
                "The {} algorithm family could not be registered. The process should not continue.",
                family
            ),
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            CryptoError::InvalidKey {
                type_url,
                cause,
                context,
                ..
            } => {
                details.insert("type_url".to_string(), type_url.clone());
                details.insert("cause".to_string(), cause.clone());
                details.extend(context.clone());
            }
            CryptoError::DuplicateKeyType {
                type_url,
                existing,
                attempted,
                ..
            } => {
                details.insert("type_url".to_string(), type_url.clone());
                details.insert("existing".to_string(), existing.clone());
                details.insert("attempted".to_string(), attempted.clone());
            }
            CryptoError::WrapperConflict {
                primitive,
                existing,
                attempted,
                ..
            } => {
                details.insert("primitive".to_string(), primitive.clone());
                details.insert("existing".to_string(), existing.clone());
                details.insert("attempted".to_string(), attempted.clone());
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                actual,
                ..
            } => {
                details.insert("parameter".to_string(), parameter.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            CryptoError::Initialization { family, source } => {
                details.insert("family".to_string(), family.clone());
                details.insert("source".to_string(), source.to_string());
            }
            _ => {
                details.insert("details".to_string(), format!("{:?}", self));
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            CryptoError::AccessDenied { .. } => Some(
                "Pass SecretKeyAccess::get() if exposing the secret bytes is intended.".to_string(),
            ),
            CryptoError::UnknownKeyType { .. } => Some(
                "Call the register() function of the family providing this key type, or keyreg::init()."
                    .to_string(),
            ),
            CryptoError::DuplicateKeyType { .. } | CryptoError::WrapperConflict { .. } => Some(
                "Mint a new key type identifier instead of replacing an existing implementation."
                    .to_string(),
            ),
            CryptoError::InsufficientRandomness { .. } => Some(
                "Supply a randomness stream with at least as many bytes as the key requires."
                    .to_string(),
            ),
            CryptoError::UnsupportedVersion { .. } => {
                Some("Upgrade to a release that supports this key version.".to_string())
            }
            CryptoError::ComplianceViolation { .. } => Some(
                "Use a certified key type, or run the process in unrestricted mode.".to_string(),
            ),
            CryptoError::NoPrimaryKey { .. } => {
                Some("Mark exactly one enabled entry of the key set as primary.".to_string())
            }
            _ => None,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::AccessDenied { .. } => "AccessDenied",
            CryptoError::UnknownKeyType { .. } => "UnknownKeyType",
            CryptoError::DuplicateKeyType { .. } => "DuplicateKeyType",
            CryptoError::KeyGenerationDowngrade { .. } => "KeyGenerationDowngrade",
            CryptoError::KeyGenerationDisabled { .. } => "KeyGenerationDisabled",
            CryptoError::WrapperConflict { .. } => "WrapperConflict",
            CryptoError::NoPrimaryKey { .. } => "NoPrimaryKey",
            CryptoError::InsufficientRandomness { .. } => "InsufficientRandomness",
            CryptoError::UnsupportedVersion { .. } => "UnsupportedVersion",
            CryptoError::InvalidKey { .. } => "InvalidKey",
            CryptoError::InvalidKeyFormat { .. } => "InvalidKeyFormat",
            CryptoError::ComplianceViolation { .. } => "ComplianceViolation",
            CryptoError::UnsupportedPrimitive { .. } => "UnsupportedPrimitive",
            CryptoError::AeadError { .. } => "AeadError",
            CryptoError::SignatureError { .. } => "SignatureError",
            CryptoError::InvalidParameter { .. } => "InvalidParameter",
            CryptoError::UnsupportedOperation { .. } => "UnsupportedOperation",
            CryptoError::SerializationError(_) => "SerializationError",
            CryptoError::Initialization { .. } => "Initialization",
        }
    }
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn access_denied(operation: &str) -> Self {
        CryptoError::AccessDenied {
            operation: operation.to_string(),
            error_code: error_codes::ACCESS_DENIED,
        }
    }

    pub fn unknown_key_type(type_url: &str) -> Self {
        CryptoError::UnknownKeyType {
            type_url: type_url.to_string(),
            error_code: error_codes::UNKNOWN_KEY_TYPE,
        }
    }

    pub fn invalid_key(type_url: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::InvalidKey {
            type_url: type_url.to_string(),
            cause: cause.to_string(),
            error_code,
            context: HashMap::new(),
        }
    }

    pub fn invalid_key_size(type_url: &str, expected: usize, actual: usize) -> Self {
        let mut context = HashMap::new();
        context.insert("expected_size".to_string(), expected.to_string());
        context.insert("actual_size".to_string(), actual.to_string());

        CryptoError::InvalidKey {
            type_url: type_url.to_string(),
            cause: format!("expected {} key bytes, got {}", expected, actual),
            error_code: error_codes::INVALID_KEY_SIZE,
            context,
        }
    }

    pub fn invalid_key_format(type_url: &str, cause: &str) -> Self {
        CryptoError::InvalidKeyFormat {
            type_url: type_url.to_string(),
            cause: cause.to_string(),
            error_code: error_codes::INVALID_KEY_FORMAT,
        }
    }

    pub fn unsupported_version(type_url: &str, version: u32, max_version: u32) -> Self {
        CryptoError::UnsupportedVersion {
            type_url: type_url.to_string(),
            version,
            max_version,
            error_code: error_codes::UNSUPPORTED_VERSION,
        }
    }

    pub fn unsupported_primitive(type_url: &str, primitive: &str) -> Self {
        CryptoError::UnsupportedPrimitive {
            type_url: type_url.to_string(),
            primitive: primitive.to_string(),
            error_code: error_codes::UNSUPPORTED_PRIMITIVE,
        }
    }

    pub fn no_primary_key(primitive: &str) -> Self {
        CryptoError::NoPrimaryKey {
            primitive: primitive.to_string(),
            error_code: error_codes::NO_PRIMARY_KEY,
        }
    }

    pub fn aead_error(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::AeadError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn signature_error(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::SignatureError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str) -> Self {
        CryptoError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code: error_codes::INVALID_PARAMETER,
        }
    }

    pub fn unsupported_operation(operation: &str, key_type: &str) -> Self {
        CryptoError::UnsupportedOperation {
            operation: operation.to_string(),
            key_type: key_type.to_string(),
            error_code: error_codes::DERIVATION_NOT_SUPPORTED,
        }
    }

    pub fn initialization(family: &str, source: CryptoError) -> Self {
        CryptoError::Initialization {
            family: family.to_string(),
            source: Box::new(source),
        }
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::SerializationError(err.to_string())
    }
}

/// Result type alias for registry and key manager operations
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_generation() {
        let error = CryptoError::unknown_key_type("type.googleapis.com/google.crypto.tink.Nope");
        assert_eq!(error.error_code(), error_codes::UNKNOWN_KEY_TYPE);
        assert_eq!(error.error_type(), "UnknownKeyType");
    }

    #[test]
    fn test_user_friendly_message() {
        let error = CryptoError::access_denied("Key::key_value");
        let message = error.user_friendly_message();
        assert!(message.contains("SecretKeyAccess"));
    }

    #[test]
    fn test_technical_details() {
        let error = CryptoError::invalid_key_size("type.googleapis.com/google.crypto.tink.AesGcmKey", 32, 64);
        let details = error.technical_details();
        assert!(details.contains_key("error_code"));
        assert!(details.contains_key("type_url"));
        assert_eq!(details.get("actual_size").map(String::as_str), Some("64"));
    }

    #[test]
    fn test_initialization_keeps_source_code() {
        let error = CryptoError::initialization(
            "hybrid",
            CryptoError::unknown_key_type("type.googleapis.com/google.crypto.tink.AesGcmKey"),
        );
        assert_eq!(error.error_code(), error_codes::UNKNOWN_KEY_TYPE);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_remediation_suggestions() {
        let error = CryptoError::InsufficientRandomness {
            needed: 32,
            available: 10,
            error_code: error_codes::INSUFFICIENT_RANDOMNESS,
        };
        let suggestion = error.suggested_remediation();
        assert!(suggestion.is_some());
        assert!(suggestion.unwrap().contains("randomness"));
    }
}
