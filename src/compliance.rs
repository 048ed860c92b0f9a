//! Process-wide compliance mode
//!
//! The mode decides which key managers may enter a registry. In
//! [`ComplianceMode::Restricted`] only managers reporting
//! [`FipsCompatibility::Certified`] are accepted; the family `register()`
//! functions withhold the rest and the registry refuses them outright.
//!
//! The mode is fixed the first time it is read. Its initial value comes from
//! `KEYREG_COMPLIANCE_MODE` (`unrestricted` or `restricted`) when set, and from
//! the `fips` cargo feature otherwise. [`set_mode`] pins it explicitly; call it
//! before registering anything.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{error_codes, CryptoError, CryptoResult};

/// Environment variable consulted for the initial mode
pub const COMPLIANCE_MODE_ENV: &str = "KEYREG_COMPLIANCE_MODE";

static MODE: OnceCell<ComplianceMode> = OnceCell::new();

/// Which algorithms the process may register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceMode {
    /// Every key manager may be registered
    Unrestricted,
    /// Only certified key managers may be registered
    Restricted,
}

/// Certification status a key manager reports about its algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FipsCompatibility {
    /// The algorithm is not part of the certified set
    NotCertified,
    /// The algorithm may be used in restricted mode
    Certified,
}

impl ComplianceMode {
    /// Whether a manager with the given status may be registered in this mode
    pub fn permits(&self, compatibility: FipsCompatibility) -> bool {
        match self {
            ComplianceMode::Unrestricted => true,
            ComplianceMode::Restricted => compatibility == FipsCompatibility::Certified,
        }
    }

    pub fn is_restricted(&self) -> bool {
        *self == ComplianceMode::Restricted
    }
}

impl fmt::Display for ComplianceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceMode::Unrestricted => write!(f, "unrestricted"),
            ComplianceMode::Restricted => write!(f, "restricted"),
        }
    }
}

impl FromStr for ComplianceMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(ComplianceMode::Unrestricted),
            "restricted" | "fips" => Ok(ComplianceMode::Restricted),
            other => Err(CryptoError::invalid_parameter(
                "compliance_mode",
                "unrestricted or restricted",
                other,
            )),
        }
    }
}

/// The process-wide compliance mode
///
/// # Panics
///
/// Panics if `KEYREG_COMPLIANCE_MODE` holds an unrecognized value. A
/// misconfigured compliance mode must never silently fall back to a default.
pub fn mode() -> ComplianceMode {
    *MODE.get_or_init(initial_mode)
}

/// Whether the process is restricted to certified algorithms
pub fn use_only_certified() -> bool {
    mode().is_restricted()
}

/// Pin the process-wide mode
///
/// Succeeds if the mode was not yet fixed or is already `mode`. Changing an
/// already fixed mode fails.
pub fn set_mode(mode: ComplianceMode) -> CryptoResult<()> {
    let current = *MODE.get_or_init(|| mode);
    if current != mode {
        return Err(CryptoError::InvalidParameter {
            parameter: "compliance_mode".to_string(),
            expected: current.to_string(),
            actual: mode.to_string(),
            error_code: error_codes::COMPLIANCE_MODE_FIXED,
        });
    }
    log::info!("compliance mode fixed to {}", current);
    Ok(())
}

fn initial_mode() -> ComplianceMode {
    match std::env::var(COMPLIANCE_MODE_ENV) {
        Ok(value) => match value.parse() {
            Ok(mode) => mode,
            Err(_) => panic!(
                "{} has unrecognized value {:?}; expected \"unrestricted\" or \"restricted\"",
                COMPLIANCE_MODE_ENV, value
            ),
        },
        Err(std::env::VarError::NotPresent) => default_mode(),
        Err(std::env::VarError::NotUnicode(value)) => panic!(
            "{} has non-unicode value {:?}",
            COMPLIANCE_MODE_ENV, value
        ),
    }
}

fn default_mode() -> ComplianceMode {
    if cfg!(feature = "fips") {
        ComplianceMode::Restricted
    } else {
        ComplianceMode::Unrestricted
    }
}
