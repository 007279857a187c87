//! # Validation Results
//!
//! A validation result packs severity, facility and code into one `u32`:
//!
//! ```text
//! bits 30..32  severity (0 = success, 1 = neutral, 3 = failure)
//! bits 16..24  facility
//! bits  0..16  code
//! ```
//!
//! The packed values are a stable enumeration consumed outside the core, so
//! codes are never renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered severity: `Success < Neutral < Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResultSeverity {
    Success = 0,
    Neutral = 1,
    Failure = 3,
}

/// Facility codes shared by entity types, notifications and results.
pub mod facility {
    pub const CORE: u8 = 0x43;
    pub const AGGREGATE: u8 = 0x41;
    pub const LOCK_HASH: u8 = 0x48;
    pub const MOSAIC: u8 = 0x4D;
    pub const NAMESPACE: u8 = 0x4E;
    pub const SIGNATURE: u8 = 0x53;
    pub const TRANSFER: u8 = 0x54;
    pub const MULTISIG: u8 = 0x55;
}

/// Packed validation outcome.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationResult(pub u32);

impl ValidationResult {
    pub const SUCCESS: ValidationResult = ValidationResult(0);
    pub const NEUTRAL: ValidationResult = Self::make(ResultSeverity::Neutral, 0, 0);
    pub const FAILURE: ValidationResult = Self::make(ResultSeverity::Failure, 0, 0);

    /// Packs a result from its parts.
    pub const fn make(severity: ResultSeverity, facility: u8, code: u16) -> Self {
        Self((severity as u32) << 30 | (facility as u32) << 16 | code as u32)
    }

    pub const fn failure(facility: u8, code: u16) -> Self {
        Self::make(ResultSeverity::Failure, facility, code)
    }

    pub const fn neutral(facility: u8, code: u16) -> Self {
        Self::make(ResultSeverity::Neutral, facility, code)
    }

    pub fn severity(self) -> ResultSeverity {
        match self.0 >> 30 {
            0 => ResultSeverity::Success,
            1 => ResultSeverity::Neutral,
            _ => ResultSeverity::Failure,
        }
    }

    pub fn facility(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn code(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    pub fn is_success(self) -> bool {
        self.severity() == ResultSeverity::Success
    }

    pub fn is_failure(self) -> bool {
        self.severity() == ResultSeverity::Failure
    }

    /// The more severe of `self` and `other`; ties keep `self`.
    pub fn worst(self, other: ValidationResult) -> ValidationResult {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl fmt::Debug for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}(facility=0x{:02X}, code={})",
            self.severity(),
            self.facility(),
            self.code()
        )
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// =============================================================================
// CORE RESULTS
// =============================================================================

/// Deadline is before the block time.
pub const FAILURE_CORE_PAST_DEADLINE: ValidationResult =
    ValidationResult::failure(facility::CORE, 1);
/// Deadline is too far past the block time.
pub const FAILURE_CORE_FUTURE_DEADLINE: ValidationResult =
    ValidationResult::failure(facility::CORE, 2);
/// Account balance cannot cover a debit.
pub const FAILURE_CORE_INSUFFICIENT_BALANCE: ValidationResult =
    ValidationResult::failure(facility::CORE, 3);
/// Entity network differs from the configured network.
pub const FAILURE_CORE_WRONG_NETWORK: ValidationResult =
    ValidationResult::failure(facility::CORE, 4);
/// Address checksum or network byte is wrong.
pub const FAILURE_CORE_INVALID_ADDRESS: ValidationResult =
    ValidationResult::failure(facility::CORE, 5);
/// Entity version is outside the plugin's supported range.
pub const FAILURE_CORE_INVALID_VERSION: ValidationResult =
    ValidationResult::failure(facility::CORE, 6);
/// Fee exceeds max fee or the implied fee multiplier overflows.
pub const FAILURE_CORE_INVALID_TRANSACTION_FEE: ValidationResult =
    ValidationResult::failure(facility::CORE, 7);
/// Entity type has no registered plugin.
pub const FAILURE_CORE_UNKNOWN_ENTITY_TYPE: ValidationResult =
    ValidationResult::failure(facility::CORE, 8);
/// A plugin configuration section could not be parsed.
pub const FAILURE_CORE_PLUGIN_CONFIG_MALFORMED: ValidationResult =
    ValidationResult::failure(facility::CORE, 9);
/// Block contains more transactions than allowed.
pub const FAILURE_CORE_TOO_MANY_TRANSACTIONS: ValidationResult =
    ValidationResult::failure(facility::CORE, 10);
/// Signature does not verify against the signer.
pub const FAILURE_SIGNATURE_NOT_VERIFIABLE: ValidationResult =
    ValidationResult::failure(facility::SIGNATURE, 1);
