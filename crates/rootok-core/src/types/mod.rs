//! # Core Type Definitions
//!
//! This module contains the call-scoped values shared by the parser, the
//! engine and the host adapter:
//! - Caller identity (`Uid`)
//! - Result codes (`Decision`)
//! - Module argument flags (`ControlFlags`)
//! - Lifecycle phases (`Phase`)
//! - Diagnostic severities (`Severity`)
//!
//! ## Lifetime Guarantees
//!
//! Every type here is `Copy` and built fresh inside one entry-point call.
//! Nothing is cached, counted or persisted across calls.

use crate::primitives::SUPERUSER_UID;
use serde::Serialize;
use std::fmt;

// =============================================================================
// IDENTITY
// =============================================================================

/// Numeric operating-system user identity of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Uid(pub u32);

impl Uid {
    /// The superuser identity.
    pub const ROOT: Self = Self(SUPERUSER_UID);

    /// Get the raw identity value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this identity is the superuser.
    #[must_use]
    pub const fn is_superuser(self) -> bool {
        self.0 == SUPERUSER_UID
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// DECISION
// =============================================================================

/// Result code handed back to the host framework.
///
/// The set is closed: every failure inside a call folds into one of these
/// three values and nothing else ever reaches the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The phase succeeded.
    Success,
    /// The caller did not pass the root check.
    AuthError,
    /// The check could not be carried out at all.
    GenericError,
}

impl Decision {
    /// Whether this is [`Decision::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Stable lowercase name, used in logs and probe output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AuthError => "auth_error",
            Self::GenericError => "generic_error",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CONTROL FLAGS
// =============================================================================

/// Bitset of recognized module arguments.
///
/// Only one bit is defined. The representation stays a bitset so the host
/// adapter can log `bits()` without knowing the individual options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ControlFlags(u32);

impl ControlFlags {
    /// Verbose diagnostic logging.
    pub const DEBUG: Self = Self(0o1);

    /// All flags clear.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set every bit of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Whether the `debug` argument was given.
    #[must_use]
    pub const fn debug(self) -> bool {
        self.contains(Self::DEBUG)
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// The four call categories a PAM service module implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `pam_sm_authenticate`
    Authenticate,
    /// `pam_sm_setcred`
    SetCredentials,
    /// `pam_sm_acct_mgmt`
    AccountManagement,
    /// `pam_sm_chauthtok`
    ChangeAuthToken,
}

impl Phase {
    /// Every phase, in PAM management-group order.
    pub const ALL: [Self; 4] = [
        Self::Authenticate,
        Self::SetCredentials,
        Self::AccountManagement,
        Self::ChangeAuthToken,
    ];

    /// Short name matching the PAM entry-point suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::SetCredentials => "setcred",
            Self::AccountManagement => "acct_mgmt",
            Self::ChangeAuthToken => "chauthtok",
        }
    }

    /// Whether the phase runs the root check.
    ///
    /// `setcred` is a fixed-success stub and never consults the engine.
    #[must_use]
    pub const fn runs_root_check(self) -> bool {
        !matches!(self, Self::SetCredentials)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SEVERITY
// =============================================================================

/// Severity of a diagnostic written to the host's logging channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Misconfiguration worth an administrator's attention.
    Error,
    /// Verbose output enabled by the `debug` argument.
    Debug,
}

impl Severity {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Debug => "debug",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
