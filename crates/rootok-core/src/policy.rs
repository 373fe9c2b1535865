//! # Policy Gate
//!
//! Mandatory access control can veto a root bypass. The core never talks to a
//! MAC implementation directly; it asks an [`AccessPolicy`] three questions
//! and folds the answers into a [`PolicyGate`].
//!
//! ## Gate Rules
//!
//! | Policy state                          | Gate               | Tentative      |
//! |---------------------------------------|--------------------|----------------|
//! | inactive                              | `Inactive`         | `Success`      |
//! | allows `rootok`                       | `Allowed`          | `Success`      |
//! | denies, permissive                    | `DeniedPermissive` | `Success`      |
//! | denies, enforcing or mode unreadable  | `Denied`           | `AuthError`    |
//! | subsystem unavailable                 | `Unavailable`      | `AuthError`    |
//! | access query failed                   | `QueryFailed`      | `AuthError`    |
//! | security label unobtainable           | `LabelUnavailable` | `GenericError` |

use crate::types::Decision;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// POLICY TRAIT
// =============================================================================

/// Explicit answer from the MAC policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyVerdict {
    /// The policy grants `passwd:rootok` to the caller's label.
    Allowed,
    /// The policy refuses it.
    Denied,
}

/// Failures of the query machinery, as opposed to a policy denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The MAC subsystem could not be reached.
    #[error("policy subsystem unavailable: {0}")]
    Unavailable(String),

    /// The caller's security label could not be obtained.
    #[error("cannot obtain security label: {0}")]
    Label(String),

    /// The access query itself failed.
    #[error("access query failed: {0}")]
    Query(String),
}

/// A mandatory-access-control subsystem the engine can consult.
///
/// Implementations must release whatever they acquire (labels, log
/// callbacks, descriptors) before each method returns.
pub trait AccessPolicy {
    /// Whether the subsystem is enabled on this host.
    fn is_active(&self) -> bool;

    /// Ask whether the caller's label holds `passwd:rootok` on itself.
    fn check_root_ok(&self) -> Result<PolicyVerdict, PolicyError>;

    /// Whether denials are enforced (`true`) or only logged (`false`).
    fn is_enforcing(&self) -> Result<bool, PolicyError>;
}

impl<T: AccessPolicy + ?Sized> AccessPolicy for Box<T> {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn check_root_ok(&self) -> Result<PolicyVerdict, PolicyError> {
        (**self).check_root_ok()
    }

    fn is_enforcing(&self) -> Result<bool, PolicyError> {
        (**self).is_enforcing()
    }
}

// =============================================================================
// BUILT-IN POLICIES
// =============================================================================

/// Host without mandatory access control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPolicy;

impl AccessPolicy for NoPolicy {
    fn is_active(&self) -> bool {
        false
    }

    fn check_root_ok(&self) -> Result<PolicyVerdict, PolicyError> {
        Ok(PolicyVerdict::Allowed)
    }

    fn is_enforcing(&self) -> Result<bool, PolicyError> {
        Ok(false)
    }
}

/// A policy with canned answers.
///
/// Lets callers exercise every gate outcome without a live MAC subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPolicy {
    active: bool,
    verdict: Result<PolicyVerdict, PolicyError>,
    enforcing: Result<bool, PolicyError>,
}

impl StaticPolicy {
    /// Disabled subsystem.
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            active: false,
            verdict: Ok(PolicyVerdict::Allowed),
            enforcing: Ok(true),
        }
    }

    /// Active, enforcing, and allowing `rootok`.
    #[must_use]
    pub fn allowing() -> Self {
        Self {
            active: true,
            verdict: Ok(PolicyVerdict::Allowed),
            enforcing: Ok(true),
        }
    }

    /// Active and denying `rootok`.
    #[must_use]
    pub fn denying(enforcing: bool) -> Self {
        Self {
            active: true,
            verdict: Ok(PolicyVerdict::Denied),
            enforcing: Ok(enforcing),
        }
    }

    /// Active, with the access query failing.
    #[must_use]
    pub fn failing(error: PolicyError) -> Self {
        Self {
            active: true,
            verdict: Err(error),
            enforcing: Ok(true),
        }
    }

    /// Override the enforcement answer.
    #[must_use]
    pub fn with_enforcement(mut self, enforcing: Result<bool, PolicyError>) -> Self {
        self.enforcing = enforcing;
        self
    }
}

impl AccessPolicy for StaticPolicy {
    fn is_active(&self) -> bool {
        self.active
    }

    fn check_root_ok(&self) -> Result<PolicyVerdict, PolicyError> {
        self.verdict.clone()
    }

    fn is_enforcing(&self) -> Result<bool, PolicyError> {
        self.enforcing.clone()
    }
}

// =============================================================================
// GATE EVALUATION
// =============================================================================

/// Outcome of consulting the policy for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyGate {
    /// The caller was not the superuser, so the policy was never asked.
    NotConsulted,
    /// No MAC subsystem enabled.
    Inactive,
    /// The policy allowed the bypass.
    Allowed,
    /// The policy denied it, but enforcement is off.
    DeniedPermissive,
    /// The policy denied it and the denial stands.
    Denied,
    /// The subsystem could not be reached.
    Unavailable,
    /// The caller's security label could not be read.
    LabelUnavailable,
    /// The access query machinery failed.
    QueryFailed,
}

impl PolicyGate {
    /// Whether the gate lets the superuser through.
    #[must_use]
    pub const fn passes(self) -> bool {
        matches!(self, Self::Inactive | Self::Allowed | Self::DeniedPermissive)
    }

    /// Tentative decision implied by this gate.
    #[must_use]
    pub const fn tentative(self) -> Decision {
        match self {
            Self::Inactive | Self::Allowed | Self::DeniedPermissive => Decision::Success,
            Self::LabelUnavailable => Decision::GenericError,
            Self::NotConsulted | Self::Denied | Self::Unavailable | Self::QueryFailed => {
                Decision::AuthError
            }
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotConsulted => "not_consulted",
            Self::Inactive => "inactive",
            Self::Allowed => "allowed",
            Self::DeniedPermissive => "denied_permissive",
            Self::Denied => "denied",
            Self::Unavailable => "unavailable",
            Self::LabelUnavailable => "label_unavailable",
            Self::QueryFailed => "query_failed",
        }
    }
}

/// Consult `policy` on behalf of a superuser caller.
///
/// Never fails: every error is folded into the returned gate.
pub fn evaluate_gate<P: AccessPolicy + ?Sized>(policy: &P) -> PolicyGate {
    if !policy.is_active() {
        tracing::trace!("MAC subsystem inactive, gate open");
        return PolicyGate::Inactive;
    }

    match policy.check_root_ok() {
        Ok(PolicyVerdict::Allowed) => PolicyGate::Allowed,
        Ok(PolicyVerdict::Denied) => match policy.is_enforcing() {
            Ok(false) => PolicyGate::DeniedPermissive,
            Ok(true) => PolicyGate::Denied,
            Err(e) => {
                tracing::debug!(error = %e, "enforcement mode unreadable, keeping denial");
                PolicyGate::Denied
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "rootok access query did not complete");
            match e {
                PolicyError::Unavailable(_) => PolicyGate::Unavailable,
                PolicyError::Label(_) => PolicyGate::LabelUnavailable,
                PolicyError::Query(_) => PolicyGate::QueryFailed,
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
