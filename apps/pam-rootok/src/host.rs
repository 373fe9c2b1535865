//! # Host Capabilities
//!
//! Which optional subsystems this build can talk to, and the policy the
//! engine gets injected with as a result.

use rootok_core::{AccessPolicy, NoPolicy};
use serde::Serialize;

/// Policy handed to the engine by the host adapter.
pub type HostPolicy = Box<dyn AccessPolicy + Send + Sync>;

/// Optional subsystems compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// SELinux support (`selinux` feature).
    pub mandatory_access_control: bool,
    /// Audit forwarding of MAC log messages (`audit` feature).
    pub audit: bool,
}

impl Capabilities {
    /// What the enabled cargo features provide.
    #[must_use]
    pub const fn compiled() -> Self {
        Self {
            mandatory_access_control: cfg!(feature = "selinux"),
            audit: cfg!(feature = "audit"),
        }
    }

    /// No optional subsystem at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            mandatory_access_control: false,
            audit: false,
        }
    }
}

/// Build the policy for one call.
///
/// Asking for MAC support in a build without it falls back to [`NoPolicy`].
pub fn host_policy(capabilities: Capabilities) -> HostPolicy {
    if capabilities.mandatory_access_control {
        if let Some(policy) = mac_policy(capabilities) {
            return policy;
        }
        tracing::debug!("MAC support requested but not compiled in");
    }
    Box::new(NoPolicy)
}

#[cfg(feature = "selinux")]
fn mac_policy(capabilities: Capabilities) -> Option<HostPolicy> {
    Some(Box::new(crate::selinux::SelinuxPolicy::new(
        capabilities.audit,
    )))
}

#[cfg(not(feature = "selinux"))]
fn mac_policy(_capabilities: Capabilities) -> Option<HostPolicy> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootok_core::{PolicyGate, evaluate_gate};

    #[test]
    fn compiled_capabilities_follow_features() {
        let caps = Capabilities::compiled();
        assert_eq!(caps.mandatory_access_control, cfg!(feature = "selinux"));
        assert_eq!(caps.audit, cfg!(feature = "audit"));
        assert!(!caps.audit || caps.mandatory_access_control);
    }

    #[test]
    fn no_capabilities_means_no_policy() {
        let policy = host_policy(Capabilities::none());
        assert!(!policy.is_active());
        assert_eq!(evaluate_gate(&policy), PolicyGate::Inactive);
    }

    #[cfg(not(feature = "selinux"))]
    #[test]
    fn requested_mac_without_support_is_inactive() {
        let policy = host_policy(Capabilities {
            mandatory_access_control: true,
            audit: false,
        });
        assert!(!policy.is_active());
    }
}
