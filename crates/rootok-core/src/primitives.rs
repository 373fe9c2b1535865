//! # Fixed Primitives
//!
//! Compile-time constants for the root check.
//!
//! The module carries no runtime configuration beyond its argument list, so
//! every name the host or the MAC policy sees is fixed here.

/// Numeric identity reserved for the privileged account.
pub const SUPERUSER_UID: u32 = 0;

/// The only module argument the parser recognizes.
///
/// Matching is exact and case-sensitive: `Debug` or `debug=1` are unknown.
pub const DEBUG_OPTION: &str = "debug";

/// Object class queried in the MAC policy.
pub const POLICY_CLASS: &str = "passwd";

/// Permission queried in [`POLICY_CLASS`].
pub const POLICY_PERMISSION: &str = "rootok";

/// Name the module logs under when the host cannot prefix it.
pub const MODULE_NAME: &str = "pam_rootok";
