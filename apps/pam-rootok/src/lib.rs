//! # pam_rootok
//!
//! PAM service module that lets the superuser through.
//!
//! ```text
//! # /etc/pam.d/su
//! auth       sufficient   pam_rootok.so debug
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/pam-rootok (THE MODULE)             │
//! │                                                          │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────┐   │
//! │  │ pam_sm_*    │   │ PamSyslog    │   │ SelinuxPolicy│   │
//! │  │ (C ABI)     │   │ (pam_syslog) │   │ (feature)    │   │
//! │  └──────┬──────┘   └──────┬───────┘   └──────┬───────┘   │
//! │         └─────────────────┼──────────────────┘           │
//! │                           ▼                              │
//! │                   ┌───────────────┐                      │
//! │                   │  rootok-core  │                      │
//! │                   │  (THE LOGIC)  │                      │
//! │                   └───────────────┘                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entry point builds its sink, identity and policy from scratch and
//! drops them before returning. `pam_sm_setcred` returns `PAM_SUCCESS`
//! without touching its arguments.

pub mod ffi;
pub mod host;
pub mod identity;
pub mod syslog;

#[cfg(feature = "audit")]
mod audit;
#[cfg(feature = "selinux")]
pub mod selinux;

use ffi::{PAM_SERVICE_ERR, PAM_SUCCESS, PamHandle, collect_args, pam_code};
use host::{Capabilities, host_policy};
use identity::ProcessIdentity;
use libc::{c_char, c_int};
use rootok_core::{CallContext, Phase, RootOkService};
use std::panic::{AssertUnwindSafe, catch_unwind};
use syslog::PamSyslog;

// =============================================================================
// SHARED CALL PATH
// =============================================================================

/// Run one checking phase against the live process.
///
/// # Safety
///
/// `pamh` must be null or the handle libpam passed to the current call, and
/// `argc`/`argv` must satisfy [`collect_args`].
unsafe fn run_phase(
    phase: Phase,
    pamh: *mut PamHandle,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: forwarded from the caller's contract.
        let handle = unsafe { pamh.as_ref() };
        // SAFETY: forwarded from the caller's contract.
        let args = unsafe { collect_args(argc, argv) };

        let sink = PamSyslog::new(handle);
        let identity = ProcessIdentity;
        let ctx = CallContext::new(&identity, &sink);
        let service = RootOkService::new(host_policy(Capabilities::compiled()));

        service.dispatch(phase, &ctx, args.as_slice())
    }));

    match outcome {
        Ok(decision) => pam_code(decision),
        Err(_) => {
            tracing::error!(phase = phase.as_str(), "root check panicked");
            PAM_SERVICE_ERR
        }
    }
}

// =============================================================================
// PAM ENTRY POINTS
// =============================================================================

/// `auth` management group: authenticate.
///
/// # Safety
///
/// Called by libpam with a valid handle and argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_authenticate(
    pamh: *mut PamHandle,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    // SAFETY: libpam's calling contract.
    unsafe { run_phase(Phase::Authenticate, pamh, argc, argv) }
}

/// `auth` management group: set credentials. Always `PAM_SUCCESS`.
#[unsafe(no_mangle)]
pub extern "C" fn pam_sm_setcred(
    _pamh: *mut PamHandle,
    _flags: c_int,
    _argc: c_int,
    _argv: *const *const c_char,
) -> c_int {
    PAM_SUCCESS
}

/// `account` management group.
///
/// # Safety
///
/// Called by libpam with a valid handle and argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_acct_mgmt(
    pamh: *mut PamHandle,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    // SAFETY: libpam's calling contract.
    unsafe { run_phase(Phase::AccountManagement, pamh, argc, argv) }
}

/// `password` management group.
///
/// # Safety
///
/// Called by libpam with a valid handle and argument vector.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_chauthtok(
    pamh: *mut PamHandle,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    // SAFETY: libpam's calling contract.
    unsafe { run_phase(Phase::ChangeAuthToken, pamh, argc, argv) }
}
