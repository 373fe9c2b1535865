//! # SELinux Policy Gate
//!
//! Asks libselinux whether the caller's previous context holds
//! `passwd:rootok` on itself.
//!
//! While the query runs, libselinux's process-wide log callback points at
//! this module so AVC messages land in syslog (or audit); the previous
//! callback is restored by a [`ScopedCallback`] on every path out.

use crate::syslog::write_syslog;
use libc::{c_char, c_int, c_void};
use rootok_core::primitives::{POLICY_CLASS, POLICY_PERMISSION};
use rootok_core::{AccessPolicy, CallbackSlot, PolicyError, PolicyVerdict, ScopedCallback};
use std::ffi::{CStr, CString};
use std::io;
use std::ptr::{self, NonNull};

/// `SELINUX_CB_LOG` from `<selinux/selinux.h>`.
const SELINUX_CB_LOG: c_int = 0;

/// Log callback shape registered with libselinux: `int (*)(int, const char *, ...)`.
pub type LogCallback = unsafe extern "C" fn(c_int, *const c_char, ...) -> c_int;

/// `union selinux_callback`, restricted to the log member.
#[repr(C)]
#[derive(Clone, Copy)]
pub union SelinuxCallback {
    func_log: Option<LogCallback>,
}

impl SelinuxCallback {
    /// Wrap a log callback.
    #[must_use]
    pub const fn log(callback: LogCallback) -> Self {
        Self {
            func_log: Some(callback),
        }
    }

    /// Whether a callback is installed at all.
    #[must_use]
    pub fn is_set(self) -> bool {
        // SAFETY: every member of the C union is a single function pointer.
        unsafe { self.func_log.is_some() }
    }
}

#[link(name = "selinux")]
unsafe extern "C" {
    fn is_selinux_enabled() -> c_int;
    fn security_getenforce() -> c_int;
    fn getprevcon_raw(context: *mut *mut c_char) -> c_int;
    fn freecon(context: *mut c_char);
    fn selinux_check_access(
        scon: *const c_char,
        tcon: *const c_char,
        tclass: *const c_char,
        perm: *const c_char,
        auditdata: *mut c_void,
    ) -> c_int;
    fn selinux_get_callback(kind: c_int) -> SelinuxCallback;
    fn selinux_set_callback(kind: c_int, callback: SelinuxCallback);
}

// Variadic entry points from csrc/selinux_log.c. They expand the printf
// template and call the matching `rootok_selinux_*` handler with the text.
unsafe extern "C" {
    fn rootok_selinux_log_syslog(kind: c_int, fmt: *const c_char, ...) -> c_int;
    #[cfg(feature = "audit")]
    fn rootok_selinux_log_audit(kind: c_int, fmt: *const c_char, ...) -> c_int;
}

// =============================================================================
// LOG CALLBACK SLOT
// =============================================================================

/// libselinux's `SELINUX_CB_LOG` slot.
struct LogSlot;

impl CallbackSlot for LogSlot {
    type Callback = SelinuxCallback;

    fn current(&self) -> SelinuxCallback {
        // SAFETY: reading a callback slot has no preconditions.
        unsafe { selinux_get_callback(SELINUX_CB_LOG) }
    }

    fn install(&self, callback: SelinuxCallback) {
        // SAFETY: the callback is either one libselinux handed out or one
        // of ours with a compatible signature.
        unsafe { selinux_set_callback(SELINUX_CB_LOG, callback) };
    }
}

/// Writes an expanded libselinux log message to syslog as `LOG_USER | LOG_INFO`.
#[unsafe(no_mangle)]
pub(crate) unsafe extern "C" fn rootok_selinux_syslog(
    _kind: c_int,
    message: *const c_char,
) -> c_int {
    if !message.is_null() {
        // SAFETY: the shim passes a NUL-terminated buffer it owns for the call.
        write_syslog(libc::LOG_USER | libc::LOG_INFO, unsafe { CStr::from_ptr(message) });
    }
    0
}

// =============================================================================
// SECURITY LABEL
// =============================================================================

/// A raw security context owned by libselinux, freed on drop.
struct SecurityLabel(NonNull<c_char>);

impl SecurityLabel {
    /// The context the process had before its last exec.
    fn previous() -> Result<Self, PolicyError> {
        let mut raw: *mut c_char = ptr::null_mut();
        // SAFETY: `raw` is a valid out-pointer; on success libselinux
        // allocates a context we free in `Drop`.
        if unsafe { getprevcon_raw(&mut raw) } < 0 {
            return Err(PolicyError::Label(io::Error::last_os_error().to_string()));
        }
        NonNull::new(raw)
            .map(Self)
            .ok_or_else(|| PolicyError::Label("empty security context".to_string()))
    }

    fn as_ptr(&self) -> *const c_char {
        self.0.as_ptr()
    }
}

impl Drop for SecurityLabel {
    fn drop(&mut self) {
        // SAFETY: the pointer came from getprevcon_raw and is freed once.
        unsafe { freecon(self.0.as_ptr()) };
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// SELinux-backed [`AccessPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SelinuxPolicy {
    audit: bool,
}

impl SelinuxPolicy {
    /// Create the policy; `audit` routes AVC log lines to the audit subsystem.
    #[must_use]
    pub const fn new(audit: bool) -> Self {
        Self { audit }
    }

    /// Whether AVC log lines go to audit rather than syslog.
    #[must_use]
    pub const fn forwards_to_audit(&self) -> bool {
        self.audit
    }

    fn log_callback(&self) -> LogCallback {
        #[cfg(feature = "audit")]
        if self.forwards_to_audit() {
            return rootok_selinux_log_audit;
        }
        rootok_selinux_log_syslog
    }
}

impl AccessPolicy for SelinuxPolicy {
    fn is_active(&self) -> bool {
        // SAFETY: no preconditions.
        unsafe { is_selinux_enabled() >= 1 }
    }

    fn check_root_ok(&self) -> Result<PolicyVerdict, PolicyError> {
        let log = ScopedCallback::install(&LogSlot, SelinuxCallback::log(self.log_callback()));
        tracing::trace!(
            previous_set = log.previous().is_set(),
            "SELinux log callback swapped in"
        );

        let label = SecurityLabel::previous()?;
        let class = CString::new(POLICY_CLASS).map_err(|e| PolicyError::Query(e.to_string()))?;
        let permission =
            CString::new(POLICY_PERMISSION).map_err(|e| PolicyError::Query(e.to_string()))?;

        // SAFETY: all strings are NUL-terminated and outlive the call; the
        // audit data pointer may be null.
        let status = unsafe {
            selinux_check_access(
                label.as_ptr(),
                label.as_ptr(),
                class.as_ptr(),
                permission.as_ptr(),
                ptr::null_mut(),
            )
        };
        if status == 0 {
            return Ok(PolicyVerdict::Allowed);
        }

        let error = io::Error::last_os_error();
        match error.raw_os_error() {
            Some(libc::EACCES) => Ok(PolicyVerdict::Denied),
            Some(libc::ENOENT | libc::ENOSYS | libc::ECONNREFUSED) => {
                Err(PolicyError::Unavailable(error.to_string()))
            }
            _ => Err(PolicyError::Query(error.to_string())),
        }
    }

    fn is_enforcing(&self) -> Result<bool, PolicyError> {
        // SAFETY: no preconditions.
        match unsafe { security_getenforce() } {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(PolicyError::Query(io::Error::last_os_error().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type MessageSink = unsafe extern "C" fn(c_int, *const c_char) -> c_int;

    unsafe extern "C" {
        fn rootok_log_format(sink: MessageSink, kind: c_int, fmt: *const c_char, ...) -> c_int;
    }

    static CAPTURED: Mutex<Vec<(c_int, String)>> = Mutex::new(Vec::new());

    unsafe extern "C" fn capture(kind: c_int, message: *const c_char) -> c_int {
        // SAFETY: the shim always passes a NUL-terminated buffer.
        let text = unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned();
        CAPTURED.lock().expect("capture lock").push((kind, text));
        0
    }

    fn captured_for(kind: c_int) -> Vec<String> {
        CAPTURED
            .lock()
            .expect("capture lock")
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text.clone())
            .collect()
    }

    #[test]
    fn shim_expands_avc_template() {
        let avc = c"avc:  denied  { rootok } for scontext=user_u:user_r:user_t:s0";
        // SAFETY: "%s" consumes exactly one C string.
        let status = unsafe { rootok_log_format(capture, 3, c"%s".as_ptr(), avc.as_ptr()) };

        assert_eq!(status, 0);
        assert_eq!(captured_for(3), vec![avc.to_string_lossy().into_owned()]);
    }

    #[test]
    fn shim_expands_mixed_arguments() {
        let percent: c_int = 50;
        let total: libc::c_uint = 512;
        // SAFETY: arguments match the conversions in the template.
        unsafe {
            rootok_log_format(
                capture,
                4,
                c"%s: %d%% of %u".as_ptr(),
                c"cache".as_ptr(),
                percent,
                total,
            )
        };

        assert_eq!(captured_for(4), vec!["cache: 50% of 512".to_string()]);
    }

    #[test]
    fn shim_ignores_null_template() {
        // SAFETY: a null template is handled before any argument is read.
        let status = unsafe { rootok_log_format(capture, 5, ptr::null()) };
        assert_eq!(status, 0);
        assert!(captured_for(5).is_empty());
    }

    #[cfg(feature = "audit")]
    #[test]
    fn audit_entry_point_accepts_varargs() {
        // SAFETY: "%s" consumes exactly one C string.
        let status = unsafe {
            rootok_selinux_log_audit(0, c"%s".as_ptr(), c"avc: test message".as_ptr())
        };
        assert_eq!(status, 0);
    }

    #[test]
    fn syslog_entry_point_accepts_varargs() {
        // SAFETY: "%s" consumes exactly one C string.
        let status = unsafe {
            rootok_selinux_log_syslog(0, c"%s".as_ptr(), c"avc: test message".as_ptr())
        };
        assert_eq!(status, 0);
    }

    #[test]
    fn audit_forwarding_is_opt_in() {
        assert!(!SelinuxPolicy::default().forwards_to_audit());
        assert!(SelinuxPolicy::new(true).forwards_to_audit());
    }

    #[test]
    fn wrapped_callback_is_set() {
        assert!(SelinuxCallback::log(rootok_selinux_log_syslog).is_set());
    }

    #[test]
    fn log_slot_is_restored_after_query() {
        let before = LogSlot.current().is_set();
        let _ = SelinuxPolicy::new(false).check_root_ok();
        assert_eq!(LogSlot.current().is_set(), before);
    }
}
