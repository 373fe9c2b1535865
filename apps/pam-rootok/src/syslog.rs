//! # Host Logging
//!
//! Diagnostics go through `pam_syslog(3)`, which prefixes each line with the
//! module, service and management group. The symbol is looked up in the
//! objects already loaded into the process, so the module does not link
//! libpam itself and runs unchanged outside a PAM host (tests, the probe).
//! Without it, lines go to plain `syslog(3)` under `LOG_AUTHPRIV`.

use crate::ffi::PamHandle;
use libc::{c_char, c_int, c_void};
use rootok_core::primitives::MODULE_NAME;
use rootok_core::{DiagnosticSink, Severity};
use std::ffi::{CStr, CString};

/// `void pam_syslog(const pam_handle_t *, int, const char *, ...)`.
pub type PamSyslogFn = unsafe extern "C" fn(*const PamHandle, c_int, *const c_char, ...);

/// Sink writing to the host's logging channel for one call.
pub struct PamSyslog<'a> {
    handle: Option<&'a PamHandle>,
    pam_syslog: Option<PamSyslogFn>,
}

impl<'a> PamSyslog<'a> {
    /// Borrow the PAM handle for the duration of the call.
    pub fn new(handle: Option<&'a PamHandle>) -> Self {
        let pam_syslog = handle.and_then(|_| resolve_pam_syslog());
        Self { handle, pam_syslog }
    }

    /// Log through an explicit `pam_syslog` implementation.
    pub fn with_writer(handle: &'a PamHandle, pam_syslog: PamSyslogFn) -> Self {
        Self {
            handle: Some(handle),
            pam_syslog: Some(pam_syslog),
        }
    }

    /// Whether lines go through `pam_syslog` rather than plain syslog.
    pub fn uses_pam_syslog(&self) -> bool {
        self.handle.is_some() && self.pam_syslog.is_some()
    }
}

impl DiagnosticSink for PamSyslog<'_> {
    fn log(&self, severity: Severity, message: &str) {
        let priority = priority(severity);
        let text = to_cstring(message);

        match (self.handle, self.pam_syslog) {
            (Some(handle), Some(pam_syslog)) => {
                // SAFETY: `handle` is the live handle libpam passed to this
                // call and "%s" consumes exactly one C string argument.
                unsafe { pam_syslog(handle, priority, c"%s".as_ptr(), text.as_ptr()) };
            }
            _ => write_syslog(libc::LOG_AUTHPRIV | priority, &text),
        }
    }
}

/// syslog priority for a diagnostic severity.
#[must_use]
pub const fn priority(severity: Severity) -> c_int {
    match severity {
        Severity::Error => libc::LOG_ERR,
        Severity::Debug => libc::LOG_DEBUG,
    }
}

/// Convert a message for C, escaping interior NUL bytes instead of truncating.
#[must_use]
pub fn to_cstring(message: &str) -> CString {
    CString::new(message.replace('\0', "\\0")).unwrap_or_default()
}

/// Write one line to `syslog(3)` with the module name prefixed.
pub(crate) fn write_syslog(facility_priority: c_int, text: &CStr) {
    let line = to_cstring(&format!("{}: {}", MODULE_NAME, text.to_string_lossy()));
    // SAFETY: "%s" consumes exactly one NUL-terminated string.
    unsafe { libc::syslog(facility_priority, c"%s".as_ptr(), line.as_ptr()) };
}

fn resolve_pam_syslog() -> Option<PamSyslogFn> {
    // SAFETY: RTLD_DEFAULT only searches objects already mapped into the
    // process; the name is a valid C string.
    let symbol = unsafe { libc::dlsym(libc::RTLD_DEFAULT, c"pam_syslog".as_ptr()) };
    if symbol.is_null() {
        return None;
    }
    // SAFETY: libpam exports pam_syslog with exactly this signature.
    Some(unsafe { std::mem::transmute::<*mut c_void, PamSyslogFn>(symbol) })
}

// =============================================================================
// TESTS
// =============================================================================
