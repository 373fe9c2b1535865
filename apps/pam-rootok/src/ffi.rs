//! # PAM ABI
//!
//! The slice of `<security/_pam_types.h>` the module needs: an opaque handle,
//! three return codes, and argv decoding.

use libc::{c_char, c_int};
use rootok_core::Decision;
use std::ffi::CStr;
use std::marker::{PhantomData, PhantomPinned};

/// Opaque `pam_handle_t`. Only ever seen behind a pointer.
#[repr(C)]
pub struct PamHandle {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// `PAM_SUCCESS`
pub const PAM_SUCCESS: c_int = 0;

/// `PAM_SERVICE_ERR`
pub const PAM_SERVICE_ERR: c_int = 3;

/// `PAM_AUTH_ERR`
pub const PAM_AUTH_ERR: c_int = 7;

/// Map a decision to the code returned to libpam.
#[must_use]
pub const fn pam_code(decision: Decision) -> c_int {
    match decision {
        Decision::Success => PAM_SUCCESS,
        Decision::AuthError => PAM_AUTH_ERR,
        Decision::GenericError => PAM_SERVICE_ERR,
    }
}

/// Decode module arguments.
///
/// A null `argv` or a non-positive `argc` yields no arguments. Null entries
/// are skipped and invalid UTF-8 is replaced, so an unknown-option line is
/// still logged for it.
///
/// # Safety
///
/// When `argv` is non-null it must point to `argc` entries, each null or a
/// NUL-terminated string valid for the duration of the call.
pub unsafe fn collect_args(argc: c_int, argv: *const *const c_char) -> Vec<String> {
    let Ok(count) = usize::try_from(argc) else {
        return Vec::new();
    };
    if argv.is_null() || count == 0 {
        return Vec::new();
    }

    // SAFETY: the caller guarantees `argv` holds `argc` readable entries.
    let entries = unsafe { std::slice::from_raw_parts(argv, count) };

    entries
        .iter()
        .filter(|entry| !entry.is_null())
        // SAFETY: non-null entries are NUL-terminated strings per the caller.
        .map(|&entry| unsafe { CStr::from_ptr(entry) }.to_string_lossy().into_owned())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn decisions_map_to_pam_codes() {
        assert_eq!(pam_code(Decision::Success), 0);
        assert_eq!(pam_code(Decision::AuthError), 7);
        assert_eq!(pam_code(Decision::GenericError), 3);
    }

    #[test]
    fn null_or_empty_argv_yields_nothing() {
        assert!(unsafe { collect_args(3, ptr::null()) }.is_empty());

        let arg = CString::new("debug").expect("cstring");
        let argv = [arg.as_ptr()];
        assert!(unsafe { collect_args(0, argv.as_ptr()) }.is_empty());
        assert!(unsafe { collect_args(-1, argv.as_ptr()) }.is_empty());
    }

    #[test]
    fn null_entries_are_skipped() {
        let debug = CString::new("debug").expect("cstring");
        let other = CString::new("other").expect("cstring");
        let argv = [debug.as_ptr(), ptr::null(), other.as_ptr()];

        let args = unsafe { collect_args(3, argv.as_ptr()) };
        assert_eq!(args, vec!["debug".to_string(), "other".to_string()]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let raw = CString::new(vec![b'd', 0xff, b'g']).expect("cstring");
        let argv = [raw.as_ptr()];

        let args = unsafe { collect_args(1, argv.as_ptr()) };
        assert_eq!(args, vec!["d\u{fffd}g".to_string()]);
    }
}
