//! Forwarding of SELinux log lines to the Linux audit subsystem.

use crate::selinux::rootok_selinux_syslog;
use libc::{c_char, c_int};
use std::ffi::CStr;
use std::ptr;

/// `AUDIT_USER_AVC` from `<linux/audit.h>`.
const AUDIT_USER_AVC: c_int = 1107;

#[link(name = "audit")]
unsafe extern "C" {
    fn audit_open() -> c_int;
    fn audit_close(fd: c_int);
    fn audit_log_user_avc_message(
        audit_fd: c_int,
        kind: c_int,
        message: *const c_char,
        hostname: *const c_char,
        addr: *const c_char,
        tty: *const c_char,
        uid: libc::uid_t,
    ) -> c_int;
}

/// An open audit netlink socket, closed on drop.
struct AuditSocket(c_int);

impl AuditSocket {
    fn open() -> Option<Self> {
        // SAFETY: no preconditions; a negative return means no socket.
        let fd = unsafe { audit_open() };
        (fd >= 0).then_some(Self(fd))
    }

    fn send_user_avc(&self, message: &CStr) {
        // SAFETY: `message` is NUL-terminated; the optional fields may be null.
        unsafe {
            audit_log_user_avc_message(
                self.0,
                AUDIT_USER_AVC,
                message.as_ptr(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                0,
            )
        };
    }
}

impl Drop for AuditSocket {
    fn drop(&mut self) {
        // SAFETY: the descriptor came from audit_open and is closed once.
        unsafe { audit_close(self.0) };
    }
}

/// Sends an expanded libselinux log message to audit as `AUDIT_USER_AVC`,
/// or to syslog if no audit socket can be opened.
#[unsafe(no_mangle)]
pub(crate) unsafe extern "C" fn rootok_selinux_audit(kind: c_int, message: *const c_char) -> c_int {
    if message.is_null() {
        return 0;
    }

    match AuditSocket::open() {
        Some(socket) => {
            // SAFETY: the shim passes a NUL-terminated buffer it owns for the call.
            socket.send_user_avc(unsafe { CStr::from_ptr(message) });
            0
        }
        // SAFETY: same buffer the shim handed us.
        None => unsafe { rootok_selinux_syslog(kind, message) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_message_is_dropped() {
        // SAFETY: a null message is rejected before it is read.
        assert_eq!(unsafe { rootok_selinux_audit(0, ptr::null()) }, 0);
    }

    #[test]
    fn message_reaches_audit_or_syslog() {
        let message = c"avc:  denied  { rootok } for pid=1 comm=\"su\"";
        // SAFETY: NUL-terminated message.
        assert_eq!(unsafe { rootok_selinux_audit(0, message.as_ptr()) }, 0);
    }
}
