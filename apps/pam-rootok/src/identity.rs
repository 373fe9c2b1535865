//! Caller identity from the operating system.

use rootok_core::{IdentitySource, Uid};

/// The calling process's real user id.
///
/// The real id is what distinguishes "root ran su" from "a setuid binary
/// is running on behalf of someone else".
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdentity;

impl IdentitySource for ProcessIdentity {
    fn uid(&self) -> Uid {
        Uid(nix::unistd::getuid().as_raw())
    }
}
