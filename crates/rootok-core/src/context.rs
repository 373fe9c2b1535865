//! # Call Context
//!
//! What the host lends the module for one entry-point invocation: a way to
//! learn who the caller is, and a channel to log to. Both are borrowed, so a
//! context cannot outlive the call that created it.

use crate::sink::DiagnosticSink;
use crate::types::{Severity, Uid};

/// Source of the caller's operating identity.
pub trait IdentitySource {
    /// The caller's user identity.
    fn uid(&self) -> Uid;
}

/// An identity fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIdentity(pub Uid);

impl FixedIdentity {
    /// The superuser.
    #[must_use]
    pub const fn root() -> Self {
        Self(Uid::ROOT)
    }

    /// An arbitrary numeric identity.
    #[must_use]
    pub const fn user(uid: u32) -> Self {
        Self(Uid(uid))
    }
}

impl IdentitySource for FixedIdentity {
    fn uid(&self) -> Uid {
        self.0
    }
}

/// Identity and logging handle for a single call.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    identity: &'a dyn IdentitySource,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> CallContext<'a> {
    /// Borrow an identity source and a sink for the duration of one call.
    pub fn new(identity: &'a dyn IdentitySource, sink: &'a dyn DiagnosticSink) -> Self {
        Self { identity, sink }
    }

    /// The caller's identity, queried fresh on every call.
    #[must_use]
    pub fn caller(&self) -> Uid {
        self.identity.uid()
    }

    /// The host logging channel.
    #[must_use]
    pub fn sink(&self) -> &'a dyn DiagnosticSink {
        self.sink
    }

    /// Write one line to the host logging channel.
    pub fn log(&self, severity: Severity, message: &str) {
        self.sink.log(severity, message);
    }
}

impl std::fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("uid", &self.identity.uid())
            .finish()
    }
}
