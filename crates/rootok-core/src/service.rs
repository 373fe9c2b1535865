//! # Service Facade
//!
//! The host framework requires four entry points. Three of them run the same
//! root check; `setcred` is a fixed-success stub. [`RootOkService`] exposes
//! that call surface and forwards to one [`RootCheck`].

use crate::context::CallContext;
use crate::engine::{Assessment, RootCheck};
use crate::options::parse_options;
use crate::policy::AccessPolicy;
use crate::types::{Decision, Phase};

/// The module's four entry points over an injected MAC policy.
#[derive(Debug, Clone, Default)]
pub struct RootOkService<P> {
    check: RootCheck<P>,
}

impl<P: AccessPolicy> RootOkService<P> {
    /// Create a service consulting `policy`.
    #[must_use]
    pub const fn new(policy: P) -> Self {
        Self {
            check: RootCheck::new(policy),
        }
    }

    /// The underlying engine.
    #[must_use]
    pub fn engine(&self) -> &RootCheck<P> {
        &self.check
    }

    /// Authentication phase.
    pub fn authenticate<S: AsRef<str>>(&self, ctx: &CallContext<'_>, options: &[S]) -> Decision {
        self.run(Phase::Authenticate, ctx, options)
    }

    /// Credential phase. Always succeeds without looking at anything.
    pub fn set_credentials<S: AsRef<str>>(
        &self,
        _ctx: &CallContext<'_>,
        _options: &[S],
    ) -> Decision {
        Decision::Success
    }

    /// Account-management phase.
    pub fn manage_account<S: AsRef<str>>(&self, ctx: &CallContext<'_>, options: &[S]) -> Decision {
        self.run(Phase::AccountManagement, ctx, options)
    }

    /// Authentication-token change phase.
    pub fn change_auth_token<S: AsRef<str>>(
        &self,
        ctx: &CallContext<'_>,
        options: &[S],
    ) -> Decision {
        self.run(Phase::ChangeAuthToken, ctx, options)
    }

    /// Route a call by phase.
    pub fn dispatch<S: AsRef<str>>(
        &self,
        phase: Phase,
        ctx: &CallContext<'_>,
        options: &[S],
    ) -> Decision {
        match phase {
            Phase::Authenticate => self.authenticate(ctx, options),
            Phase::SetCredentials => self.set_credentials(ctx, options),
            Phase::AccountManagement => self.manage_account(ctx, options),
            Phase::ChangeAuthToken => self.change_auth_token(ctx, options),
        }
    }

    /// Run a phase and return the full assessment.
    ///
    /// Returns `None` for [`Phase::SetCredentials`], which never checks.
    pub fn assess<S: AsRef<str>>(
        &self,
        phase: Phase,
        ctx: &CallContext<'_>,
        options: &[S],
    ) -> Option<Assessment> {
        if !phase.runs_root_check() {
            return None;
        }

        let _span = tracing::debug_span!("rootok", phase = phase.as_str()).entered();
        let flags = parse_options(options, ctx.sink());
        Some(self.check.assess(ctx, flags))
    }

    fn run<S: AsRef<str>>(&self, phase: Phase, ctx: &CallContext<'_>, options: &[S]) -> Decision {
        self.assess(phase, ctx, options)
            .map(|assessment| assessment.returned)
            .unwrap_or(Decision::Success)
    }
}

// =============================================================================
// TESTS
// =============================================================================
