//! # rootok-core
//!
//! The root bypass decision engine behind `pam_rootok` - THE LOGIC.
//!
//! A PAM service module that lets the superuser through the authenticate,
//! account and password phases, optionally vetoed by a mandatory access
//! control policy. This crate holds everything that does not need the PAM
//! ABI or the operating system:
//! - `options` → module argument parsing
//! - `engine` → the root check itself
//! - `policy` → the MAC policy gate
//! - `guard` → scoped swap of a process-wide log callback
//! - `service` → the four-entry-point call surface
//!
//! ## Architectural Constraints
//!
//! - Every value lives for exactly one entry-point call; no caches, no counters
//! - Identity, logging and policy are injected through traits
//! - Nothing panics and nothing is propagated; failures fold into a [`Decision`]
//! - No FFI, no OS calls (see `apps/pam-rootok` for the host adapter)

// =============================================================================
// MODULES
// =============================================================================

pub mod context;
pub mod engine;
pub mod guard;
pub mod options;
pub mod policy;
pub mod primitives;
pub mod service;
pub mod sink;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ControlFlags, Decision, Phase, Severity, Uid};

// =============================================================================
// RE-EXPORTS: Decision Engine
// =============================================================================

pub use context::{CallContext, FixedIdentity, IdentitySource};
pub use engine::{Assessment, RootCheck};
pub use guard::{CallbackSlot, ScopedCallback};
pub use options::parse_options;
pub use policy::{
    AccessPolicy, NoPolicy, PolicyError, PolicyGate, PolicyVerdict, StaticPolicy, evaluate_gate,
};
pub use service::RootOkService;
pub use sink::{DiagnosticSink, LogEntry, MemorySink, NullSink, TracingSink};
