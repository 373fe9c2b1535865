//! # Probe CLI
//!
//! Argument definitions and the probe itself.
//!
//! ## Usage
//!
//! ```bash
//! # What would `auth sufficient pam_rootok.so debug` do for me?
//! rootok-probe -- debug
//!
//! # Pretend to be root under an enforcing policy that denies rootok
//! rootok-probe --uid 0 --simulate-policy deny --json
//! ```

use clap::{Parser, ValueEnum};
use pam_rootok::ffi::pam_code;
use pam_rootok::host::{Capabilities, HostPolicy, host_policy};
use pam_rootok::identity::ProcessIdentity;
use rootok_core::{
    Assessment, CallContext, Decision, FixedIdentity, IdentitySource, Phase, PolicyError,
    RootOkService, StaticPolicy, TracingSink,
};
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// rootok-probe - run the pam_rootok decision outside a PAM stack
///
/// Prints the tentative result the module computes and the result it
/// actually hands back to libpam.
#[derive(Parser, Debug)]
#[command(name = "rootok-probe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Management group to run
    #[arg(short, long, value_enum, default_value_t = PhaseArg::Auth)]
    pub phase: PhaseArg,

    /// Pretend the caller has this uid instead of the real one
    #[arg(short, long)]
    pub uid: Option<u32>,

    /// Replace the compiled MAC policy with a canned answer
    #[arg(short, long, value_enum)]
    pub simulate_policy: Option<SimulatedPolicy>,

    /// Report enforcement as off for a simulated denial
    #[arg(long)]
    pub permissive: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long)]
    pub json: bool,

    /// Module arguments, as written on the PAM stack line
    #[arg(last = true)]
    pub module_args: Vec<String>,
}

/// Management group selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseArg {
    /// pam_sm_authenticate
    Auth,
    /// pam_sm_setcred
    Setcred,
    /// pam_sm_acct_mgmt
    Account,
    /// pam_sm_chauthtok
    Chauthtok,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Auth => Phase::Authenticate,
            PhaseArg::Setcred => Phase::SetCredentials,
            PhaseArg::Account => Phase::AccountManagement,
            PhaseArg::Chauthtok => Phase::ChangeAuthToken,
        }
    }
}

/// Canned MAC policy answers.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedPolicy {
    /// MAC disabled
    Off,
    /// rootok allowed
    Allow,
    /// rootok denied
    Deny,
    /// Subsystem unreachable
    Unavailable,
    /// Security label unreadable
    LabelError,
    /// Access query failed
    QueryError,
}

impl SimulatedPolicy {
    /// Build the canned policy.
    #[must_use]
    pub fn build(self, permissive: bool) -> StaticPolicy {
        let reason = "simulated".to_string();
        match self {
            Self::Off => StaticPolicy::inactive(),
            Self::Allow => StaticPolicy::allowing(),
            Self::Deny => StaticPolicy::denying(!permissive),
            Self::Unavailable => StaticPolicy::failing(PolicyError::Unavailable(reason)),
            Self::LabelError => StaticPolicy::failing(PolicyError::Label(reason)),
            Self::QueryError => StaticPolicy::failing(PolicyError::Query(reason)),
        }
    }
}

// =============================================================================
// PROBE
// =============================================================================

/// Errors from rendering a probe report.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The report could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything one probe run found out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Phase that ran.
    pub phase: Phase,
    /// Subsystems compiled into the adapter.
    pub capabilities: Capabilities,
    /// Whether `--simulate-policy` replaced the compiled policy.
    pub simulated_policy: bool,
    /// Module arguments passed to the phase.
    pub arguments: Vec<String>,
    /// Full root check, absent for `setcred`.
    pub assessment: Option<Assessment>,
    /// Decision handed to libpam.
    pub returned: Decision,
    /// Numeric PAM return code for `returned`.
    pub pam_code: i32,
}

/// Run the requested phase once.
pub fn probe(cli: &Cli) -> ProbeReport {
    let capabilities = Capabilities::compiled();
    let policy: HostPolicy = match cli.simulate_policy {
        Some(simulated) => Box::new(simulated.build(cli.permissive)),
        None => host_policy(capabilities),
    };
    let identity: Box<dyn IdentitySource> = match cli.uid {
        Some(uid) => Box::new(FixedIdentity::user(uid)),
        None => Box::new(ProcessIdentity),
    };

    let sink = TracingSink;
    let ctx = CallContext::new(identity.as_ref(), &sink);
    let service = RootOkService::new(policy);
    let phase = Phase::from(cli.phase);
    let arguments = cli.module_args.as_slice();

    let assessment = service.assess(phase, &ctx, arguments);
    let returned = match assessment {
        Some(assessment) => assessment.returned,
        None => service.dispatch(phase, &ctx, arguments),
    };

    ProbeReport {
        phase,
        capabilities,
        simulated_policy: cli.simulate_policy.is_some(),
        arguments: cli.module_args.clone(),
        assessment,
        returned,
        pam_code: pam_code(returned),
    }
}

/// Render a report as text or JSON.
pub fn render(report: &ProbeReport, json: bool) -> Result<String, ProbeError> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut lines = vec![format!("phase:      {}", report.phase)];

    match &report.assessment {
        Some(assessment) => {
            let role = if assessment.superuser {
                "superuser"
            } else {
                "not superuser"
            };
            let source = if report.simulated_policy {
                " (simulated)"
            } else {
                ""
            };
            lines.push(format!("caller uid: {} ({})", assessment.uid, role));
            lines.push(format!("policy:     {}{}", assessment.gate.as_str(), source));
            lines.push(format!("tentative:  {}", assessment.tentative));
        }
        None => lines.push("root check: skipped (setcred never checks)".to_string()),
    }

    lines.push(format!(
        "returned:   {} (PAM code {})",
        report.returned, report.pam_code
    ));

    if report
        .assessment
        .is_some_and(|a| a.tentative != a.returned)
    {
        lines.push("note:       tentative result discarded; phase always succeeds".to_string());
    }

    Ok(lines.join("\n"))
}

/// Probe and render.
pub fn execute(cli: &Cli) -> Result<String, ProbeError> {
    render(&probe(cli), cli.json)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rootok_core::PolicyGate;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rootok-probe").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_to_auth_with_real_identity() {
        let cli = parse(&[]);
        assert_eq!(cli.phase, PhaseArg::Auth);
        assert_eq!(cli.uid, None);
        assert!(cli.module_args.is_empty());
    }

    #[test]
    fn module_args_follow_double_dash() {
        let cli = parse(&["--phase", "account", "--", "debug", "--weird"]);
        assert_eq!(Phase::from(cli.phase), Phase::AccountManagement);
        assert_eq!(cli.module_args, vec!["debug", "--weird"]);
    }

    #[test]
    fn simulated_denial_for_root() {
        let cli = parse(&["--uid", "0", "--simulate-policy", "deny", "--", "debug"]);
        let report = probe(&cli);

        let assessment = report.assessment.expect("auth checks");
        assert_eq!(assessment.gate, PolicyGate::Denied);
        assert_eq!(assessment.tentative, Decision::AuthError);
        assert_eq!(report.returned, Decision::Success);
        assert_eq!(report.pam_code, 0);
    }

    #[test]
    fn permissive_denial_passes() {
        let cli = parse(&["-u", "0", "-s", "deny", "--permissive"]);
        let assessment = probe(&cli).assessment.expect("auth checks");
        assert_eq!(assessment.gate, PolicyGate::DeniedPermissive);
        assert_eq!(assessment.tentative, Decision::Success);
    }

    #[test]
    fn setcred_has_no_assessment() {
        let cli = parse(&["--phase", "setcred", "--uid", "1000"]);
        let report = probe(&cli);
        assert!(report.assessment.is_none());
        assert_eq!(report.returned, Decision::Success);

        let text = render(&report, false).expect("render");
        assert!(text.contains("skipped"));
    }

    #[test]
    fn text_report_flags_discarded_result() {
        let cli = parse(&["--uid", "1000", "-s", "off"]);
        let text = render(&probe(&cli), false).expect("render");

        assert!(text.contains("caller uid: 1000 (not superuser)"));
        assert!(text.contains("policy:     not_consulted (simulated)"));
        assert!(text.contains("tentative:  auth_error"));
        assert!(text.contains("returned:   success (PAM code 0)"));
        assert!(text.contains("discarded"));
    }

    #[test]
    fn json_report_is_machine_readable() {
        let cli = parse(&["--uid", "0", "-s", "label-error", "--json"]);
        let json = execute(&cli).expect("execute");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["phase"], "authenticate");
        assert_eq!(value["assessment"]["gate"], "label_unavailable");
        assert_eq!(value["assessment"]["tentative"], "generic_error");
        assert_eq!(value["returned"], "success");
        assert_eq!(value["pam_code"], 0);
    }
}
