//! # Option Parser
//!
//! Turns the module arguments from the PAM stack line into [`ControlFlags`].
//!
//! Parsing never fails. Unknown arguments are reported on the host logging
//! channel and skipped, so a typo in `/etc/pam.d` degrades verbosity instead
//! of locking anyone out.

use crate::primitives::DEBUG_OPTION;
use crate::sink::DiagnosticSink;
use crate::types::{ControlFlags, Severity};

/// Parse module arguments into flags.
///
/// Every token is visited. `debug` sets [`ControlFlags::DEBUG`]; anything
/// else logs `unknown option: <token>` at [`Severity::Error`].
pub fn parse_options<I, S>(tokens: I, sink: &dyn DiagnosticSink) -> ControlFlags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = ControlFlags::empty();

    for token in tokens {
        let token = token.as_ref();
        if token == DEBUG_OPTION {
            flags.insert(ControlFlags::DEBUG);
        } else {
            sink.log(Severity::Error, &format!("unknown option: {}", token));
        }
    }

    flags
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn empty_arguments_clear_all_flags() {
        let sink = MemorySink::new();
        let flags = parse_options(Vec::<String>::new(), &sink);

        assert_eq!(flags, ControlFlags::empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn debug_sets_flag_silently() {
        let sink = MemorySink::new();
        let flags = parse_options(["debug"], &sink);

        assert!(flags.debug());
        assert!(sink.is_empty());
    }

    #[test]
    fn match_is_case_sensitive_and_exact() {
        let sink = MemorySink::new();
        let flags = parse_options(["Debug", "DEBUG", "debug=1", " debug"], &sink);

        assert!(!flags.debug());
        assert_eq!(sink.count(Severity::Error), 4);
    }

    #[test]
    fn unknown_option_names_the_token() {
        let sink = MemorySink::new();
        let _ = parse_options(["nullok"], &sink);

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].severity, Severity::Error);
        assert_eq!(entries[0].message, "unknown option: nullok");
    }

    #[test]
    fn parsing_continues_past_unknown_tokens() {
        let sink = MemorySink::new();
        let flags = parse_options(["bogus", "", "debug", "also_bogus"], &sink);

        assert!(flags.debug());
        assert_eq!(sink.count(Severity::Error), 3);
    }
}
