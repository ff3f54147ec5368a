//! Terminal output: negotiation progress and search outcomes.

use jurisearch_core::{Jurisdiction, PreconditionViolation, Progress};
use jurisearch_portal::SearchError;

/// Redraw the startup progress line on stderr.
pub fn render_progress(progress: Progress) {
    eprint!("\r  Starting... {:>4}", progress.to_string());
}

pub fn finish_progress() {
    eprintln!();
}

/// Print the jurisdiction catalog.
pub fn print_jurisdictions() {
    println!("{:<14} {}", "label", "filter id");
    for j in Jurisdiction::ALL {
        println!("{:<14} {}", j.label(), j.filter_id());
    }
}

/// User-facing message for a search that produced no count.
pub fn search_failure_message(err: &SearchError, reauth_enabled: bool) -> String {
    match err {
        SearchError::Precondition(PreconditionViolation::MissingToken) => {
            "No active session. Please restart.".to_string()
        }
        SearchError::Precondition(e) => format!("Invalid search: {e}"),
        SearchError::SessionExpired if reauth_enabled => {
            "Token expired and could not be renewed. Please restart.".to_string()
        }
        SearchError::SessionExpired => {
            "Token expired. Please restart or re-run with --reauth.".to_string()
        }
        SearchError::Transient(e) => {
            format!("Something went wrong: {e}. See the log for details.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jurisearch_portal::PortalError;

    #[test]
    fn expiry_message_mentions_reauth_flag() {
        let msg = search_failure_message(&SearchError::SessionExpired, false);
        assert!(msg.contains("--reauth"));
    }

    #[test]
    fn precondition_message_names_the_problem() {
        let err = SearchError::Precondition(PreconditionViolation::NoJurisdictions);
        assert_eq!(
            search_failure_message(&err, false),
            "Invalid search: no jurisdiction selected"
        );
    }

    #[test]
    fn missing_session_does_not_blame_the_input() {
        let err = SearchError::Precondition(PreconditionViolation::MissingToken);
        let msg = search_failure_message(&err, true);
        assert_eq!(msg, "No active session. Please restart.");
        assert!(!msg.contains("Invalid search"));
    }

    #[test]
    fn transient_message_points_to_log() {
        let err = SearchError::Transient(PortalError::UnexpectedResponse("captcha".into()));
        let msg = search_failure_message(&err, true);
        assert!(msg.contains("captcha"));
        assert!(msg.contains("log"));
    }
}
