//! Record predicates used to select what the tools act on.
//! All of them are pure and can be passed straight to `CanvasClient::fetch`.

use crate::response::{Assignment, Submission};

pub const ONLINE_UPLOAD: &str = "online_upload";
pub const ONLINE_TEXT_ENTRY: &str = "online_text_entry";

/// Whether the assignment's submission types are exactly the given set.
pub fn has_submission_types(assignment: &Assignment, types: &[&str]) -> bool {
    types
        .iter()
        .all(|t| assignment.submission_types.iter().any(|s| s == t))
        && assignment
            .submission_types
            .iter()
            .all(|s| types.contains(&s.as_str()))
}

/// Assignments VeriCite can check: file uploads, text entries, or exactly both.
pub fn is_vericite_candidate(assignment: &Assignment) -> bool {
    has_submission_types(assignment, &[ONLINE_UPLOAD])
        || has_submission_types(assignment, &[ONLINE_TEXT_ENTRY])
        || has_submission_types(assignment, &[ONLINE_UPLOAD, ONLINE_TEXT_ENTRY])
}

pub fn is_turnitin_enabled(assignment: &Assignment) -> bool {
    assignment.turnitin_enabled
}

/// Whether the assignment's external tool URL contains the needle, used to find assignments still
/// launching a legacy LTI host.
pub fn external_tool_url_contains(assignment: &Assignment, needle: &str) -> bool {
    assignment
        .external_tool_url()
        .map(|url| url.contains(needle))
        .unwrap_or(false)
}

/// Uploaded submissions that have at least one attachment.
pub fn has_downloadable_upload(submission: &Submission) -> bool {
    submission.submission_type.as_deref() == Some(ONLINE_UPLOAD)
        && !submission.attachments.is_empty()
}

/// The selection made by the assignment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    /// Only keep assignments that still have Turnitin enabled.
    pub turnitin_only: bool,
    /// Select external tool assignments pointing at this host instead of VeriCite candidates.
    pub lti_migration_host: Option<String>,
}

impl AssignmentFilter {
    pub fn matches(&self, assignment: &Assignment) -> bool {
        let selected = match &self.lti_migration_host {
            Some(host) => external_tool_url_contains(assignment, host),
            None => is_vericite_candidate(assignment),
        };
        selected && (!self.turnitin_only || is_turnitin_enabled(assignment))
    }
}
