//! Contains types used to make requests to the Canvas API.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Builds a bracketed form field path, e.g. `["assignment", "turnitin_settings", "exclude_quoted"]`
/// becomes `assignment[turnitin_settings][exclude_quoted]`.
pub fn field_path(segments: &[&str]) -> String {
    let mut segments = segments.iter();
    let mut path = segments.next().map(|s| s.to_string()).unwrap_or_default();
    for segment in segments {
        path.push('[');
        path.push_str(segment);
        path.push(']');
    }
    path
}

/// An ordered set of form field assignments.
/// Setting a path that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let path = path.into();
        let value = value.into();
        if let Some(existing) = self.0.iter_mut().find(|(p, _)| *p == path) {
            existing.1 = value;
        } else {
            self.0.push((path, value));
        }
        self
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Points the assignment's external tool at the given launch URL.
    pub fn assignment_external_tool_url(url: &str) -> Self {
        let mut fields = Self::new();
        fields.set(
            field_path(&["assignment", "external_tool_tag_attributes", "url"]),
            url,
        );
        fields
    }

    /// Switches the assignment from Turnitin to VeriCite with the given settings.
    pub fn assignment_vericite(settings: &VericiteSettings) -> Self {
        let setting = |name: &str| field_path(&["assignment", "turnitin_settings", name]);
        let mut fields = Self::new();
        fields
            .set(field_path(&["assignment", "turnitin_enabled"]), "false")
            .set(field_path(&["assignment", "vericite_enabled"]), "true")
            .set(
                setting("originality_report_visibility"),
                settings.visibility.to_string(),
            )
            .set(
                setting("exclude_quoted"),
                settings.exclude_quoted.to_string(),
            )
            .set(
                setting("exclude_self_plag"),
                settings.exclude_self_plag.to_string(),
            )
            .set(
                setting("store_in_index"),
                settings.store_in_index.to_string(),
            );
        fields
    }
}

/// A full-field overwrite of a single resource.
/// Sending the same request again leaves the resource in the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    /// Relative to the API root, e.g. `courses/101/assignments/55`.
    pub path: String,
    pub fields: FormFields,
}

impl MutationRequest {
    pub fn assignment(course_id: u64, assignment_id: u64, fields: FormFields) -> Self {
        Self {
            path: format!("courses/{course_id}/assignments/{assignment_id}"),
            fields,
        }
    }
}

/// When students can see the originality report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Immediate,
    AfterGrading,
    AfterDueDate,
    Never,
}

impl Visibility {
    pub const ALL: [Visibility; 4] = [
        Self::Immediate,
        Self::AfterGrading,
        Self::AfterDueDate,
        Self::Never,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::AfterGrading => "after_grading",
            Self::AfterDueDate => "after_due_date",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Visibility can only be one of the following: immediate, after_grading, after_due_date, never (got '{0}')")]
pub struct InvalidVisibility(pub String);

impl FromStr for Visibility {
    type Err = InvalidVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| InvalidVisibility(s.to_string()))
    }
}

/// The plagiarism detection settings written when enabling VeriCite on an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VericiteSettings {
    pub visibility: Visibility,
    pub exclude_quoted: bool,
    pub exclude_self_plag: bool,
    pub store_in_index: bool,
}

impl Default for VericiteSettings {
    fn default() -> Self {
        Self {
            visibility: Visibility::Immediate,
            exclude_quoted: true,
            exclude_self_plag: true,
            store_in_index: true,
        }
    }
}
