//! Contains types which model the JSON responses from the Canvas API.
//! Only the fields the tools consume are modelled, unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};

// Canvas sends null for a number of fields that are conceptually empty lists or false
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// get accounts/{account_id}/courses
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Course {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub account_id: Option<u64>,
}

/// get courses/{course_id}/assignments
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Assignment {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub course_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submission_types: Vec<String>,
    #[serde(default)]
    pub external_tool_tag_attributes: Option<ExternalToolTagAttributes>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub turnitin_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vericite_enabled: bool,
    /// Shared between the Turnitin and VeriCite integrations.
    #[serde(default)]
    pub turnitin_settings: Option<TurnitinSettings>,
}

impl Assignment {
    /// The launch URL of the external tool the assignment points at, if any.
    pub fn external_tool_url(&self) -> Option<&str> {
        self.external_tool_tag_attributes
            .as_ref()
            .and_then(|attrs| attrs.url.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExternalToolTagAttributes {
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_tab: bool,
    pub resource_link_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TurnitinSettings {
    pub originality_report_visibility: Option<String>,
    pub exclude_quoted: Option<bool>,
    pub exclude_self_plag: Option<bool>,
    pub store_in_index: Option<bool>,
}

/// get courses/{course_id}/assignments/{assignment_id}/submissions
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Submission {
    pub id: u64,
    pub assignment_id: u64,
    pub user_id: u64,
    /// Null for submissions that have not been submitted.
    pub submission_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Attachment {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    /// Pre-signed download URL, may be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}
