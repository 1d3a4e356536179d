//! This library can be used to easily set up a mock Canvas API for testing.

pub use mockito;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

/// The bearer token the mocks expect.
pub const TOKEN: &str = "mock-token";
pub const LEGACY_LTI_URL: &str = "https://lti.longsight.com/vericite/launch";

/// Matches the authorization header sent with the mock token.
pub fn auth_matcher() -> Matcher {
    Matcher::Exact(format!("Bearer {TOKEN}"))
}

/// Matches the pagination query of the given page.
pub fn page_matcher(page: u32, per_page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".to_string(), page.to_string()),
        Matcher::UrlEncoded("per_page".to_string(), per_page.to_string()),
    ])
}

pub fn course_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "account_id": 1,
        "course_code": format!("C{id}"),
        "workflow_state": "available",
    })
}

pub fn assignment_json(course_id: u64, id: u64, name: &str, submission_types: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "course_id": course_id,
        "description": "",
        "due_at": null,
        "points_possible": 10,
        "published": true,
        "submission_types": submission_types,
        "turnitin_enabled": false,
        "vericite_enabled": false,
    })
}

pub fn turnitin_assignment_json(course_id: u64, id: u64, name: &str) -> Value {
    let mut assignment = assignment_json(course_id, id, name, &["online_upload"]);
    assignment["turnitin_enabled"] = json!(true);
    assignment["turnitin_settings"] = json!({
        "originality_report_visibility": "after_grading",
        "exclude_quoted": false,
        "exclude_self_plag": false,
        "store_in_index": true,
    });
    assignment
}

pub fn external_tool_assignment_json(course_id: u64, id: u64, name: &str, url: &str) -> Value {
    let mut assignment = assignment_json(course_id, id, name, &["external_tool"]);
    assignment["external_tool_tag_attributes"] = json!({
        "url": url,
        "new_tab": false,
        "resource_link_id": format!("link-{id}"),
    });
    assignment
}

pub fn attachment_json(id: u64, filename: &str, url: &str) -> Value {
    json!({
        "id": id,
        "filename": filename,
        "display_name": filename,
        "url": url,
        "content-type": "application/pdf",
    })
}

pub fn submission_json(
    assignment_id: u64,
    id: u64,
    user_id: u64,
    submission_type: Option<&str>,
    attachments: Vec<Value>,
) -> Value {
    json!({
        "id": id,
        "assignment_id": assignment_id,
        "user_id": user_id,
        "attempt": 1,
        "submission_type": submission_type,
        "workflow_state": if submission_type.is_some() { "submitted" } else { "unsubmitted" },
        "attachments": attachments,
    })
}

/// Mocks one page of a collection endpoint, expected to be requested exactly once.
/// The path is relative to the server root, e.g. `/courses/9/assignments`.
pub fn mock_page(
    server: &mut ServerGuard,
    path: &str,
    page: u32,
    per_page: u32,
    records: &[Value],
) -> Mock {
    server
        .mock("GET", path)
        .match_query(page_matcher(page, per_page))
        .match_header("authorization", auth_matcher())
        .with_header("content-type", "application/json")
        .with_body(Value::Array(records.to_vec()).to_string())
        .expect(1)
        .create()
}

/// Mocks a collection endpoint that answers every page with the given status.
pub fn mock_collection_error(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body(r#"{"errors":[{"message":"user not authorized to perform that action"}]}"#)
        .create()
}

/// Mocks an assignment update answering with the given status.
pub fn mock_assignment_update(
    server: &mut ServerGuard,
    course_id: u64,
    assignment_id: u64,
    status: usize,
) -> Mock {
    server
        .mock(
            "PUT",
            format!("/courses/{course_id}/assignments/{assignment_id}").as_str(),
        )
        .match_header("authorization", auth_matcher())
        .match_header("content-type", "application/x-www-form-urlencoded")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": assignment_id, "course_id": course_id }).to_string())
        .create()
}

/// Mocks a pre-signed attachment download. No authorization is expected.
pub fn mock_file(server: &mut ServerGuard, path: &str, contents: &[u8]) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .match_header("authorization", Matcher::Missing)
        .with_body(contents)
        .create()
}
