use canvas_server_mock::{
    assignment_json, attachment_json, auth_matcher, course_json, external_tool_assignment_json,
    mock_assignment_update, mock_collection_error, mock_file, mock_page, submission_json,
    turnitin_assignment_json, LEGACY_LTI_URL, TOKEN,
};
use canvas_tools_cli::app::Cli;
use clap::Parser;
use mockito::{Matcher, Server};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::{fs, path::Path, sync::Mutex};
use tempfile::{tempdir, TempDir};

// keeps every record logged by the crates under test so the tests can inspect them
struct CapturingLogger;

static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static LOGGER: CapturingLogger = CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("canvas_tools")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            CAPTURED
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

// records at exactly `level` that contain `needle`
fn captured(level: Level, needle: &str) -> Vec<String> {
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .filter(|(l, message)| *l == level && message.contains(needle))
        .map(|(_, message)| message.clone())
        .collect()
}

fn write_input(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path_string(&path)
}

fn path_string(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

// global options pointing at the mock server, followed by the subcommand
fn cli(server: &Server, args: &[&str]) -> Cli {
    let url = server.url();
    let mut full = vec![
        "canvas-tools",
        "--url",
        url.as_str(),
        "--token",
        TOKEN,
        "--delay-ms",
        "0",
    ];
    full.extend_from_slice(args);
    Cli::parse_from(full)
}

#[test]
fn rewrites_assignment_urls_from_csv() {
    init();
    let mut server = Server::new();
    let m = server
        .mock("PUT", "/courses/101/assignments/55")
        .match_header("authorization", auth_matcher())
        .match_body(Matcher::UrlEncoded(
            "assignment[external_tool_tag_attributes][url]".into(),
            "https://api.vericite.com/web/v1/authenticate/lti".into(),
        ))
        .with_body(r#"{"id":55}"#)
        .expect(1)
        .create();

    let temp = tempdir().unwrap();
    let input = write_input(
        &temp,
        "assignments.csv",
        "courseId,assignmentId,assignmentName\n101,55,CalcHW1\n",
    );
    let cli = cli(
        &server,
        &["rewrite-assignment-urls", "--filename", input.as_str()],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.succeeded, vec!["101:55:CalcHW1"]);
    assert!(summary.failed.is_empty());
    assert_eq!(
        captured(Level::Info, "101:55:CalcHW1"),
        vec!["Modified assignment: 101:55:CalcHW1; Canvas response: 200 OK"]
    );
    m.assert();
}

#[test]
fn rejected_mutation_logs_response_body_as_warning() {
    init();
    let mut server = Server::new();
    let m = server
        .mock("PUT", "/courses/202/assignments/77")
        .with_status(400)
        .with_body(r#"{"errors":{"external_tool_tag_attributes":"invalid url"}}"#)
        .expect(1)
        .create();

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "assignments.csv", "202,77,Rejected\n");
    let cli = cli(
        &server,
        &["rewrite-assignment-urls", "--filename", input.as_str()],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.failed, vec!["202:77:Rejected"]);

    let warnings = captured(Level::Warn, "202:77:Rejected");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("400 Bad Request"));
    assert!(warnings[0].contains(r#"{"errors":{"external_tool_tag_attributes":"invalid url"}}"#));

    let dumps = captured(Level::Debug, "/courses/202/assignments/77");
    assert!(dumps.iter().any(|dump| dump.starts_with("PUT ")));
    assert!(dumps.iter().all(|dump| !dump.contains(TOKEN)));
    m.assert();
}

#[test]
fn failed_mutation_continues_with_next_row() {
    init();
    let mut server = Server::new();
    let m1 = mock_assignment_update(&mut server, 101, 55, 404);
    let m2 = mock_assignment_update(&mut server, 101, 56, 200);

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "assignments.csv", "101,55,Gone\n101,56,Essay\n");
    let cli = cli(
        &server,
        &["rewrite-assignment-urls", "--filename", input.as_str()],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.succeeded, vec!["101:56:Essay"]);
    assert_eq!(summary.failed, vec!["101:55:Gone"]);
    m1.assert();
    m2.assert();
}

#[test]
fn enables_vericite_with_chosen_settings() {
    init();
    let mut server = Server::new();
    let m = server
        .mock("PUT", "/courses/7/assignments/8")
        .match_header("authorization", auth_matcher())
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("assignment[turnitin_enabled]".into(), "false".into()),
            Matcher::UrlEncoded("assignment[vericite_enabled]".into(), "true".into()),
            Matcher::UrlEncoded(
                "assignment[turnitin_settings][originality_report_visibility]".into(),
                "never".into(),
            ),
            Matcher::UrlEncoded(
                "assignment[turnitin_settings][exclude_quoted]".into(),
                "true".into(),
            ),
            Matcher::UrlEncoded(
                "assignment[turnitin_settings][exclude_self_plag]".into(),
                "false".into(),
            ),
            Matcher::UrlEncoded(
                "assignment[turnitin_settings][store_in_index]".into(),
                "true".into(),
            ),
        ]))
        .with_body("{}")
        .expect(1)
        .create();

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "assignments.csv", "courseId,assignmentId\n7,8\n");
    let cli = cli(
        &server,
        &[
            "enable-vericite-assignments",
            "--filename",
            input.as_str(),
            "--visibility",
            "never",
            "--exclude-self-plag",
            "false",
        ],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.succeeded, vec!["7:8"]);
    m.assert();
}

#[test]
fn lists_courses_across_pages() {
    init();
    let mut server = Server::new();
    let _m1 = server
        .mock("GET", "/accounts/1/courses")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "2".into()),
            Matcher::UrlEncoded("enrollment_term_id".into(), "3".into()),
        ]))
        .with_body(json_array(vec![
            course_json(101, "Calculus"),
            course_json(102, "Physics, Advanced"),
        ]))
        .expect(1)
        .create();
    let _m2 = server
        .mock("GET", "/accounts/1/courses")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "2".into()),
            Matcher::UrlEncoded("enrollment_term_id".into(), "3".into()),
        ]))
        .with_body(json_array(vec![course_json(103, "Chemistry")]))
        .expect(1)
        .create();

    let temp = tempdir().unwrap();
    let output = path_string(&temp.path().join("courses.csv"));
    let cli = cli(
        &server,
        &[
            "--page-size",
            "2",
            "--output-path",
            output.as_str(),
            "list-courses",
            "--term-id",
            "3",
        ],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.succeeded, vec!["101", "102", "103"]);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "courseID,courseName\n101,Calculus\n102,\"Physics, Advanced\"\n103,Chemistry\n"
    );
}

#[test]
fn listing_continues_after_course_error() {
    init();
    let mut server = Server::new();
    let _m1 = mock_collection_error(&mut server, "/courses/1/assignments", 401);
    let _m2 = mock_page(
        &mut server,
        "/courses/2/assignments",
        1,
        100,
        &[
            assignment_json(2, 20, "Essay", &["online_upload"]),
            assignment_json(2, 21, "Quiz", &["online_quiz"]),
            turnitin_assignment_json(2, 22, "Thesis"),
        ],
    );

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "courses.csv", "courseID,courseName\n1,A\n2,B\n");
    let output = path_string(&temp.path().join("assignments.csv"));
    let cli = cli(
        &server,
        &[
            "--output-path",
            output.as_str(),
            "list-course-assignments",
            "--filename",
            input.as_str(),
        ],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.failed, vec!["course 1"]);
    assert_eq!(summary.succeeded, vec!["2:20", "2:22"]);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "courseId,assignmentId,assignmentName\n2,20,Essay\n2,22,Thesis\n"
    );
}

#[test]
fn lists_turnitin_assignments_only() {
    init();
    let mut server = Server::new();
    let _m = mock_page(
        &mut server,
        "/courses/2/assignments",
        1,
        100,
        &[
            assignment_json(2, 20, "Essay", &["online_upload"]),
            turnitin_assignment_json(2, 22, "Thesis"),
        ],
    );

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "courses.csv", "2\n");
    let output = path_string(&temp.path().join("assignments.csv"));
    let cli = cli(
        &server,
        &[
            "--output-path",
            output.as_str(),
            "list-course-assignments",
            "--filename",
            input.as_str(),
            "--turnitin-only",
        ],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.succeeded, vec!["2:22"]);
}

#[test]
fn migrates_legacy_tool_urls() {
    init();
    let mut server = Server::new();
    let _m1 = mock_page(
        &mut server,
        "/courses/5/assignments",
        1,
        100,
        &[
            external_tool_assignment_json(5, 50, "Legacy", LEGACY_LTI_URL),
            external_tool_assignment_json(5, 51, "Current", "https://app.vericite.com/vericite/"),
            assignment_json(5, 52, "Upload", &["online_upload"]),
        ],
    );
    let m2 = server
        .mock("PUT", "/courses/5/assignments/50")
        .match_header("authorization", auth_matcher())
        .match_body(Matcher::UrlEncoded(
            "assignment[external_tool_tag_attributes][url]".into(),
            "https://app.vericite.com/vericite/".into(),
        ))
        .with_body("{}")
        .expect(1)
        .create();
    let m3 = server
        .mock("PUT", Matcher::Regex(r"^/courses/5/assignments/5[12]$".to_string()))
        .expect(0)
        .create();

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "courses.csv", "5\n");
    let cli = cli(
        &server,
        &["migrate-assignment-urls", "--filename", input.as_str()],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.succeeded, vec!["5:50:Legacy"]);
    m2.assert();
    m3.assert();
}

#[test]
fn exports_uploaded_attachments() {
    init();
    let mut server = Server::new();
    let file_url = format!("{}/files/7/download?verifier=abc", server.url());
    let _m1 = mock_page(
        &mut server,
        "/courses/101/assignments/55/submissions",
        1,
        100,
        &[
            submission_json(
                55,
                1,
                1000,
                Some("online_upload"),
                vec![
                    attachment_json(7, "essay.pdf", &file_url),
                    attachment_json(8, "empty.pdf", ""),
                ],
            ),
            submission_json(55, 2, 1001, Some("online_text_entry"), vec![]),
            submission_json(55, 3, 1002, None, vec![]),
        ],
    );
    let _m2 = mock_file(&mut server, "/files/7/download", b"essay contents");

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "assignments.csv", "courseId,assignmentId\n101,55\n");
    let output_folder = path_string(&temp.path().join("submissions"));
    let cli = cli(
        &server,
        &[
            "export-submissions",
            "--filename",
            input.as_str(),
            "--output-folder",
            output_folder.as_str(),
        ],
    );
    let summary = canvas_tools_cli::run(cli).unwrap();
    assert_eq!(summary.succeeded, vec!["101:55:7"]);
    assert!(summary.failed.is_empty());
    let downloaded = temp.path().join("submissions/101/55/7essay.pdf");
    assert_eq!(fs::read(downloaded).unwrap(), b"essay contents");
    assert!(!temp.path().join("submissions/101/55/8empty.pdf").exists());
}

#[test]
fn missing_input_file_is_fatal() {
    init();
    let server = Server::new();
    let temp = tempdir().unwrap();
    let missing = path_string(&temp.path().join("missing.csv"));
    let cli = cli(
        &server,
        &["enable-vericite-assignments", "--filename", missing.as_str()],
    );
    assert!(canvas_tools_cli::run(cli).is_err());
}

#[test]
fn short_input_row_is_fatal() {
    init();
    let mut server = Server::new();
    let m = server.mock("PUT", Matcher::Any).expect(0).create();

    let temp = tempdir().unwrap();
    let input = write_input(&temp, "assignments.csv", "101,55\n");
    let cli = cli(
        &server,
        &["rewrite-assignment-urls", "--filename", input.as_str()],
    );
    let err = canvas_tools_cli::run(cli).unwrap_err();
    assert!(err
        .downcast_ref::<canvas_tools_cli::error::InputError>()
        .is_some());
    m.assert();
}

fn json_array(values: Vec<serde_json::Value>) -> String {
    serde_json::Value::Array(values).to_string()
}
