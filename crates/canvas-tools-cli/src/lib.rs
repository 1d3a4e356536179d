//! CLI for bulk administration of a Canvas LMS instance.

#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

pub mod app;
pub mod error;
mod input;
mod output;

use crate::{
    app::{Cli, Command},
    input::AssignmentRow,
    output::CsvOutput,
};
use anyhow::{Context, Result};
use canvas_tools_client::{
    api_v1,
    filter::{self, AssignmentFilter},
    request::{FormFields, MutationRequest, VericiteSettings},
    response::{Assignment, Course, Submission},
    CanvasClient, CanvasClientError, ClientSettings, MutationOutcome, Mutator, PageLimits, Url,
};
use std::{path::Path, time::Duration};

/// Labels of the records a run acted on, in input order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

pub fn run(cli: Cli) -> Result<RunSummary> {
    let settings = ClientSettings {
        root_url: cli.url,
        token: cli.token,
        limits: PageLimits::new(cli.page_size, cli.max_pages),
        mutation_delay: Duration::from_millis(cli.delay_ms),
    };
    let client = CanvasClient::new(settings).context("Failed to create Canvas client")?;
    let output_path = cli.output_path.as_deref();
    let mut summary = RunSummary::default();

    match cli.command {
        Command::ListCourses {
            account_id,
            term_id,
        } => list_courses(&client, &account_id, &term_id, output_path, &mut summary)?,
        Command::ListCourseAssignments {
            filename,
            turnitin_only,
            lti_migration,
            legacy_host,
        } => {
            let filter = AssignmentFilter {
                turnitin_only,
                lti_migration_host: lti_migration.then_some(legacy_host),
            };
            list_course_assignments(&client, &filename, &filter, output_path, &mut summary)?
        }
        Command::EnableVericiteAssignments {
            filename,
            visibility,
            exclude_quoted,
            exclude_self_plag,
            store_in_index,
        } => {
            let settings = VericiteSettings {
                visibility,
                exclude_quoted,
                exclude_self_plag,
                store_in_index,
            };
            enable_vericite_assignments(&client, &filename, &settings, &mut summary)?
        }
        Command::RewriteAssignmentUrls { filename, new_url } => {
            rewrite_assignment_urls(&client, &filename, &new_url, &mut summary)?
        }
        Command::MigrateAssignmentUrls {
            filename,
            legacy_host,
            new_url,
        } => migrate_assignment_urls(&client, &filename, &legacy_host, &new_url, &mut summary)?,
        Command::ExportSubmissions {
            filename,
            output_folder,
        } => export_submissions(&client, &filename, &output_folder, &mut summary)?,
    }
    Ok(summary)
}

// includes the source chain in the message
fn describe(err: CanvasClientError) -> String {
    format!("{:#}", anyhow::Error::new(err))
}

fn list_courses(
    client: &CanvasClient,
    account_id: &str,
    term_id: &str,
    output_path: Option<&Path>,
    summary: &mut RunSummary,
) -> Result<()> {
    let mut output = CsvOutput::open(output_path)?;
    output.write_row(["courseID", "courseName"])?;

    let path = format!("accounts/{}/courses", api_v1::percent_encode(account_id));
    let query = [("enrollment_term_id", term_id.to_string())];
    for course in client.fetch::<Course, _>(&path, &query, |_| true)? {
        match course {
            Ok(course) => {
                let id = course.id.to_string();
                output.write_row([id.as_str(), course.name.as_str()])?;
                summary.succeeded.push(id);
            }
            Err(err) => {
                log::warn!(
                    "Failed to list courses of account {} in term {}: {}",
                    account_id,
                    term_id,
                    describe(err)
                );
                summary.failed.push(format!("account {account_id}"));
            }
        }
    }
    output.flush()
}

fn list_course_assignments(
    client: &CanvasClient,
    filename: &Path,
    filter: &AssignmentFilter,
    output_path: Option<&Path>,
    summary: &mut RunSummary,
) -> Result<()> {
    let courses = input::read_course_rows(filename)?;
    let mut output = CsvOutput::open(output_path)?;
    output.write_row(["courseId", "assignmentId", "assignmentName"])?;

    for row in courses {
        let path = format!("courses/{}/assignments", row.course_id);
        let assignments =
            client.fetch::<Assignment, _>(&path, &[], |a: &Assignment| filter.matches(a))?;
        for assignment in assignments {
            match assignment {
                Ok(assignment) => {
                    let course_id = row.course_id.to_string();
                    let assignment_id = assignment.id.to_string();
                    output.write_row([
                        course_id.as_str(),
                        assignment_id.as_str(),
                        assignment.name.as_str(),
                    ])?;
                    summary
                        .succeeded
                        .push(format!("{course_id}:{assignment_id}"));
                }
                Err(err) => {
                    log::warn!(
                        "Failed to list assignments of course {}: {}",
                        row.course_id,
                        describe(err)
                    );
                    summary.failed.push(format!("course {}", row.course_id));
                }
            }
        }
    }
    output.flush()
}

fn enable_vericite_assignments(
    client: &CanvasClient,
    filename: &Path,
    settings: &VericiteSettings,
    summary: &mut RunSummary,
) -> Result<()> {
    let rows = input::read_assignment_rows(filename, false)?;
    log::info!(
        "Enabling VeriCite with originality report visibility {}, exclude quoted {}, exclude self plagiarism {}, store in index {}",
        settings.visibility,
        settings.exclude_quoted,
        settings.exclude_self_plag,
        settings.store_in_index,
    );

    let fields = FormFields::assignment_vericite(settings);
    let mutator = client.mutator();
    for row in rows {
        let request = MutationRequest::assignment(row.course_id, row.assignment_id, fields.clone());
        apply_mutation(&mutator, &request, row.to_string(), summary);
    }
    Ok(())
}

fn rewrite_assignment_urls(
    client: &CanvasClient,
    filename: &Path,
    new_url: &str,
    summary: &mut RunSummary,
) -> Result<()> {
    let rows = input::read_assignment_rows(filename, true)?;
    let fields = FormFields::assignment_external_tool_url(new_url);
    let mutator = client.mutator();
    for row in rows {
        let request = MutationRequest::assignment(row.course_id, row.assignment_id, fields.clone());
        apply_mutation(&mutator, &request, row.to_string(), summary);
    }
    Ok(())
}

fn migrate_assignment_urls(
    client: &CanvasClient,
    filename: &Path,
    legacy_host: &str,
    new_url: &str,
    summary: &mut RunSummary,
) -> Result<()> {
    let courses = input::read_course_rows(filename)?;
    let fields = FormFields::assignment_external_tool_url(new_url);
    let mutator = client.mutator();

    for row in courses {
        let path = format!("courses/{}/assignments", row.course_id);
        let legacy = client.fetch::<Assignment, _>(&path, &[], |a: &Assignment| {
            filter::external_tool_url_contains(a, legacy_host)
        })?;

        // the whole course is listed before any of it is modified
        let mut found = vec![];
        for assignment in legacy {
            match assignment {
                Ok(assignment) => found.push(assignment),
                Err(err) => {
                    log::warn!(
                        "Failed to list assignments of course {}: {}",
                        row.course_id,
                        describe(err)
                    );
                    summary.failed.push(format!("course {}", row.course_id));
                }
            }
        }
        log::info!(
            "Course {} has {} assignments pointing at {}",
            row.course_id,
            found.len(),
            legacy_host
        );

        for assignment in found {
            let label = AssignmentRow {
                course_id: row.course_id,
                assignment_id: assignment.id,
                name: Some(assignment.name),
            }
            .to_string();
            let request = MutationRequest::assignment(row.course_id, assignment.id, fields.clone());
            apply_mutation(&mutator, &request, label, summary);
        }
    }
    Ok(())
}

fn export_submissions(
    client: &CanvasClient,
    filename: &Path,
    output_folder: &Path,
    summary: &mut RunSummary,
) -> Result<()> {
    let rows = input::read_assignment_rows(filename, false)?;

    for row in rows {
        let path = format!(
            "courses/{}/assignments/{}/submissions",
            row.course_id, row.assignment_id
        );
        let dir = output_folder
            .join(row.course_id.to_string())
            .join(row.assignment_id.to_string());
        let submissions =
            client.fetch::<Submission, _>(&path, &[], filter::has_downloadable_upload)?;

        for submission in submissions {
            let submission = match submission {
                Ok(submission) => submission,
                Err(err) => {
                    log::warn!(
                        "Failed to list submissions of assignment {}: {}",
                        row,
                        describe(err)
                    );
                    summary.failed.push(row.to_string());
                    continue;
                }
            };
            for attachment in submission.attachments {
                if attachment.url.is_empty() {
                    log::debug!("attachment {} has no URL, skipping", attachment.id);
                    continue;
                }
                let file_name = format!("{}{}", attachment.id, attachment.filename);
                let label = format!("{}:{}", row, attachment.id);
                let url = match Url::parse(&attachment.url) {
                    Ok(url) => url,
                    Err(err) => {
                        log::warn!("Invalid URL for attachment {}: {}", label, err);
                        summary.failed.push(label);
                        continue;
                    }
                };
                match client.download(&url, &dir, &file_name) {
                    Ok(written) => {
                        log::info!(
                            "Downloaded {} ({} bytes) to {}",
                            file_name,
                            written,
                            dir.display()
                        );
                        summary.succeeded.push(label);
                    }
                    Err(err) => {
                        log::warn!("Failed to download attachment {}: {}", label, describe(err));
                        summary.failed.push(label);
                    }
                }
            }
        }
    }
    Ok(())
}

fn apply_mutation(
    mutator: &Mutator<'_>,
    request: &MutationRequest,
    label: String,
    summary: &mut RunSummary,
) {
    match mutator.mutate(request) {
        Ok(MutationOutcome::Success { status }) => {
            log::info!("Modified assignment: {label}; Canvas response: {status}");
            summary.succeeded.push(label);
        }
        Ok(MutationOutcome::Failure {
            status,
            request_dump,
            response_body,
        }) => {
            log::debug!("{request_dump}");
            log::warn!(
                "Failed to modify assignment {label}; Canvas response: {status}; response body: {response_body}"
            );
            summary.failed.push(label);
        }
        Err(err) => {
            log::warn!("Failed to modify assignment {label}: {}", describe(err));
            summary.failed.push(label);
        }
    }
}
