//! Create clap app

use canvas_tools_client::{request::Visibility, Url};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub const DEFAULT_CANVAS_URL: &str = "https://vericite.instructure.com/api/v1/";
pub const DEFAULT_LEGACY_HOST: &str = "longsight.com";
pub const DEFAULT_LTI_URL: &str = "https://api.vericite.com/web/v1/authenticate/lti";
pub const DEFAULT_MIGRATION_URL: &str = "https://app.vericite.com/vericite/";

#[derive(Parser)]
#[clap(
    name = "canvas-tools",
    version,
    author,
    about,
    subcommand_required(true),
    arg_required_else_help(true)
)]
pub struct Cli {
    /// Root of the Canvas REST API.
    #[clap(long, env = "CANVAS_URL", default_value = DEFAULT_CANVAS_URL, global = true)]
    pub url: Url,
    /// Canvas access token, sent as a bearer credential. Must come before the subcommand, or be set with CANVAS_TOKEN.
    #[clap(long, env = "CANVAS_TOKEN", hide_env_values = true)]
    pub token: String,
    /// Records requested per page.
    #[clap(long, default_value_t = 100, global = true)]
    pub page_size: u32,
    /// Maximum number of pages requested from one collection.
    #[clap(long, default_value_t = 100, global = true)]
    pub max_pages: u32,
    /// Milliseconds to wait after each modification.
    #[clap(long, default_value_t = 1000, global = true)]
    pub delay_ms: u64,
    /// If defined, CSV output is written to this path instead of stdout. Overwritten if it already exists.
    #[clap(long, global = true)]
    pub output_path: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Parser)]
pub enum Command {
    /// Lists the courses of an account in an enrollment term as courseID,courseName
    ListCourses {
        /// Account id, or a Canvas account reference such as sis_account_id:XYZ.
        #[clap(long, default_value = "1")]
        account_id: String,
        /// Enrollment term id.
        #[clap(long, default_value = "1")]
        term_id: String,
    },

    /// Lists the assignments of each course in the input file as courseId,assignmentId,assignmentName
    ListCourseAssignments {
        /// CSV file with a course id in the first column.
        #[clap(long, default_value = "courses.csv")]
        filename: PathBuf,
        /// Only list assignments that have Turnitin enabled.
        #[clap(long)]
        turnitin_only: bool,
        /// List external tool assignments still pointing at the legacy host instead of file and text assignments.
        #[clap(long)]
        lti_migration: bool,
        /// Host that identifies legacy external tool URLs.
        #[clap(long, default_value = DEFAULT_LEGACY_HOST)]
        legacy_host: String,
    },

    /// Enables VeriCite on each assignment in the input file
    EnableVericiteAssignments {
        /// CSV file with course id and assignment id columns.
        #[clap(long, default_value = "assignments.csv")]
        filename: PathBuf,
        /// When students can see the originality report: immediate, after_grading, after_due_date or never.
        #[clap(long, default_value_t = Visibility::Immediate)]
        visibility: Visibility,
        /// Exclude quoted material from the report.
        #[clap(long, default_value_t = true, action = ArgAction::Set)]
        exclude_quoted: bool,
        /// Exclude the student's own earlier submissions from the report.
        #[clap(long, default_value_t = true, action = ArgAction::Set)]
        exclude_self_plag: bool,
        /// Store submissions in the institution's index.
        #[clap(long, default_value_t = true, action = ArgAction::Set)]
        store_in_index: bool,
    },

    /// Points the external tool of each assignment in the input file at a new LTI launch URL
    RewriteAssignmentUrls {
        /// CSV file with course id, assignment id and assignment name columns.
        #[clap(long, default_value = "assignments.csv")]
        filename: PathBuf,
        /// The new launch URL.
        #[clap(long, default_value = DEFAULT_LTI_URL)]
        new_url: String,
    },

    /// Finds the legacy external tool assignments of each course in the input file and rewrites their URL
    MigrateAssignmentUrls {
        /// CSV file with a course id in the first column.
        #[clap(long, default_value = "courses.csv")]
        filename: PathBuf,
        /// Host that identifies legacy external tool URLs.
        #[clap(long, default_value = DEFAULT_LEGACY_HOST)]
        legacy_host: String,
        /// The new launch URL.
        #[clap(long, default_value = DEFAULT_MIGRATION_URL)]
        new_url: String,
    },

    /// Downloads the uploaded attachments of each assignment in the input file
    ExportSubmissions {
        /// CSV file with course id and assignment id columns.
        #[clap(long, default_value = "assignments.csv")]
        filename: PathBuf,
        /// Attachments are saved under {output-folder}/{course}/{assignment}/.
        #[clap(long, default_value = "submissions")]
        output_folder: PathBuf,
    },
}
