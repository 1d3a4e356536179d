//! Reading the CSV files that drive the utilities.

use crate::error::InputError;
use anyhow::{Context, Result};
use canvas_tools_util::file_util;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{fmt, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseRow {
    pub course_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub course_id: u64,
    pub assignment_id: u64,
    pub name: Option<String>,
}

impl fmt::Display for AssignmentRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.course_id, self.assignment_id)?;
        if let Some(name) = &self.name {
            write!(f, ":{name}")?;
        }
        Ok(())
    }
}

/// Reads `courseId,...` rows.
pub fn read_course_rows(path: &Path) -> Result<Vec<CourseRow>> {
    read_rows(path, 1, |_, course_id, _| Ok(CourseRow { course_id }))
}

/// Reads `courseId,assignmentId[,assignmentName]` rows. The name column is required if `with_name` is set.
pub fn read_assignment_rows(path: &Path, with_name: bool) -> Result<Vec<AssignmentRow>> {
    let expected = if with_name { 3 } else { 2 };
    read_rows(path, expected, |line, course_id, record| {
        let value = record.get(1).unwrap_or_default();
        let assignment_id = value.parse().map_err(|_| InputError::InvalidId {
            line,
            column: "assignment id",
            value: value.to_string(),
        })?;
        let name = if with_name {
            record.get(2).map(str::to_string)
        } else {
            None
        };
        Ok(AssignmentRow {
            course_id,
            assignment_id,
            name,
        })
    })
}

// rows whose first column is not an id are headers or comments and get skipped
fn read_rows<T>(
    path: &Path,
    expected: usize,
    parse: impl Fn(u64, u64, &StringRecord) -> Result<T, InputError>,
) -> Result<Vec<T>> {
    let file = file_util::open_file(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut rows = vec![];
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read CSV from {}", path.display()))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let Some(course_id) = record.get(0).and_then(|c| c.parse::<u64>().ok()) else {
            log::debug!("skipping line {} of {}: {:?}", line, path.display(), record);
            continue;
        };
        if record.len() < expected {
            return Err(InputError::MissingColumns {
                line,
                found: record.len(),
                expected,
            })
            .with_context(|| format!("Invalid row in {}", path.display()));
        }
        let row = parse(line, course_id, &record)
            .with_context(|| format!("Invalid row in {}", path.display()))?;
        rows.push(row);
    }
    log::debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
