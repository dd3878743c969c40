// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV rendering of course attendance reports.
//!
//! One row per enrolled student, in report order, with the header
//! `registration_number,student_name,total_sessions,present,absent,leave,percentage`.

use crate::error::ApiError;
use crate::request_response::{CourseAttendanceResponse, CsvExport};

const HEADER: &str =
    "registration_number,student_name,total_sessions,present,absent,leave,percentage\n";

/// Renders a course attendance report as CSV.
///
/// # Errors
///
/// Returns `ApiError::Internal` if a row cannot be serialized.
pub fn render_course_attendance(report: &CourseAttendanceResponse) -> Result<CsvExport, ApiError> {
    let filename: String = format!("{}-attendance.csv", report.course_code.to_ascii_lowercase());

    // The writer only emits the header alongside the first row.
    if report.students.is_empty() {
        return Ok(CsvExport {
            filename,
            body: String::from(HEADER),
        });
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    for student in &report.students {
        writer.serialize(student).map_err(|e| ApiError::Internal {
            message: format!("Failed to write CSV row: {e}"),
        })?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV: {e}"),
    })?;
    let body: String = String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("CSV is not UTF-8: {e}"),
    })?;

    Ok(CsvExport { filename, body })
}
