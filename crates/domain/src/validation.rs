// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Role;
use time::macros::format_description;
use time::{Date, Time};

/// Maximum accepted length of a person's name.
const MAX_NAME_LENGTH: usize = 100;

/// Maximum accepted length of the local part of a staff e-mail address.
const MAX_STAFF_LOCAL_PART_LENGTH: usize = 64;

/// Validates an already-normalized (trimmed, lowercased) e-mail address
/// against the pattern required for `role`.
///
/// - Students: `u` followed by exactly seven digits, e.g. `u2021123@domain`.
/// - Faculty and admins: `name@domain`, where `name` is ASCII letters
///   optionally separated by single `.`, `_` or `-` characters.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmailFormat` if the address does not match.
pub fn validate_email_for_role(email: &str, role: Role, domain: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidEmailFormat {
        role,
        email: email.to_string(),
    };

    let (local, email_domain) = email.split_once('@').ok_or_else(invalid)?;
    if email_domain.contains('@') || !email_domain.eq_ignore_ascii_case(domain.trim()) {
        return Err(invalid());
    }

    let matches: bool = match role {
        Role::Student => is_student_local_part(local),
        Role::Faculty | Role::Admin => is_staff_local_part(local),
    };

    if matches { Ok(()) } else { Err(invalid()) }
}

fn is_student_local_part(local: &str) -> bool {
    local
        .strip_prefix('u')
        .is_some_and(|digits| digits.len() == 7 && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn is_staff_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_STAFF_LOCAL_PART_LENGTH {
        return false;
    }

    // Segments of letters joined by single separators; no leading, trailing
    // or doubled separators.
    local
        .split(['.', '_', '-'])
        .all(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_alphabetic()))
}

/// Validates a student registration number.
///
/// # Errors
///
/// Returns `DomainError::InvalidRegistrationNumber` unless `value` is exactly
/// seven ASCII digits.
pub fn validate_registration_number(value: &str) -> Result<(), DomainError> {
    if value.len() == 7 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(DomainError::InvalidRegistrationNumber(value.to_string()))
    }
}

/// Validates a faculty identifier.
///
/// # Errors
///
/// Returns `DomainError::InvalidFacultyId` unless `value` is exactly five
/// ASCII digits.
pub fn validate_faculty_id(value: &str) -> Result<(), DomainError> {
    if value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(DomainError::InvalidFacultyId(value.to_string()))
    }
}

/// Validates a person's display name.
///
/// # Errors
///
/// Returns an error if the name is blank or longer than 100 characters.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidName(format!(
            "Name cannot be longer than {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a course code that has already been uppercased.
///
/// A course code is 2 to 16 characters, starts with a letter and contains
/// only ASCII letters, digits and `-`.
///
/// # Errors
///
/// Returns `DomainError::InvalidCourseCode` if the code is malformed.
pub fn validate_course_code(code: &str) -> Result<(), DomainError> {
    if !(2..=16).contains(&code.len()) {
        return Err(DomainError::InvalidCourseCode(String::from(
            "Course code must be between 2 and 16 characters",
        )));
    }
    if !code.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(DomainError::InvalidCourseCode(String::from(
            "Course code must start with a letter",
        )));
    }
    if !code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(DomainError::InvalidCourseCode(String::from(
            "Course code may only contain letters, digits and '-'",
        )));
    }
    Ok(())
}

/// Validates course credit hours.
///
/// # Errors
///
/// Returns `DomainError::InvalidCreditHours` unless `hours` is 1 through 6.
pub fn validate_credit_hours(hours: i32) -> Result<(), DomainError> {
    if (1..=6).contains(&hours) {
        Ok(())
    } else {
        Err(DomainError::InvalidCreditHours(hours))
    }
}

/// Validates a semester label such as `Fall 2026`.
///
/// # Errors
///
/// Returns `DomainError::InvalidSemester` if the label is blank or longer
/// than 32 characters.
pub fn validate_semester(semester: &str) -> Result<(), DomainError> {
    let trimmed: &str = semester.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidSemester(String::from(
            "Semester cannot be empty",
        )));
    }
    if trimmed.chars().count() > 32 {
        return Err(DomainError::InvalidSemester(String::from(
            "Semester cannot be longer than 32 characters",
        )));
    }
    Ok(())
}

/// Validates a session duration in minutes.
///
/// # Errors
///
/// Returns `DomainError::InvalidDuration` unless `minutes` is 1 through 600.
pub fn validate_duration(minutes: i32) -> Result<(), DomainError> {
    if (1..=600).contains(&minutes) {
        Ok(())
    } else {
        Err(DomainError::InvalidDuration(minutes))
    }
}

/// Parses a session date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionDate` if the value is not a valid
/// calendar date.
pub fn parse_session_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| DomainError::InvalidSessionDate(value.to_string()))
}

/// Parses a session start time in 24-hour `HH:MM` form.
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionTime` if the value is not a valid time.
pub fn parse_session_time(value: &str) -> Result<Time, DomainError> {
    Time::parse(value.trim(), format_description!("[hour]:[minute]"))
        .map_err(|_| DomainError::InvalidSessionTime(value.to_string()))
}

/// Formats a date as `YYYY-MM-DD` for storage.
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionDate` if the date cannot be rendered.
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|_| DomainError::InvalidSessionDate(date.to_string()))
}

/// Formats a time as 24-hour `HH:MM` for storage.
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionTime` if the time cannot be rendered.
pub fn format_time(time: Time) -> Result<String, DomainError> {
    time.format(format_description!("[hour]:[minute]"))
        .map_err(|_| DomainError::InvalidSessionTime(time.to_string()))
}
