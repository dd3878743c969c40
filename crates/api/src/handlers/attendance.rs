// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Class sessions, attendance marking and attendance reports.

use std::collections::HashSet;

use attendance_domain::{
    AttendanceStatus, AttendanceTally, RegistrationNumber, Role, SessionCode, format_date, format_time,
    parse_session_date, parse_session_time, validate_duration,
};
use attendance_persistence::{
    AttendanceMark, CourseAttendanceData, CourseData, CourseSessionData, NewCourseSession,
    Persistence, PersistenceError,
};
use time::{Date, OffsetDateTime, Time};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::csv_export::render_course_attendance;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::handlers::{count_u32, load_course, load_owned_course};
use crate::request_response::{
    CourseAttendanceResponse, CreateSessionRequest, CreateSessionResponse, CsvExport,
    ListSessionsResponse, SaveAttendanceRequest, SaveAttendanceResponse, SessionAttendanceInfo,
    SessionInfo, SessionState, SessionSummaryInfo, StudentAttendanceInfo,
    StudentCourseAttendanceResponse,
};

/// How many session codes are tried before giving up.
pub const MAX_SESSION_CODE_ATTEMPTS: usize = 5;

const SESSION_CODE_CONSTRAINT: &str = "course_sessions.session_code";

fn session_info(session: CourseSessionData) -> SessionInfo {
    SessionInfo {
        session_id: session.session_id,
        session_code: session.session_code,
        course_id: session.course_id,
        date: session.session_date,
        time: session.start_time,
        duration_minutes: session.duration_minutes,
        created_at: session.created_at,
    }
}

/// Creates a class session for a course the caller owns.
///
/// # Errors
///
/// See [`create_session_with`].
pub fn create_session(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    request: &CreateSessionRequest,
) -> Result<CreateSessionResponse, ApiError> {
    create_session_with(persistence, actor, request, rand::random::<u32>)
}

/// Creates a class session, drawing session code suffixes from
/// `next_suffix`.
///
/// A suffix that collides with an existing code is replaced, up to
/// [`MAX_SESSION_CODE_ATTEMPTS`] times.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown course, `Unauthorized` if the
/// caller does not own it, `InvalidInput` for a bad date, time or duration
/// and `Conflict` when no unique code could be allocated.
pub fn create_session_with<F>(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    request: &CreateSessionRequest,
    mut next_suffix: F,
) -> Result<CreateSessionResponse, ApiError>
where
    F: FnMut() -> u32,
{
    const ACTION: &str = "create_session";
    actor.faculty_id(ACTION)?;
    let course: CourseData = load_owned_course(persistence, actor, request.course_id, ACTION)?;

    let date: Date = parse_session_date(&request.date).map_err(translate_domain_error)?;
    let time: Time = parse_session_time(&request.time).map_err(translate_domain_error)?;
    validate_duration(request.duration_minutes).map_err(translate_domain_error)?;
    let session_date: String = format_date(date).map_err(translate_domain_error)?;
    let start_time: String = format_time(time).map_err(translate_domain_error)?;

    for attempt in 1..=MAX_SESSION_CODE_ATTEMPTS {
        let code: SessionCode = SessionCode::derive(&course.code, date, next_suffix());
        let result: Result<CourseSessionData, PersistenceError> =
            persistence.create_session(&NewCourseSession {
                session_code: code.as_str(),
                course_id: course.course_id,
                session_date: &session_date,
                start_time: &start_time,
                duration_minutes: request.duration_minutes,
            });

        match result {
            Ok(session) => {
                info!(
                    session_id = session.session_id,
                    session_code = %session.session_code,
                    course_id = course.course_id,
                    "Session created"
                );
                return Ok(CreateSessionResponse {
                    success: true,
                    session: session_info(session),
                });
            }
            Err(e) if e.unique_constraint() == Some(SESSION_CODE_CONSTRAINT) => {
                warn!(attempt, session_code = %code, "Session code collision");
            }
            Err(e) => return Err(translate_persistence_error(e)),
        }
    }

    Err(ApiError::conflict(
        "session_code_collision",
        format!(
            "Could not allocate a unique session code after {MAX_SESSION_CODE_ATTEMPTS} attempts"
        ),
    ))
}

/// Lists a course's sessions with how many records each has.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown course and `Unauthorized` if
/// the caller does not own it.
pub fn list_sessions(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
) -> Result<ListSessionsResponse, ApiError> {
    const ACTION: &str = "list_sessions";
    actor.faculty_id(ACTION)?;
    let course: CourseData = load_owned_course(persistence, actor, course_id, ACTION)?;

    let sessions: Vec<SessionSummaryInfo> = persistence
        .list_sessions_for_course(course.course_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|s| SessionSummaryInfo {
            state: SessionState::from_marked(s.marked),
            marked: s.marked,
            session: session_info(s.session),
        })
        .collect();

    Ok(ListSessionsResponse {
        success: true,
        course_id: course.course_id,
        sessions,
    })
}

/// Parses an attendance batch, rejecting it whole on the first bad entry.
fn parse_marks(request: &SaveAttendanceRequest) -> Result<Vec<AttendanceMark>, ApiError> {
    if request.records.is_empty() {
        return Err(ApiError::invalid_input(
            "records",
            "At least one attendance record is required",
        ));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut marks: Vec<AttendanceMark> = Vec::with_capacity(request.records.len());
    for record in &request.records {
        let registration_number: RegistrationNumber =
            RegistrationNumber::parse(&record.registration_number)
                .map_err(translate_domain_error)?;
        let status: AttendanceStatus = record.status.parse().map_err(translate_domain_error)?;

        if !seen.insert(registration_number.as_str().to_string()) {
            return Err(ApiError::invalid_input(
                "records",
                format!("Student {registration_number} appears more than once"),
            ));
        }
        marks.push(AttendanceMark {
            registration_number: registration_number.as_str().to_string(),
            status,
        });
    }
    Ok(marks)
}

/// Records attendance for a session of a course the caller owns.
///
/// The batch is all-or-nothing. Marking a student again overwrites the
/// earlier status.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown session, `Unauthorized` if
/// the caller does not own its course, and `InvalidInput` for an empty
/// batch, an unknown status or a student who is not enrolled.
pub fn save_attendance(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    request: &SaveAttendanceRequest,
    now: OffsetDateTime,
) -> Result<SaveAttendanceResponse, ApiError> {
    const ACTION: &str = "save_attendance";
    let faculty_id: &str = actor.faculty_id(ACTION)?;

    let session: CourseSessionData = persistence
        .get_session(request.session_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            ApiError::not_found(
                "Session",
                format!("Session {} not found", request.session_id),
            )
        })?;
    load_owned_course(persistence, actor, session.course_id, ACTION)?;

    let marks: Vec<AttendanceMark> = parse_marks(request)?;
    let marked: usize = persistence
        .mark_attendance(&session, &marks, faculty_id, now)
        .map_err(translate_persistence_error)?;

    Ok(SaveAttendanceResponse {
        success: true,
        session_id: session.session_id,
        marked,
    })
}

fn tally_for(total_sessions: u32, present: i64, absent: i64, leave: i64) -> AttendanceTally {
    let mut tally: AttendanceTally = AttendanceTally::new(total_sessions);
    tally.record(AttendanceStatus::Present, count_u32(present));
    tally.record(AttendanceStatus::Absent, count_u32(absent));
    tally.record(AttendanceStatus::Leave, count_u32(leave));
    tally
}

fn course_report(
    persistence: &Persistence,
    course: &CourseData,
) -> Result<CourseAttendanceResponse, ApiError> {
    let data: CourseAttendanceData = persistence
        .course_attendance(course.course_id)
        .map_err(translate_persistence_error)?;
    let total_sessions: u32 = count_u32(data.total_sessions);

    let students: Vec<StudentAttendanceInfo> = data
        .students
        .into_iter()
        .map(|s| {
            let tally: AttendanceTally = tally_for(total_sessions, s.present, s.absent, s.leave);
            StudentAttendanceInfo {
                registration_number: s.registration_number,
                student_name: s.name,
                total_sessions,
                present: tally.present,
                absent: tally.absent,
                leave: tally.leave,
                percentage: tally.percentage(),
            }
        })
        .collect();

    Ok(CourseAttendanceResponse {
        success: true,
        course_id: course.course_id,
        course_code: course.code.clone(),
        total_sessions,
        students,
    })
}

/// Attendance report for every student enrolled in a course the caller
/// owns, ordered by name.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown course and `Unauthorized` if
/// the caller does not own it.
pub fn course_attendance(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
) -> Result<CourseAttendanceResponse, ApiError> {
    const ACTION: &str = "course_attendance";
    actor.faculty_id(ACTION)?;
    let course: CourseData = load_owned_course(persistence, actor, course_id, ACTION)?;
    course_report(persistence, &course)
}

/// The course attendance report rendered as CSV.
///
/// # Errors
///
/// As [`course_attendance`].
pub fn export_course_attendance_csv(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
) -> Result<CsvExport, ApiError> {
    const ACTION: &str = "export_course_attendance";
    actor.faculty_id(ACTION)?;
    let course: CourseData = load_owned_course(persistence, actor, course_id, ACTION)?;
    let report: CourseAttendanceResponse = course_report(persistence, &course)?;
    render_course_attendance(&report)
}

/// A student's per-session attendance for one course, by date then time.
///
/// Students may read their own record. Faculty must own the course.
///
/// # Errors
///
/// Returns `Unauthorized` when access is denied, and `ResourceNotFound`
/// for an unknown course or when the student is not enrolled in it.
pub fn student_course_attendance(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
    registration_number: &str,
) -> Result<StudentCourseAttendanceResponse, ApiError> {
    const ACTION: &str = "student_course_attendance";
    let registration_number: RegistrationNumber =
        RegistrationNumber::parse(registration_number).map_err(translate_domain_error)?;
    AuthorizationService::authorize_student_records(actor, registration_number.as_str(), ACTION)?;

    let course: CourseData = load_course(persistence, course_id)?;
    if actor.role == Role::Faculty {
        AuthorizationService::require_course_owner(actor, &course, ACTION)?;
    }

    let enrolled: bool = persistence
        .is_enrolled(course.course_id, registration_number.as_str())
        .map_err(translate_persistence_error)?;
    if !enrolled {
        return Err(ApiError::not_found(
            "Enrollment",
            format!(
                "Student {registration_number} is not enrolled in {}",
                course.code
            ),
        ));
    }

    let sessions: Vec<SessionAttendanceInfo> = persistence
        .student_session_attendance(course.course_id, registration_number.as_str())
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|s| SessionAttendanceInfo {
            session_id: s.session_id,
            session_code: s.session_code,
            date: s.session_date,
            time: s.start_time,
            status: s.status,
        })
        .collect();

    let total_sessions: u32 = u32::try_from(sessions.len()).unwrap_or(u32::MAX);
    let mut tally: AttendanceTally = AttendanceTally::new(total_sessions);
    for status in sessions.iter().filter_map(|s| s.status.as_deref()) {
        if let Ok(status) = status.parse::<AttendanceStatus>() {
            tally.record(status, 1);
        }
    }

    let student_name: String = persistence
        .get_student(registration_number.as_str())
        .map_err(translate_persistence_error)?
        .map(|s| s.name)
        .unwrap_or_default();

    Ok(StudentCourseAttendanceResponse {
        success: true,
        course_id: course.course_id,
        course_code: course.code,
        registration_number: registration_number.to_string(),
        summary: StudentAttendanceInfo {
            registration_number: registration_number.to_string(),
            student_name,
            total_sessions,
            present: tally.present,
            absent: tally.absent,
            leave: tally.leave,
            percentage: tally.percentage(),
        },
        sessions,
    })
}
