// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use attendance_domain::Role;
use attendance_persistence::Persistence;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::handlers::{attendance, auth, courses};
use crate::{
    ApiConfig, AttendanceRecordRequest, AuthenticatedActor, CodeNotifier, CourseInfo,
    CreateCourseRequest, CreateSessionRequest, DEFAULT_EMAIL_DOMAIN, EnrollStudentRequest,
    RegisterRequest, SaveAttendanceRequest, SessionInfo,
};

pub const PASSWORD: &str = "Secur3Pass";
pub const TOKEN_SECRET: &str = "test-token-secret-0123456789";

pub fn test_config() -> ApiConfig {
    ApiConfig::new(
        DEFAULT_EMAIL_DOMAIN,
        TOKEN_SECRET,
        Duration::hours(24),
        Duration::minutes(15),
    )
    .unwrap()
}

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub const fn test_now() -> OffsetDateTime {
    datetime!(2026-03-02 09:00 UTC)
}

pub fn student_request(registration_number: &str, name: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.to_string(),
        email: format!("u{registration_number}@giki.edu.pk"),
        password: PASSWORD.to_string(),
        role: String::from("student"),
        registration_number: Some(registration_number.to_string()),
        faculty_name: Some(String::from("FCSE")),
        faculty_id: None,
        department: None,
    }
}

pub fn faculty_request(faculty_id: &str, local_part: &str) -> RegisterRequest {
    RegisterRequest {
        name: format!("Dr {local_part}"),
        email: format!("{local_part}@giki.edu.pk"),
        password: PASSWORD.to_string(),
        role: String::from("faculty"),
        registration_number: None,
        faculty_name: None,
        faculty_id: Some(faculty_id.to_string()),
        department: Some(String::from("Computer Science")),
    }
}

pub fn admin_request(local_part: &str) -> RegisterRequest {
    RegisterRequest {
        name: String::from("System Admin"),
        email: format!("{local_part}@giki.edu.pk"),
        password: PASSWORD.to_string(),
        role: String::from("admin"),
        registration_number: None,
        faculty_name: None,
        faculty_id: None,
        department: None,
    }
}

pub fn register_student(
    persistence: &Persistence,
    registration_number: &str,
    name: &str,
) -> AuthenticatedActor {
    let response = auth::register(
        persistence,
        &test_config(),
        &student_request(registration_number, name),
    )
    .unwrap();
    AuthenticatedActor::new(
        response.user.user_id,
        Role::Student,
        Some(registration_number.to_string()),
    )
}

pub fn register_faculty(
    persistence: &Persistence,
    faculty_id: &str,
    local_part: &str,
) -> AuthenticatedActor {
    let response = auth::register(
        persistence,
        &test_config(),
        &faculty_request(faculty_id, local_part),
    )
    .unwrap();
    AuthenticatedActor::new(
        response.user.user_id,
        Role::Faculty,
        Some(faculty_id.to_string()),
    )
}

pub fn register_admin(persistence: &Persistence) -> AuthenticatedActor {
    let response = auth::register(persistence, &test_config(), &admin_request("admin")).unwrap();
    AuthenticatedActor::new(response.user.user_id, Role::Admin, None)
}

pub fn course_request(code: &str) -> CreateCourseRequest {
    CreateCourseRequest {
        code: code.to_string(),
        title: String::from("Data Structures"),
        credit_hours: 3,
        section_id: Some(1),
        description: None,
        semester: String::from("Fall 2026"),
    }
}

pub fn create_course(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    code: &str,
) -> CourseInfo {
    courses::create_course(persistence, actor, &course_request(code))
        .unwrap()
        .course
}

pub fn enroll(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
    registration_number: &str,
) -> i64 {
    courses::enroll_student(
        persistence,
        actor,
        &EnrollStudentRequest {
            course_id,
            registration_number: registration_number.to_string(),
        },
    )
    .unwrap()
    .enrollment
    .enrollment_id
}

pub fn session_request(course_id: i64, date: &str, time: &str) -> CreateSessionRequest {
    CreateSessionRequest {
        course_id,
        date: date.to_string(),
        time: time.to_string(),
        duration_minutes: 60,
    }
}

pub fn create_session(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
    date: &str,
) -> SessionInfo {
    attendance::create_session(persistence, actor, &session_request(course_id, date, "09:00"))
        .unwrap()
        .session
}

pub fn record(registration_number: &str, status: &str) -> AttendanceRecordRequest {
    AttendanceRecordRequest {
        registration_number: registration_number.to_string(),
        status: status.to_string(),
    }
}

pub fn batch(session_id: i64, records: Vec<AttendanceRecordRequest>) -> SaveAttendanceRequest {
    SaveAttendanceRequest {
        session_id,
        records,
    }
}

/// Keeps every delivered code in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    pub delivered: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn last_code(&self) -> Option<String> {
        self.delivered
            .lock()
            .unwrap()
            .last()
            .map(|(_, code)| code.clone())
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

impl CodeNotifier for RecordingNotifier {
    fn deliver(&self, email: &str, code: &str, _expires_at: OffsetDateTime) {
        self.delivered
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
    }
}
