// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the attendance tracking service.
//!
//! Translates requests into domain validation and persistence calls,
//! enforces role and ownership rules, and shapes responses. Transport is
//! left to the server crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod config;
mod csv_export;
mod error;
pub mod handlers;
mod notifier;
mod password_policy;
mod request_response;
mod token;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, INVALID_CREDENTIALS};
pub use config::{ApiConfig, ConfigError, DEFAULT_EMAIL_DOMAIN, MIN_TOKEN_SECRET_LENGTH};
pub use csv_export::render_course_attendance;
pub use error::{
    ApiError, AuthError, ErrorKind, translate_domain_error, translate_persistence_error,
};
pub use notifier::{CodeNotifier, TracingNotifier};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AttendanceRecordRequest, CourseAttendanceResponse, CourseInfo, CourseSummaryInfo,
    CreateCourseRequest, CreateCourseResponse, CreateSessionRequest, CreateSessionResponse,
    CsvExport, EnrollStudentRequest, EnrollStudentResponse, EnrolledStudentInfo, EnrollmentInfo,
    ListCoursesResponse, ListEnrolledStudentsResponse, ListSectionsResponse, ListSessionsResponse,
    ListUsersResponse, LoginRequest, LoginResponse, MeResponse, MessageResponse,
    PasswordResetConfirmRequest, PasswordResetRequest, RegisterRequest, RegisterResponse,
    SaveAttendanceRequest, SaveAttendanceResponse, SectionInfo, SessionAttendanceInfo,
    SessionInfo, SessionState, SessionSummaryInfo, StudentAttendanceInfo,
    StudentCourseAttendanceResponse, StudentCourseInfo, StudentCoursesResponse, UserView,
};
pub use token::{TokenClaims, TokenError, TokenSigner};
