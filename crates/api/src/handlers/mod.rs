// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Each operation is a synchronous free function over a [`Persistence`]
//! handle. Authorization is checked before any data is read or written on
//! the actor's behalf.
//!
//! ## Module Organization
//!
//! - `auth`: Registration, login and the caller's own profile
//! - `courses`: Sections, courses and enrollments
//! - `attendance`: Class sessions, marking and reports
//! - `reset`: Password reset codes
//! - `admin`: Account listing

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod reset;

use attendance_persistence::{CourseData, Persistence, UserData};
use num_traits::ToPrimitive;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{CourseInfo, UserView};

pub(crate) fn user_view(user: UserData) -> UserView {
    UserView {
        user_id: user.user_id,
        name: user.name,
        email: user.email,
        role: user.role,
        registration_number: user.registration_number,
        faculty_name: user.faculty_name,
        faculty_id: user.faculty_id,
        department: user.department,
        created_at: user.created_at,
    }
}

pub(crate) fn course_info(course: CourseData) -> CourseInfo {
    CourseInfo {
        course_id: course.course_id,
        code: course.code,
        title: course.title,
        credit_hours: course.credit_hours,
        section_id: course.section_id,
        section_name: course.section_name,
        faculty_id: course.faculty_id,
        description: course.description,
        semester: course.semester,
        created_at: course.created_at,
    }
}

/// Clamps a database count into the `u32` range used by tallies.
pub(crate) fn count_u32(count: i64) -> u32 {
    count.max(0).to_u32().unwrap_or(u32::MAX)
}

/// Loads a course, failing with `ResourceNotFound` if it does not exist.
pub(crate) fn load_course(persistence: &Persistence, course_id: i64) -> Result<CourseData, ApiError> {
    persistence
        .get_course(course_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::not_found("Course", format!("Course {course_id} not found")))
}

/// Loads a course and checks that `actor` owns it.
pub(crate) fn load_owned_course(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
    action: &str,
) -> Result<CourseData, ApiError> {
    let course: CourseData = load_course(persistence, course_id)?;
    AuthorizationService::require_course_owner(actor, &course, action)?;
    Ok(course)
}
