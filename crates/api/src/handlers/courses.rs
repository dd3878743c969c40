// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sections, courses and enrollments.

use attendance_domain::{
    CourseCode, RegistrationNumber, attendance_rate, validate_credit_hours, validate_semester,
};
use attendance_persistence::{CourseData, EnrollmentData, NewCourse, Persistence};
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::handlers::{count_u32, course_info, load_owned_course};
use crate::request_response::{
    CourseSummaryInfo, CreateCourseRequest, CreateCourseResponse, EnrollStudentRequest,
    EnrollStudentResponse, EnrolledStudentInfo, EnrollmentInfo, ListCoursesResponse,
    ListEnrolledStudentsResponse, ListSectionsResponse, MessageResponse, SectionInfo,
    StudentCourseInfo, StudentCoursesResponse,
};

const MAX_TITLE_LENGTH: usize = 200;

/// Lists the fixed course sections.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub fn list_sections(persistence: &Persistence) -> Result<ListSectionsResponse, ApiError> {
    let sections: Vec<SectionInfo> = persistence
        .list_sections()
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|s| SectionInfo {
            section_id: s.section_id,
            name: s.name,
        })
        .collect();

    Ok(ListSectionsResponse {
        success: true,
        sections,
    })
}

/// Creates a course owned by the calling faculty member.
///
/// # Errors
///
/// Returns `Unauthorized` for non-faculty, `InvalidInput` for a malformed
/// field, `ResourceNotFound` for an unknown section and `Conflict` for a
/// duplicate course code.
pub fn create_course(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    request: &CreateCourseRequest,
) -> Result<CreateCourseResponse, ApiError> {
    let faculty_id: &str = actor.faculty_id("create_course")?;

    let code: CourseCode = CourseCode::parse(&request.code).map_err(translate_domain_error)?;
    let title: &str = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::invalid_input("title", "Course title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ApiError::invalid_input(
            "title",
            format!("Course title must be at most {MAX_TITLE_LENGTH} characters"),
        ));
    }
    validate_credit_hours(request.credit_hours).map_err(translate_domain_error)?;
    let semester: &str = request.semester.trim();
    validate_semester(semester).map_err(translate_domain_error)?;

    if let Some(section_id) = request.section_id {
        let exists: bool = persistence
            .section_exists(section_id)
            .map_err(translate_persistence_error)?;
        if !exists {
            return Err(ApiError::not_found(
                "Section",
                format!("Section {section_id} not found"),
            ));
        }
    }

    let description: Option<&str> = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let course: CourseData = persistence
        .create_course(&NewCourse {
            code: code.as_str(),
            title,
            credit_hours: request.credit_hours,
            section_id: request.section_id,
            faculty_id,
            description,
            semester,
        })
        .map_err(translate_persistence_error)?;

    info!(course_id = course.course_id, code = %course.code, faculty_id, "Course created");

    Ok(CreateCourseResponse {
        success: true,
        course: course_info(course),
    })
}

/// Lists the calling faculty member's courses with live enrollment counts
/// and attendance rates.
///
/// # Errors
///
/// Returns `Unauthorized` for non-faculty.
pub fn list_courses(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListCoursesResponse, ApiError> {
    let faculty_id: &str = actor.faculty_id("list_courses")?;

    let courses: Vec<CourseSummaryInfo> = persistence
        .list_courses_for_faculty(faculty_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|summary| CourseSummaryInfo {
            attendance_rate: attendance_rate(
                count_u32(summary.present),
                count_u32(summary.absent),
                count_u32(summary.leave),
            ),
            student_count: summary.student_count,
            course: course_info(summary.course),
        })
        .collect();

    Ok(ListCoursesResponse {
        success: true,
        courses,
    })
}

/// Enrolls a student in a course the caller owns.
///
/// Ownership is checked before the student is looked up.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown course or student,
/// `Unauthorized` if the caller does not own the course and `Conflict` if
/// the student is already enrolled.
pub fn enroll_student(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    request: &EnrollStudentRequest,
) -> Result<EnrollStudentResponse, ApiError> {
    const ACTION: &str = "enroll_student";
    actor.faculty_id(ACTION)?;
    let course: CourseData = load_owned_course(persistence, actor, request.course_id, ACTION)?;

    let registration_number: RegistrationNumber =
        RegistrationNumber::parse(&request.registration_number).map_err(translate_domain_error)?;
    persistence
        .get_student(registration_number.as_str())
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            ApiError::not_found(
                "Student",
                format!("Student {registration_number} not found"),
            )
        })?;

    let enrollment: EnrollmentData = persistence
        .enroll_student(course.course_id, registration_number.as_str())
        .map_err(translate_persistence_error)?;

    Ok(EnrollStudentResponse {
        success: true,
        message: format!("Enrolled {registration_number} in {}", course.code),
        enrollment: EnrollmentInfo {
            enrollment_id: enrollment.enrollment_id,
            course_id: enrollment.course_id,
            registration_number: enrollment.registration_number,
            enrolled_at: enrollment.enrolled_at,
        },
    })
}

/// Removes an enrollment from a course the caller owns.
///
/// Existing attendance records are kept but no longer appear in reports.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown enrollment and `Unauthorized`
/// if the caller does not own its course.
pub fn remove_enrollment(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
) -> Result<MessageResponse, ApiError> {
    const ACTION: &str = "remove_enrollment";
    actor.faculty_id(ACTION)?;

    let enrollment: EnrollmentData = persistence
        .get_enrollment(enrollment_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            ApiError::not_found(
                "Enrollment",
                format!("Enrollment {enrollment_id} not found"),
            )
        })?;
    let course: CourseData = load_owned_course(persistence, actor, enrollment.course_id, ACTION)?;

    let deleted: bool = persistence
        .delete_enrollment(enrollment_id)
        .map_err(translate_persistence_error)?;
    if !deleted {
        return Err(ApiError::not_found(
            "Enrollment",
            format!("Enrollment {enrollment_id} not found"),
        ));
    }

    Ok(MessageResponse {
        success: true,
        message: format!(
            "Removed {} from {}",
            enrollment.registration_number, course.code
        ),
    })
}

/// Lists the students enrolled in a course the caller owns, by name.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown course and `Unauthorized` if
/// the caller does not own it.
pub fn list_enrolled_students(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    course_id: i64,
) -> Result<ListEnrolledStudentsResponse, ApiError> {
    const ACTION: &str = "list_enrolled_students";
    actor.faculty_id(ACTION)?;
    let course: CourseData = load_owned_course(persistence, actor, course_id, ACTION)?;

    let students: Vec<EnrolledStudentInfo> = persistence
        .list_enrolled_students(course.course_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|s| EnrolledStudentInfo {
            enrollment_id: s.enrollment_id,
            registration_number: s.registration_number,
            name: s.name,
            email: s.email,
            faculty_name: s.faculty_name,
            enrolled_at: s.enrolled_at,
        })
        .collect();

    Ok(ListEnrolledStudentsResponse {
        success: true,
        course_id: course.course_id,
        students,
    })
}

/// Lists the courses a student is enrolled in, with instructor names.
///
/// # Errors
///
/// Returns `Unauthorized` if a student asks for someone else's courses and
/// `ResourceNotFound` for an unknown student.
pub fn list_student_courses(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
    registration_number: &str,
) -> Result<StudentCoursesResponse, ApiError> {
    let registration_number: RegistrationNumber =
        RegistrationNumber::parse(registration_number).map_err(translate_domain_error)?;
    AuthorizationService::authorize_student_records(
        actor,
        registration_number.as_str(),
        "list_student_courses",
    )?;

    persistence
        .get_student(registration_number.as_str())
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            ApiError::not_found(
                "Student",
                format!("Student {registration_number} not found"),
            )
        })?;

    let courses: Vec<StudentCourseInfo> = persistence
        .list_student_courses(registration_number.as_str())
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|c| StudentCourseInfo {
            enrollment_id: c.enrollment_id,
            course_id: c.course_id,
            code: c.code,
            title: c.title,
            credit_hours: c.credit_hours,
            semester: c.semester,
            section_name: c.section_name,
            faculty_id: c.faculty_id,
            instructor_name: c.instructor_name,
            enrolled_at: c.enrolled_at,
        })
        .collect();

    Ok(StudentCoursesResponse {
        success: true,
        registration_number: registration_number.to_string(),
        courses,
    })
}
