// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Axum handlers.
//!
//! Persistence is synchronous, so every handler hands its work to
//! [`run_blocking`] and only deals with extraction and status codes.

use std::sync::Arc;

use attendance_api::handlers::{admin, attendance, auth, courses, reset};
use attendance_api::{
    ApiConfig, ApiError, CodeNotifier, CourseAttendanceResponse, CreateCourseRequest,
    CreateCourseResponse, CreateSessionRequest, CreateSessionResponse, CsvExport,
    EnrollStudentRequest, EnrollStudentResponse, ListCoursesResponse,
    ListEnrolledStudentsResponse, ListSectionsResponse, ListSessionsResponse, ListUsersResponse,
    LoginRequest, LoginResponse, MeResponse, MessageResponse, PasswordResetConfirmRequest,
    PasswordResetRequest, RegisterRequest, RegisterResponse, SaveAttendanceRequest,
    SaveAttendanceResponse, StudentCourseAttendanceResponse, StudentCoursesResponse,
    translate_persistence_error,
};
use attendance_persistence::Persistence;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AppState;
use crate::error::{ApiJson, ApiPath, HttpError};
use crate::session::SessionActor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
}

/// Runs a persistence-bound closure on the blocking pool.
async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&Persistence) -> Result<T, ApiError> + Send + 'static,
{
    let persistence: Persistence = state.persistence.clone();
    tokio::task::spawn_blocking(move || f(&persistence))
        .await
        .map_err(|e| HttpError::internal(&format!("Blocking task failed: {e}")))?
        .map_err(HttpError::from)
}

/// Liveness check that also checks out a database connection.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, HttpError> {
    run_blocking(&state, |p| p.ping().map_err(translate_persistence_error)).await?;
    Ok(Json(HealthResponse {
        success: true,
        status: String::from("ok"),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), HttpError> {
    let config: Arc<ApiConfig> = Arc::clone(&state.config);
    let response: RegisterResponse =
        run_blocking(&state, move |p| auth::register(p, &config, &request)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let config: Arc<ApiConfig> = Arc::clone(&state.config);
    let response: LoginResponse = run_blocking(&state, move |p| {
        auth::login(p, &config, &request, OffsetDateTime::now_utc())
    })
    .await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<MeResponse>, HttpError> {
    let response: MeResponse = run_blocking(&state, move |p| auth::me(p, &actor)).await?;
    Ok(Json(response))
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let config: Arc<ApiConfig> = Arc::clone(&state.config);
    let notifier: Arc<dyn CodeNotifier> = Arc::clone(&state.notifier);
    let response: MessageResponse = run_blocking(&state, move |p| {
        reset::request_password_reset(
            p,
            &config,
            notifier.as_ref(),
            &request,
            OffsetDateTime::now_utc(),
        )
    })
    .await?;
    Ok(Json(response))
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PasswordResetConfirmRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = run_blocking(&state, move |p| {
        reset::confirm_password_reset(p, &request, OffsetDateTime::now_utc())
    })
    .await?;
    Ok(Json(response))
}

pub async fn list_sections(
    State(state): State<AppState>,
) -> Result<Json<ListSectionsResponse>, HttpError> {
    let response: ListSectionsResponse = run_blocking(&state, courses::list_sections).await?;
    Ok(Json(response))
}

pub async fn list_courses(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListCoursesResponse>, HttpError> {
    let response: ListCoursesResponse =
        run_blocking(&state, move |p| courses::list_courses(p, &actor)).await?;
    Ok(Json(response))
}

pub async fn create_course(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiJson(request): ApiJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CreateCourseResponse>), HttpError> {
    let response: CreateCourseResponse =
        run_blocking(&state, move |p| courses::create_course(p, &actor, &request)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_enrolled_students(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiPath(course_id): ApiPath<i64>,
) -> Result<Json<ListEnrolledStudentsResponse>, HttpError> {
    let response: ListEnrolledStudentsResponse = run_blocking(&state, move |p| {
        courses::list_enrolled_students(p, &actor, course_id)
    })
    .await?;
    Ok(Json(response))
}

pub async fn enroll_student(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiJson(request): ApiJson<EnrollStudentRequest>,
) -> Result<(StatusCode, Json<EnrollStudentResponse>), HttpError> {
    let response: EnrollStudentResponse =
        run_blocking(&state, move |p| courses::enroll_student(p, &actor, &request)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn remove_enrollment(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiPath(enrollment_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let response: MessageResponse = run_blocking(&state, move |p| {
        courses::remove_enrollment(p, &actor, enrollment_id)
    })
    .await?;
    Ok(Json(response))
}

pub async fn list_student_courses(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiPath(registration_number): ApiPath<String>,
) -> Result<Json<StudentCoursesResponse>, HttpError> {
    let response: StudentCoursesResponse = run_blocking(&state, move |p| {
        courses::list_student_courses(p, &actor, &registration_number)
    })
    .await?;
    Ok(Json(response))
}

pub async fn create_session(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiJson(request): ApiJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), HttpError> {
    let response: CreateSessionResponse = run_blocking(&state, move |p| {
        attendance::create_session(p, &actor, &request)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiPath(course_id): ApiPath<i64>,
) -> Result<Json<ListSessionsResponse>, HttpError> {
    let response: ListSessionsResponse =
        run_blocking(&state, move |p| attendance::list_sessions(p, &actor, course_id)).await?;
    Ok(Json(response))
}

pub async fn save_attendance(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiJson(request): ApiJson<SaveAttendanceRequest>,
) -> Result<Json<SaveAttendanceResponse>, HttpError> {
    let response: SaveAttendanceResponse = run_blocking(&state, move |p| {
        attendance::save_attendance(p, &actor, &request, OffsetDateTime::now_utc())
    })
    .await?;
    Ok(Json(response))
}

pub async fn course_attendance(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiPath(course_id): ApiPath<i64>,
) -> Result<Json<CourseAttendanceResponse>, HttpError> {
    let response: CourseAttendanceResponse = run_blocking(&state, move |p| {
        attendance::course_attendance(p, &actor, course_id)
    })
    .await?;
    Ok(Json(response))
}

/// Serves the course report as a CSV download.
pub async fn export_course_attendance(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiPath(course_id): ApiPath<i64>,
) -> Result<Response, HttpError> {
    let export: CsvExport = run_blocking(&state, move |p| {
        attendance::export_course_attendance_csv(p, &actor, course_id)
    })
    .await?;

    let headers: [(header::HeaderName, String); 2] = [
        (header::CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ),
    ];
    Ok((headers, export.body).into_response())
}

pub async fn student_course_attendance(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    ApiPath((course_id, registration_number)): ApiPath<(i64, String)>,
) -> Result<Json<StudentCourseAttendanceResponse>, HttpError> {
    let response: StudentCourseAttendanceResponse = run_blocking(&state, move |p| {
        attendance::student_course_attendance(p, &actor, course_id, &registration_number)
    })
    .await?;
    Ok(Json(response))
}

pub async fn list_users(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let response: ListUsersResponse =
        run_blocking(&state, move |p| admin::list_users(p, &actor)).await?;
    Ok(Json(response))
}
