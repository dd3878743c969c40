// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod session;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use attendance_api::{ApiConfig, CodeNotifier, DEFAULT_EMAIL_DOMAIN, TracingNotifier};
use attendance_persistence::{Persistence, PoolSettings};
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use clap::Parser;
use tracing::{info, warn};

/// Attendance Server - HTTP API for university course attendance tracking
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ATTENDANCE_DATABASE")]
    database: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(long, env = "ATTENDANCE_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "ATTENDANCE_PORT", default_value_t = 3000)]
    port: u16,

    /// Secret used to sign bearer tokens (at least 16 bytes)
    #[arg(long, env = "ATTENDANCE_TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,

    /// Bearer token lifetime in hours
    #[arg(long, env = "ATTENDANCE_TOKEN_TTL_HOURS", default_value_t = 24)]
    token_ttl_hours: u32,

    /// Institutional e-mail domain accepted at registration
    #[arg(long, env = "ATTENDANCE_EMAIL_DOMAIN", default_value = DEFAULT_EMAIL_DOMAIN)]
    email_domain: String,

    /// Seconds to wait for a database connection before answering 503
    #[arg(long, env = "ATTENDANCE_DB_TIMEOUT_SECS", default_value_t = 5)]
    db_timeout_secs: u64,

    /// Maximum number of pooled database connections
    #[arg(long, env = "ATTENDANCE_DB_POOL_SIZE", default_value_t = 8)]
    db_pool_size: u32,

    /// Password reset code lifetime in minutes
    #[arg(long, env = "ATTENDANCE_RESET_CODE_TTL_MINUTES", default_value_t = 15)]
    reset_code_ttl_minutes: u32,
}

/// Application state shared across handlers.
///
/// The persistence handle is a cloneable connection pool; everything else
/// is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub persistence: Persistence,
    pub config: Arc<ApiConfig>,
    pub notifier: Arc<dyn CodeNotifier>,
}

/// Builds the application router.
///
/// Public routes need no token. Everything else passes `authenticate`
/// first, and the faculty and admin groups then check the role.
fn build_router(app_state: AppState) -> Router {
    let faculty: Router<AppState> = Router::new()
        .route(
            "/faculty/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/faculty/course/{id}/students",
            get(handlers::list_enrolled_students),
        )
        .route("/faculty/enroll-student", post(handlers::enroll_student))
        .route(
            "/faculty/enrollment/{id}",
            delete(handlers::remove_enrollment),
        )
        .route("/faculty/create-session", post(handlers::create_session))
        .route("/faculty/course/{id}/sessions", get(handlers::list_sessions))
        .route("/faculty/save-attendance", post(handlers::save_attendance))
        .route(
            "/faculty/course/{id}/attendance",
            get(handlers::course_attendance),
        )
        .route(
            "/faculty/course/{id}/attendance.csv",
            get(handlers::export_course_attendance),
        )
        .route_layer(middleware::from_fn(session::require_faculty));

    let admin: Router<AppState> = Router::new()
        .route("/admin/users", get(handlers::list_users))
        .route_layer(middleware::from_fn(session::require_admin));

    let authenticated: Router<AppState> = Router::new()
        .route("/auth/me", get(handlers::me))
        .route("/sections", get(handlers::list_sections))
        .route(
            "/student/courses/{registration_number}",
            get(handlers::list_student_courses),
        )
        .route(
            "/student/course/{course_id}/attendance/{registration_number}",
            get(handlers::student_course_attendance),
        )
        .merge(faculty)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::authenticate,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route(
            "/auth/password-reset/request",
            post(handlers::request_password_reset),
        )
        .route(
            "/auth/password-reset/confirm",
            post(handlers::confirm_password_reset),
        )
        .merge(authenticated)
        .fallback(error::not_found)
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Attendance Server");

    let config: ApiConfig = ApiConfig::new(
        &args.email_domain,
        &args.token_secret,
        time::Duration::hours(i64::from(args.token_ttl_hours)),
        time::Duration::minutes(i64::from(args.reset_code_ttl_minutes)),
    )?;

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        let settings: PoolSettings = PoolSettings {
            max_size: args.db_pool_size,
            connection_timeout: std::time::Duration::from_secs(args.db_timeout_secs),
        };
        Persistence::new_with_file(db_path, &settings)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence,
        config: Arc::new(config),
        notifier: Arc::new(TracingNotifier),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
