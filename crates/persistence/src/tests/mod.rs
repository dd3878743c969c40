// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod attendance_tests;
mod course_tests;
mod initialization_tests;
mod user_tests;
mod verification_tests;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use attendance_domain::{FacultyId, RegistrationNumber, RoleProfile};

use crate::{CourseData, CourseSessionData, NewCourse, NewCourseSession, Persistence, PoolSettings};

pub const PASSWORD: &str = "Secur3Pass";

static TEMP_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A database file under the system temp directory, removed on drop along
/// with its WAL side files.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new(label: &str) -> Self {
        let n: u64 = TEMP_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path: PathBuf = std::env::temp_dir().join(format!(
            "attendance_{label}_{}_{n}.db",
            std::process::id()
        ));
        let database: Self = Self { path };
        database.remove_files();
        database
    }

    pub fn open(&self, settings: &PoolSettings) -> Persistence {
        Persistence::new_with_file(&self.path, settings).unwrap()
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap()
    }

    fn remove_files(&self) {
        let _ = std::fs::remove_file(&self.path);
        let _ = std::fs::remove_file(self.path.with_extension("db-wal"));
        let _ = std::fs::remove_file(self.path.with_extension("db-shm"));
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        self.remove_files();
    }
}

pub fn create_student(persistence: &Persistence, registration_number: &str, name: &str) -> i64 {
    let profile: RoleProfile = RoleProfile::Student {
        registration_number: RegistrationNumber::parse(registration_number).unwrap(),
        faculty_name: String::from("FCSE"),
    };
    persistence
        .create_user(
            name,
            &format!("u{registration_number}@giki.edu.pk"),
            PASSWORD,
            &profile,
        )
        .unwrap()
}

pub fn create_faculty(persistence: &Persistence, faculty_id: &str, local_part: &str) -> i64 {
    let profile: RoleProfile = RoleProfile::Faculty {
        faculty_id: FacultyId::parse(faculty_id).unwrap(),
        department: String::from("Computer Science"),
    };
    persistence
        .create_user(
            &format!("Dr {local_part}"),
            &format!("{local_part}@giki.edu.pk"),
            PASSWORD,
            &profile,
        )
        .unwrap()
}

pub fn create_course(persistence: &Persistence, code: &str, faculty_id: &str) -> CourseData {
    persistence
        .create_course(&NewCourse {
            code,
            title: "Data Structures",
            credit_hours: 3,
            section_id: Some(1),
            faculty_id,
            description: None,
            semester: "Fall 2026",
        })
        .unwrap()
}

pub fn create_session(
    persistence: &Persistence,
    course: &CourseData,
    date: &str,
    start_time: &str,
) -> CourseSessionData {
    let code: String = format!("{}-{}-{}", course.code, date.replace('-', ""), start_time.replace(':', ""));
    persistence
        .create_session(&NewCourseSession {
            session_code: &code,
            course_id: course.course_id,
            session_date: date,
            start_time,
            duration_minutes: 60,
        })
        .unwrap()
}
