// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `users`: Accounts and role profiles
//! - `courses`: Sections, courses and enrollments
//! - `attendance`: Class sessions and attendance aggregates

pub mod attendance;
pub mod courses;
pub mod users;

use attendance_domain::AttendanceStatus;

/// Record counts per attendance status.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StatusCounts {
    pub present: i64,
    pub absent: i64,
    pub leave: i64,
}

impl StatusCounts {
    /// Adds `n` records of the status stored under `label`. Labels outside
    /// the fixed lookup table are ignored.
    pub fn add(&mut self, label: &str, n: i64) {
        match label.parse::<AttendanceStatus>() {
            Ok(AttendanceStatus::Present) => self.present += n,
            Ok(AttendanceStatus::Absent) => self.absent += n,
            Ok(AttendanceStatus::Leave) => self.leave += n,
            Err(_) => {}
        }
    }
}
