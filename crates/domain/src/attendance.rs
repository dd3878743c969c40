// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance arithmetic.
//!
//! Percentages weight each status by its score (Present = 100,
//! Leave = 50, Absent = 0) and are rounded to one decimal place.

use crate::types::AttendanceStatus;
use serde::Serialize;

/// Per-student attendance counts for one course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceTally {
    /// Number of sessions the course has, marked or not.
    pub total_sessions: u32,
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
}

impl AttendanceTally {
    #[must_use]
    pub const fn new(total_sessions: u32) -> Self {
        Self {
            total_sessions,
            present: 0,
            absent: 0,
            leave: 0,
        }
    }

    /// Adds `count` records of `status` to the tally.
    pub const fn record(&mut self, status: AttendanceStatus, count: u32) {
        match status {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Absent => self.absent += count,
            AttendanceStatus::Leave => self.leave += count,
        }
    }

    /// `(P×100 + L×50) / (total_sessions×100) × 100`, rounded to one
    /// decimal place. Unmarked sessions count as zero. Returns `0.0` when
    /// the course has no sessions.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total_sessions == 0 {
            return 0.0;
        }
        let earned: f64 = f64::from(self.present) * f64::from(AttendanceStatus::Present.score())
            + f64::from(self.leave) * f64::from(AttendanceStatus::Leave.score());
        let possible: f64 = f64::from(self.total_sessions) * 100.0;
        round_one_decimal(earned / possible * 100.0)
    }
}

/// Mean score over every marked record, rounded to one decimal place.
///
/// Used for the course-level attendance rate, which only considers
/// records that exist. Returns `0.0` when there are no records.
#[must_use]
pub fn attendance_rate(present: u32, absent: u32, leave: u32) -> f64 {
    let records: u32 = present + absent + leave;
    if records == 0 {
        return 0.0;
    }
    let total: f64 = f64::from(present) * f64::from(AttendanceStatus::Present.score())
        + f64::from(leave) * f64::from(AttendanceStatus::Leave.score());
    round_one_decimal(total / f64::from(records))
}

/// Rounds half away from zero to one decimal place.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
