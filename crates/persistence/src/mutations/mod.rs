// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `users`: Account and profile creation, password updates
//! - `courses`: Course creation and enrollments
//! - `attendance`: Class sessions and attendance batches
//! - `verification`: Password reset codes

pub mod attendance;
pub mod courses;
pub mod users;
pub mod verification;
