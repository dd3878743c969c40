// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery of one-time verification codes.

use time::OffsetDateTime;
use tracing::{debug, info};

/// Hands a freshly issued verification code to its owner.
pub trait CodeNotifier: Send + Sync {
    /// Delivers `code` to `email`. The code stops working at `expires_at`.
    fn deliver(&self, email: &str, code: &str, expires_at: OffsetDateTime);
}

/// Notifier that records delivery in the log.
///
/// The code itself is only emitted at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl CodeNotifier for TracingNotifier {
    fn deliver(&self, email: &str, code: &str, expires_at: OffsetDateTime) {
        info!(email, %expires_at, "Password reset code issued");
        debug!(email, code, "Password reset code");
    }
}
