// Copyright (C) 2026 The Attendance Tracker Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password reset code persistence tests.

use time::{Duration, OffsetDateTime};

use crate::tests::create_student;
use crate::{MAX_CODE_ATTEMPTS, Persistence, PersistenceError};

const EMAIL: &str = "u2021001@giki.edu.pk";

fn setup() -> Persistence {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_student(&persistence, "2021001", "Ayesha");
    persistence
}

fn password_matches(persistence: &Persistence, password: &str) -> bool {
    let credentials = persistence
        .get_credentials_by_email(EMAIL)
        .unwrap()
        .unwrap();
    persistence.verify_password(password, Some(&credentials.password_hash))
}

#[test]
fn test_reset_with_valid_code() {
    let persistence: Persistence = setup();
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    persistence
        .create_password_reset_code(EMAIL, "123456", now + Duration::minutes(15), now)
        .unwrap();

    persistence
        .reset_password_with_code(EMAIL, "123456", "Fresh1Pass", now)
        .unwrap();
    assert!(password_matches(&persistence, "Fresh1Pass"));
}

#[test]
fn test_code_is_single_use() {
    let persistence: Persistence = setup();
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    persistence
        .create_password_reset_code(EMAIL, "123456", now + Duration::minutes(15), now)
        .unwrap();
    persistence
        .reset_password_with_code(EMAIL, "123456", "Fresh1Pass", now)
        .unwrap();

    assert_eq!(
        persistence.reset_password_with_code(EMAIL, "123456", "Other1Pass", now),
        Err(PersistenceError::InvalidVerificationCode)
    );
    assert!(password_matches(&persistence, "Fresh1Pass"));
}

#[test]
fn test_expired_code_is_rejected() {
    let persistence: Persistence = setup();
    let issued: OffsetDateTime = OffsetDateTime::now_utc() - Duration::minutes(30);
    persistence
        .create_password_reset_code(EMAIL, "123456", issued + Duration::minutes(15), issued)
        .unwrap();

    assert_eq!(
        persistence.reset_password_with_code(
            EMAIL,
            "123456",
            "Fresh1Pass",
            OffsetDateTime::now_utc()
        ),
        Err(PersistenceError::InvalidVerificationCode)
    );
    assert!(password_matches(&persistence, crate::tests::PASSWORD));
}

#[test]
fn test_wrong_code_is_rejected() {
    let persistence: Persistence = setup();
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    persistence
        .create_password_reset_code(EMAIL, "123456", now + Duration::minutes(15), now)
        .unwrap();

    assert_eq!(
        persistence.reset_password_with_code(EMAIL, "654321", "Fresh1Pass", now),
        Err(PersistenceError::InvalidVerificationCode)
    );
}

#[test]
fn test_new_code_supersedes_previous() {
    let persistence: Persistence = setup();
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let expires: OffsetDateTime = now + Duration::minutes(15);
    persistence
        .create_password_reset_code(EMAIL, "111111", expires, now)
        .unwrap();
    persistence
        .create_password_reset_code(EMAIL, "222222", expires, now)
        .unwrap();

    assert_eq!(
        persistence.reset_password_with_code(EMAIL, "111111", "Fresh1Pass", now),
        Err(PersistenceError::InvalidVerificationCode)
    );
    persistence
        .reset_password_with_code(EMAIL, "222222", "Fresh1Pass", now)
        .unwrap();
}

#[test]
fn test_code_is_consumed_after_max_wrong_guesses() {
    let persistence: Persistence = setup();
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    persistence
        .create_password_reset_code(EMAIL, "123456", now + Duration::minutes(15), now)
        .unwrap();

    for guess in 0..MAX_CODE_ATTEMPTS {
        assert_eq!(
            persistence.reset_password_with_code(EMAIL, &format!("{guess:06}"), "Fresh1Pass", now),
            Err(PersistenceError::InvalidVerificationCode)
        );
    }

    assert_eq!(
        persistence.reset_password_with_code(EMAIL, "123456", "Fresh1Pass", now),
        Err(PersistenceError::InvalidVerificationCode)
    );
    assert!(password_matches(&persistence, crate::tests::PASSWORD));
}

#[test]
fn test_code_survives_fewer_wrong_guesses_than_the_limit() {
    let persistence: Persistence = setup();
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    persistence
        .create_password_reset_code(EMAIL, "123456", now + Duration::minutes(15), now)
        .unwrap();

    for guess in 0..MAX_CODE_ATTEMPTS - 1 {
        assert_eq!(
            persistence.reset_password_with_code(EMAIL, &format!("{guess:06}"), "Fresh1Pass", now),
            Err(PersistenceError::InvalidVerificationCode)
        );
    }

    persistence
        .reset_password_with_code(EMAIL, "123456", "Fresh1Pass", now)
        .unwrap();
    assert!(password_matches(&persistence, "Fresh1Pass"));
}

#[test]
fn test_new_code_resets_the_attempt_budget() {
    let persistence: Persistence = setup();
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let expires: OffsetDateTime = now + Duration::minutes(15);
    persistence
        .create_password_reset_code(EMAIL, "123456", expires, now)
        .unwrap();
    for guess in 0..MAX_CODE_ATTEMPTS {
        let _ = persistence.reset_password_with_code(EMAIL, &format!("{guess:06}"), "Fresh1Pass", now);
    }

    persistence
        .create_password_reset_code(EMAIL, "654321", expires, now)
        .unwrap();
    persistence
        .reset_password_with_code(EMAIL, "654321", "Fresh1Pass", now)
        .unwrap();
    assert!(password_matches(&persistence, "Fresh1Pass"));
}
