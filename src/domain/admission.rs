//! Admission policy for pixel placement.
//!
//! Pure verdict functions with no side effects: the commit pipeline is
//! responsible for applying the cooldown bookkeeping atomically with the
//! canvas mutation, so the check and the update stay under one lock.

use super::{entity::User, value_object::Timestamp};

/// Minimum interval between accepted placements for non-admin users
pub const COOLDOWN_MILLIS: i64 = 10_000;

/// Verdict rendered by the admission policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionVerdict {
    /// Placement is allowed
    Admit,
    /// Placement is denied; the user must wait the given number of seconds
    Deny { remaining_seconds: u64 },
}

/// Decide whether a placement by `user` is allowed at `now`.
///
/// Admins are always admitted and are exempt from cooldown bookkeeping.
/// A user with no prior placement is treated as having waited forever.
/// Time is server arrival time, never client-declared time.
pub fn evaluate_admission(user: &User, now: Timestamp) -> AdmissionVerdict {
    if user.is_admin {
        return AdmissionVerdict::Admit;
    }

    match remaining_cooldown_seconds(user, now) {
        0 => AdmissionVerdict::Admit,
        remaining_seconds => AdmissionVerdict::Deny { remaining_seconds },
    }
}

/// Remaining cooldown for `user` at `now`, in whole seconds (rounded up).
///
/// Returns 0 for admins, for users with no prior placement, and for users
/// whose cooldown window has elapsed. Also feeds the leaderboard's
/// `waiting_time_seconds` field.
pub fn remaining_cooldown_seconds(user: &User, now: Timestamp) -> u64 {
    if user.is_admin {
        return 0;
    }

    let Some(last) = user.last_placement_at else {
        return 0;
    };

    let elapsed = now.value().saturating_sub(last.value());
    if elapsed >= COOLDOWN_MILLIS {
        return 0;
    }

    let remaining_millis = COOLDOWN_MILLIS - elapsed;
    // Round up so a 9.5s wait is reported as 10s, never 9s
    remaining_millis.div_ceil(1000) as u64
}
