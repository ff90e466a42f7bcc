//! Time-bound validity checks with clock-skew tolerance
//!
//! A reserved time claim that is present but cannot be read as a time makes
//! the claims invalid rather than unbounded.

use super::{Claims, EXPIRATION, NOT_BEFORE};
use chrono::Utc;
use std::time::Duration;

impl Claims {
    /// `true` when `nbf` is absent or `now >= nbf - leeway`
    pub fn is_already_valid(&self, leeway: Duration) -> bool {
        self.is_already_valid_at(Utc::now().timestamp(), leeway)
    }

    /// `true` when `exp` is absent or `now <= exp + leeway`
    pub fn is_still_valid(&self, leeway: Duration) -> bool {
        self.is_still_valid_at(Utc::now().timestamp(), leeway)
    }

    /// Both bounds hold; expiration is checked first
    pub fn is_valid(&self, leeway: Duration) -> bool {
        let now = Utc::now().timestamp();
        self.is_still_valid_at(now, leeway) && self.is_already_valid_at(now, leeway)
    }

    fn is_already_valid_at(&self, now: i64, leeway: Duration) -> bool {
        if !self.contains(NOT_BEFORE) {
            return true;
        }
        match self.not_before() {
            Some(nbf) => now >= nbf.timestamp().saturating_sub(seconds(leeway)),
            None => false,
        }
    }

    fn is_still_valid_at(&self, now: i64, leeway: Duration) -> bool {
        if !self.contains(EXPIRATION) {
            return true;
        }
        match self.expiration() {
            Some(exp) => now <= exp.timestamp().saturating_add(seconds(leeway)),
            None => false,
        }
    }
}

fn seconds(leeway: Duration) -> i64 {
    i64::try_from(leeway.as_secs()).unwrap_or(i64::MAX)
}
