//! Verification Entry
//!
//! Pending one-time email verification code.

use chrono::{DateTime, TimeDelta, Utc};

/// One pending code per email address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationEntry {
    /// Six-digit code
    pub code: u32,
    /// When the code was issued
    pub issued_at: DateTime<Utc>,
}

impl VerificationEntry {
    pub fn new(code: u32, issued_at: DateTime<Utc>) -> Self {
        Self { code, issued_at }
    }

    /// Strictly older than `max_age` at `now`
    pub fn is_stale(&self, max_age: TimeDelta, now: DateTime<Utc>) -> bool {
        now - self.issued_at > max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_is_strict() {
        let now = Utc::now();
        let max_age = TimeDelta::minutes(10);

        assert!(!VerificationEntry::new(123456, now).is_stale(max_age, now));
        assert!(!VerificationEntry::new(123456, now - max_age).is_stale(max_age, now));
        assert!(
            VerificationEntry::new(123456, now - max_age - TimeDelta::seconds(1))
                .is_stale(max_age, now)
        );
    }
}
