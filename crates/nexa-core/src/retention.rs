// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily message retention.
//!
//! Messages are cleared once per day at a fixed local wall-clock time. A
//! sweep is due when the current time has passed today's reset point and the
//! previous sweep happened before it. Running the sweep moves `last_reset`
//! to "now", so a second run the same day is a no-op.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};

use crate::error::NexaError;

/// When the daily retention sweep fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    reset_time: NaiveTime,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            reset_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl RetentionPolicy {
    /// Builds a policy firing at `hour:minute` local time.
    pub fn new(hour: u32, minute: u32) -> Result<Self, NexaError> {
        let reset_time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            NexaError::Config(format!("invalid retention reset time {hour:02}:{minute:02}"))
        })?;
        Ok(Self { reset_time })
    }

    pub fn reset_time(&self) -> NaiveTime {
        self.reset_time
    }

    /// Today's reset point in the offset of `now`.
    pub fn reset_point(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let offset = *now.offset();
        let local = now.date_naive().and_time(self.reset_time);
        let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc, offset)
    }

    /// Whether a sweep should run at `now` given the previous sweep time.
    pub fn is_due(&self, last_reset: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
        let point = self.reset_point(now).with_timezone(&Utc);
        now.with_timezone(&Utc) >= point && last_reset < point
    }
}
