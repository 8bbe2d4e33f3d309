use std::fmt::Display;

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::{base32, hotp, OtpError};

/// Length of a time step in seconds
pub const PERIOD_SECONDS: i64 = 30;

const LAST_MILLISECOND_NANOS: u32 = 999_000_000;

/// A one-shot [Time-based One-time Password](https://datatracker.ietf.org/doc/html/rfc6238)
/// together with the instant after which it is no longer valid.
///
/// Obs.: Always HMAC-SHA1, 6 digits and a 30 second step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpCode {
    code: String,
    expiry_utc: DateTime<Utc>,
}

impl TotpCode {
    /// Generates the code for the time step containing `now`
    /// from an RFC4648 base32 encoded secret.
    pub fn generate(secret_base32: &str, now: DateTime<Utc>) -> Result<Self, OtpError> {
        let key = base32::decode(secret_base32)?;

        let unix_now = unix_seconds(now);
        let step = time_step(unix_now);
        let code = hotp::hotp(&key, step);
        let expiry_utc = expiry(now, unix_now);

        tracing::debug!(time_step = step, expiry = %expiry_utc, "generated authentication code");

        Ok(Self {
            code: format!("{:0padding$}", code, padding = hotp::DIGITS as usize),
            expiry_utc,
        })
    }

    /// The zero-padded 6-digit code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Last instant at which the code is valid, always on millisecond 999
    pub fn expiry_utc(&self) -> DateTime<Utc> {
        self.expiry_utc
    }

    /// Strict: the expiry instant itself is still valid
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_utc
    }

    /// Time left before the code expires, zero once it has
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expiry_utc - now).max(Duration::zero())
    }

    /// The longest time a single code can be valid
    pub fn max_lifetime() -> Duration {
        Duration::seconds(PERIOD_SECONDS)
    }
}

impl Display for TotpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Authentication code: {} (expires at {} UTC)",
            self.code,
            self.expiry_utc.format("%H:%M:%S%.3f")
        )
    }
}

/// Seconds since the UNIX epoch, rounded half up to the nearest second
fn unix_seconds(now: DateTime<Utc>) -> i64 {
    let seconds = now.timestamp();

    if now.timestamp_subsec_millis() >= 500 {
        seconds + 1
    } else {
        seconds
    }
}

/// Truncating division; pre-epoch steps wrap as two's complement
fn time_step(unix_seconds: i64) -> u64 {
    (unix_seconds / PERIOD_SECONDS) as u64
}

fn expiry(now: DateTime<Utc>, unix_now: i64) -> DateTime<Utc> {
    let seconds_to_expiry = PERIOD_SECONDS - unix_now % PERIOD_SECONDS;
    let mut expiry = now + Duration::seconds(seconds_to_expiry);

    // Landing on a step boundary means the next step has begun,
    // step back into the last second of the current one
    if i64::from(expiry.second()) % PERIOD_SECONDS == 0 {
        expiry = expiry - Duration::seconds(1);
    }

    expiry
        .with_nanosecond(LAST_MILLISECOND_NANOS)
        .unwrap_or(expiry)
}
