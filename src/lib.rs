pub mod base32;
pub mod hotp;
pub mod totp;

use chrono::{DateTime, Utc};

pub use totp::TotpCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    #[error("Invalid base32 character '{0}'")]
    InvalidCharacter(char),
}

/// Decodes an RFC4648 base32 secret (trailing padding optional,
/// case-insensitive) into its raw bytes.
pub fn decode_base32(secret: &str) -> Result<Vec<u8>, OtpError> {
    base32::decode(secret)
}

/// Generates the 6-digit code for the 30 second step containing `now`.
pub fn generate_totp(secret_base32: &str, now: DateTime<Utc>) -> Result<TotpCode, OtpError> {
    TotpCode::generate(secret_base32, now)
}

/// True once `now` is strictly after the code's expiry instant.
pub fn is_expired(result: &TotpCode, now: DateTime<Utc>) -> bool {
    result.is_expired(now)
}
