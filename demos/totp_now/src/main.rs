use chrono::Utc;
use steptotp::generate_totp;
use tracing::info;

const SECRET_VAR: &str = "TOTP_SECRET";
const SAMPLE_SECRET: &str = "Y7UMQ6623V236S65A7B2GB5IW6P35E3N";

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Fall back to the sample secret when none is configured
    let secret = std::env::var(SECRET_VAR).unwrap_or_else(|_| SAMPLE_SECRET.to_string());

    // One code per login attempt, generated right before it is submitted
    let now = Utc::now();
    let totp = generate_totp(&secret, now)?;

    info!(remaining_ms = totp.remaining(now).num_milliseconds(), "code ready");
    println!("{totp}");

    Ok(())
}
