use serde::Deserialize;

/// Password given to the seeded accounts when `SEED_PASSWORD` is not set.
pub const DEFAULT_SEED_PASSWORD: &str = "password123";

const DEFAULT_TTL_MINUTES: i64 = 60 * 24;

/// One year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub seed_password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: require_secret(std::env::var("JWT_SECRET").ok())?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "skillswap".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "skillswap-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok())?,
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5000),
            jwt,
            seed_password: std::env::var("SEED_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_SEED_PASSWORD.into()),
        })
    }

    /// Configuration used by tests and local tooling.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60 * 24,
            },
            seed_password: DEFAULT_SEED_PASSWORD.into(),
        }
    }
}

fn require_secret(value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(secret) if !secret.trim().is_empty() => Ok(secret),
        Some(_) => anyhow::bail!("JWT_SECRET must not be empty"),
        None => anyhow::bail!("JWT_SECRET must be set"),
    }
}

fn parse_ttl_minutes(value: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = value else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes: i64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("JWT_TTL_MINUTES is not a number: {raw}"))?;
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}"
    );
    Ok(minutes)
}
