use anyhow::{Context, Result};

/// Environment-driven configuration, read once at startup and injected from
/// there. The signing algorithm is fixed (HS256), so only the secret and
/// token lifetime are configurable.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub jwt_secret: String,
    pub token_expire_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("PINBOARD_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("PINBOARD_PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .context("PINBOARD_PORT must be a port number")?;
        let db_path = std::env::var("PINBOARD_DB_PATH").unwrap_or_else(|_| "pinboard.db".into());
        let jwt_secret =
            std::env::var("PINBOARD_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
        let token_expire_minutes = std::env::var("PINBOARD_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .context("PINBOARD_TOKEN_EXPIRE_MINUTES must be an integer")?;

        Ok(Self {
            host,
            port,
            db_path,
            jwt_secret,
            token_expire_minutes,
        })
    }
}
