use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;

pub type SharedConfig = Arc<Config>;

#[derive(Debug, Clone)]
pub struct Config {
    // Backend
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// HS256 secret used to verify access tokens locally. Without it the
    /// token claims are read unverified and the backend stays the authority.
    pub supabase_jwt_secret: Option<String>,
    pub http_timeout_secs: u64,

    // HTTP surface
    pub bind_addr: String,
    /// Base URL the magic link redirects back to.
    pub public_url: String,

    // History display
    pub display_tz: Tz,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let secret = env("SUPABASE_JWT_SECRET", "");

        Config {
            supabase_url: env("SUPABASE_URL", "http://localhost:54321")
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: env("SUPABASE_ANON_KEY", ""),
            supabase_jwt_secret: if secret.is_empty() { None } else { Some(secret) },
            http_timeout_secs: env("HTTP_TIMEOUT_SECS", "10").parse().unwrap_or(10),
            bind_addr: env("BIND_ADDR", "127.0.0.1:3000"),
            public_url: env("PUBLIC_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            display_tz: env("DISPLAY_TZ", "UTC").parse().unwrap_or(Tz::UTC),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.public_url)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(self)
    }
}
