use chrono::Utc;
use chrono_tz::Tz;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::backend::AccessClaims;
use crate::config::Config;
use crate::models::{Direction, Instrument, TrendState};
use crate::scoring::{IccFlags, IccForm, TrendReadings};

/// All three ICC stages confirmed.
pub fn full_icc() -> IccFlags {
    IccFlags {
        indication: true,
        correction: true,
        continuation: true,
    }
}

/// Gold long with every trend bullish, full ICC, entry 2500 / stop 2450 /
/// target 2600 (2R) and a $1000 account at the default risk.
pub fn long_gold_form() -> IccForm {
    IccForm {
        instrument: Instrument::Xauusd,
        direction: Direction::Long,
        trends: TrendReadings::all(TrendState::Bullish),
        flags: full_icc(),
        indication_price: Some(2500.0),
        sl_price: Some(2450.0),
        tp_price: Some(2600.0),
        account_size: Some(1000.0),
        ..IccForm::default()
    }
}

/// HS256 access token for `sub`, expiring `ttl_secs` from now (negative for
/// an already-expired token).
pub fn make_token(sub: &str, secret: &str, ttl_secs: i64) -> String {
    let claims = AccessClaims {
        sub: sub.to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
        email: Some(format!("{}@example.com", sub)),
        role: Some("authenticated".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// A Config suitable for testing: local backend, fixed keys, UTC display.
pub fn default_test_config() -> Config {
    Config {
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "anon-key".to_string(),
        supabase_jwt_secret: None,
        http_timeout_secs: 5,
        bind_addr: "127.0.0.1:0".to_string(),
        public_url: "http://localhost:3000".to_string(),
        display_tz: Tz::UTC,
        log_level: "ERROR".to_string(),
    }
}
