use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{JournalError, Result};

/// Tokens identifying one logged-in user. Lives only as long as a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Claims carried by a GoTrue access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Session {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Reads the tokens the magic-link redirect puts in the URL fragment:
    /// `#access_token=...&refresh_token=...&type=magiclink`. Accepts the bare
    /// fragment, the fragment with its `#`, or the whole callback URL.
    pub fn from_fragment(input: &str) -> Result<Session> {
        let fragment = match input.split_once('#') {
            Some((_, frag)) => frag,
            None => input,
        };
        if fragment.trim().is_empty() {
            return Err(JournalError::Unauthenticated);
        }

        let mut access = None;
        let mut refresh = None;
        let mut error_description = None;
        for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
            match key.as_ref() {
                "access_token" => access = Some(value.into_owned()),
                "refresh_token" => refresh = Some(value.into_owned()),
                "error_description" => error_description = Some(value.into_owned()),
                "type" => debug!("Auth callback type: {}", value),
                _ => {}
            }
        }

        if let Some(desc) = error_description {
            return Err(JournalError::Backend(desc));
        }

        match (access, refresh) {
            (Some(a), Some(r)) if !a.is_empty() && !r.is_empty() => Ok(Session {
                access_token: a,
                refresh_token: Some(r),
            }),
            _ => Err(JournalError::Unauthenticated),
        }
    }

    /// Decodes the access token. The signature is checked when a secret is
    /// given; expiry is always checked.
    pub fn claims(&self, secret: Option<&str>) -> Result<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        let key = match secret {
            Some(s) => DecodingKey::from_secret(s.as_bytes()),
            None => {
                validation.insecure_disable_signature_validation();
                DecodingKey::from_secret(&[])
            }
        };

        match decode::<AccessClaims>(&self.access_token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => debug!("Access token expired"),
                    other => debug!("Access token rejected: {:?}", other),
                }
                Err(JournalError::Unauthenticated)
            }
        }
    }
}
