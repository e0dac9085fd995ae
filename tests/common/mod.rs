use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Tz;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use icc_journal::backend::{AccessClaims, JournalBackend, Session, User};
use icc_journal::config::Config;
use icc_journal::error::{JournalError, Result};
use icc_journal::models::{
    ConfluenceLogRow, IccSetupRow, NewConfluenceLog, NewIccSetup, SortOrder, UserSettings,
};

/// In-memory stand-in for the hosted backend.
#[derive(Default)]
pub struct MockBackend {
    pub setups: Mutex<Vec<NewIccSetup>>,
    pub confluence_logs: Mutex<Vec<NewConfluenceLog>>,
    pub settings: Mutex<HashMap<String, UserSettings>>,
    pub magic_links: Mutex<Vec<(String, String)>>,
    /// Access tokens revoked by sign-out.
    pub revoked: Mutex<HashSet<String>>,
    /// Number of `current_user` round trips.
    pub user_lookups: AtomicUsize,
    /// When set, every table read/write fails with this message.
    pub fail_with: Option<String>,
    /// When set, user lookups fail as if the auth server were down.
    pub auth_down: bool,
}

impl MockBackend {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn auth_unavailable() -> Self {
        Self {
            auth_down: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        match &self.fail_with {
            Some(msg) => Err(JournalError::Backend(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JournalBackend for MockBackend {
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<()> {
        self.magic_links
            .lock()
            .unwrap()
            .push((email.to_string(), redirect_to.to_string()));
        Ok(())
    }

    async fn current_user(&self, session: &Session) -> Result<User> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        if self.auth_down {
            return Err(JournalError::Backend("auth service unavailable".to_string()));
        }
        if self.revoked.lock().unwrap().contains(&session.access_token) {
            return Err(JournalError::Unauthenticated);
        }
        let claims = session.claims(None)?;
        Ok(User {
            id: claims.sub,
            email: claims.email,
        })
    }

    /// Accepts refresh tokens of the form `refresh-<user id>`.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        let sub = refresh_token
            .strip_prefix("refresh-")
            .ok_or(JournalError::Unauthenticated)?;
        Ok(Session {
            access_token: make_token(sub, 3600),
            refresh_token: Some(format!("refresh-{}", sub)),
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        self.revoked
            .lock()
            .unwrap()
            .insert(session.access_token.clone());
        Ok(())
    }

    async fn insert_icc_setup(&self, _session: &Session, record: &NewIccSetup) -> Result<()> {
        self.check()?;
        self.setups.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn insert_confluence_log(
        &self,
        _session: &Session,
        record: &NewConfluenceLog,
    ) -> Result<()> {
        self.check()?;
        self.confluence_logs.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn get_settings(&self, _session: &Session, user_id: &str) -> Result<Option<UserSettings>> {
        self.check()?;
        Ok(self.settings.lock().unwrap().get(user_id).copied())
    }

    async fn upsert_settings(
        &self,
        _session: &Session,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<()> {
        self.check()?;
        self.settings
            .lock()
            .unwrap()
            .insert(user_id.to_string(), *settings);
        Ok(())
    }

    async fn list_setups(
        &self,
        _session: &Session,
        user_id: &str,
        order: SortOrder,
    ) -> Result<Vec<IccSetupRow>> {
        self.check()?;
        let base = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        let mut rows: Vec<IccSetupRow> = self
            .setups
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.user_id == user_id)
            .map(|(i, s)| IccSetupRow {
                id: (i + 1).to_string(),
                pair: s.pair.clone(),
                direction: s.direction,
                indication_type: Some(s.indication_type.clone()),
                created_at: base + Duration::hours(i as i64),
            })
            .collect();
        if order == SortOrder::Desc {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn list_confluence_logs(
        &self,
        _session: &Session,
        user_id: &str,
    ) -> Result<Vec<ConfluenceLogRow>> {
        self.check()?;
        Ok(self
            .confluence_logs
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.user_id == user_id)
            .map(|(i, l)| ConfluenceLogRow {
                id: (i + 1).to_string(),
                weekly_percent: l.weekly_percent,
                daily_percent: l.daily_percent,
                h4_percent: l.h4_percent,
                h2_1h_30m_percent: l.h2_1h_30m_percent,
                lower_tf_percent: l.lower_tf_percent,
                overall_percent: l.overall_percent,
                created_at: None,
            })
            .rev()
            .collect())
    }
}

pub fn make_token(sub: &str, ttl_secs: i64) -> String {
    let claims = AccessClaims {
        sub: sub.to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
        email: Some(format!("{}@example.com", sub)),
        role: Some("authenticated".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

pub fn session_for(sub: &str) -> Session {
    Session::bearer(make_token(sub, 3600))
}

pub fn test_config() -> Config {
    Config {
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "anon-key".to_string(),
        supabase_jwt_secret: None,
        http_timeout_secs: 5,
        bind_addr: "127.0.0.1:0".to_string(),
        public_url: "https://journal.example".to_string(),
        display_tz: Tz::UTC,
        log_level: "ERROR".to_string(),
    }
}
