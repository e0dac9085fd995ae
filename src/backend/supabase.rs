use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::{JournalBackend, Session, User};
use crate::config::Config;
use crate::error::{JournalError, Result};
use crate::models::{
    ConfluenceLogRow, IccSetupRow, NewConfluenceLog, NewIccSetup, SettingsRow, SortOrder,
    UserSettings,
};

const SETUPS_TABLE: &str = "icc_setups";
const CONFLUENCE_TABLE: &str = "confluence_logs";
const SETTINGS_TABLE: &str = "icc_settings";

const SETUP_HISTORY_COLUMNS: &str = "id,pair,direction,indication_type,created_at";

const PREFER_MINIMAL: &str = "return=minimal";
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Error envelope; GoTrue and PostgREST disagree on the field name.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// GoTrue + PostgREST client for a Supabase project.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder().timeout(cfg.http_timeout()).build()?;
        Ok(Self {
            client,
            base_url: cfg.supabase_url.clone(),
            anon_key: cfg.supabase_anon_key.clone(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Request carrying the project key and, when given, the user's token.
    /// Anonymous requests authenticate with the anon key itself.
    fn request(&self, method: Method, url: &str, session: Option<&Session>) -> RequestBuilder {
        let token = session.map_or(self.anon_key.as_str(), |s| s.access_token.as_str());
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    // --- GoTrue ---

    fn otp_request(&self, email: &str, redirect_to: &str) -> RequestBuilder {
        self.request(Method::POST, &self.auth_url("otp"), None)
            .query(&[("redirect_to", redirect_to)])
            .json(&OtpRequest {
                email,
                create_user: true,
            })
    }

    fn user_request(&self, session: &Session) -> RequestBuilder {
        self.request(Method::GET, &self.auth_url("user"), Some(session))
    }

    fn refresh_request(&self, refresh_token: &str) -> RequestBuilder {
        self.request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshRequest { refresh_token })
    }

    fn logout_request(&self, session: &Session) -> RequestBuilder {
        self.request(Method::POST, &self.auth_url("logout"), Some(session))
            .query(&[("scope", "global")])
    }

    // --- PostgREST ---

    fn insert_request<T: Serialize>(&self, session: &Session, table: &str, row: &T) -> RequestBuilder {
        self.request(Method::POST, &self.rest_url(table), Some(session))
            .header("Prefer", PREFER_MINIMAL)
            .json(row)
    }

    fn settings_select_request(&self, session: &Session, user_id: &str) -> RequestBuilder {
        let user_filter = format!("eq.{}", user_id);
        self.request(Method::GET, &self.rest_url(SETTINGS_TABLE), Some(session))
            .query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("limit", "1"),
            ])
    }

    fn settings_upsert_request(&self, session: &Session, row: &SettingsRow) -> RequestBuilder {
        self.request(Method::POST, &self.rest_url(SETTINGS_TABLE), Some(session))
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", PREFER_UPSERT)
            .json(row)
    }

    fn setups_select_request(
        &self,
        session: &Session,
        user_id: &str,
        order: SortOrder,
    ) -> RequestBuilder {
        let user_filter = format!("eq.{}", user_id);
        let order = format!("created_at.{}", order.as_str());
        self.request(Method::GET, &self.rest_url(SETUPS_TABLE), Some(session))
            .query(&[
                ("select", SETUP_HISTORY_COLUMNS),
                ("user_id", user_filter.as_str()),
                ("order", order.as_str()),
            ])
    }

    fn confluence_select_request(&self, session: &Session, user_id: &str) -> RequestBuilder {
        let user_filter = format!("eq.{}", user_id);
        self.request(Method::GET, &self.rest_url(CONFLUENCE_TABLE), Some(session))
            .query(&[
                ("select", "*"),
                ("user_id", user_filter.as_str()),
                ("order", "created_at.desc"),
            ])
    }

    async fn check(resp: Response, what: &str) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            debug!("{} rejected session: {}", what, body);
            return Err(JournalError::Unauthenticated);
        }
        let message = error_message(status, &body);
        warn!("{} failed ({}): {}", what, status, message);
        Err(JournalError::Backend(message))
    }

    async fn insert<T: Serialize + Sync>(&self, session: &Session, table: &str, row: &T) -> Result<()> {
        let resp = self.insert_request(session, table, row).send().await?;
        Self::check(resp, table).await?;
        Ok(())
    }
}

/// Best human-readable message from an error response.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            }
        })
}

#[async_trait]
impl JournalBackend for SupabaseClient {
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<()> {
        let resp = self.otp_request(email, redirect_to).send().await?;
        Self::check(resp, "otp").await?;
        info!("Magic link sent to {}", email);
        Ok(())
    }

    async fn current_user(&self, session: &Session) -> Result<User> {
        let resp = self.user_request(session).send().await?;
        let resp = Self::check(resp, "user").await?;
        Ok(resp.json::<User>().await?)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        let resp = self.refresh_request(refresh_token).send().await?;
        // GoTrue answers a spent or unknown refresh token with 400 invalid_grant.
        if resp.status() == StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            debug!("Refresh rejected: {}", error_message(StatusCode::BAD_REQUEST, &body));
            return Err(JournalError::Unauthenticated);
        }
        let resp = Self::check(resp, "token").await?;
        let tokens: TokenResponse = resp.json().await?;
        debug!("Session refreshed");
        Ok(Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let resp = self.logout_request(session).send().await?;
        match resp.status() {
            // Session already gone server-side.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!("Logout: session already invalid ({})", resp.status());
                Ok(())
            }
            _ => {
                Self::check(resp, "logout").await?;
                info!("Signed out");
                Ok(())
            }
        }
    }

    async fn insert_icc_setup(&self, session: &Session, record: &NewIccSetup) -> Result<()> {
        self.insert(session, SETUPS_TABLE, record).await?;
        info!(
            "Saved ICC setup {} {} for {}",
            record.pair, record.direction, record.user_id
        );
        Ok(())
    }

    async fn insert_confluence_log(
        &self,
        session: &Session,
        record: &NewConfluenceLog,
    ) -> Result<()> {
        self.insert(session, CONFLUENCE_TABLE, record).await?;
        info!(
            "Saved confluence log ({}%) for {}",
            record.overall_percent, record.user_id
        );
        Ok(())
    }

    async fn get_settings(&self, session: &Session, user_id: &str) -> Result<Option<UserSettings>> {
        let resp = self.settings_select_request(session, user_id).send().await?;
        let resp = Self::check(resp, SETTINGS_TABLE).await?;
        let rows: Vec<SettingsRow> = resp.json().await?;
        Ok(rows.into_iter().next().map(|r| r.settings))
    }

    async fn upsert_settings(
        &self,
        session: &Session,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<()> {
        let row = SettingsRow {
            user_id: user_id.to_string(),
            settings: *settings,
            updated_at: Some(Utc::now()),
        };
        let resp = self.settings_upsert_request(session, &row).send().await?;
        Self::check(resp, SETTINGS_TABLE).await?;
        info!("Settings saved for {}", user_id);
        Ok(())
    }

    async fn list_setups(
        &self,
        session: &Session,
        user_id: &str,
        order: SortOrder,
    ) -> Result<Vec<IccSetupRow>> {
        let resp = self
            .setups_select_request(session, user_id, order)
            .send()
            .await?;
        let resp = Self::check(resp, SETUPS_TABLE).await?;
        Ok(resp.json().await?)
    }

    async fn list_confluence_logs(
        &self,
        session: &Session,
        user_id: &str,
    ) -> Result<Vec<ConfluenceLogRow>> {
        let resp = self.confluence_select_request(session, user_id).send().await?;
        let resp = Self::check(resp, CONFLUENCE_TABLE).await?;
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Timeframe};
    use crate::test_helpers::default_test_config;
    use std::collections::HashMap;

    fn client() -> SupabaseClient {
        SupabaseClient::new(&default_test_config()).unwrap()
    }

    fn query(req: &reqwest::Request) -> HashMap<String, String> {
        req.url().query_pairs().into_owned().collect()
    }

    fn json_body(req: &reqwest::Request) -> serde_json::Value {
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn urls_are_rooted_at_project() {
        let client = client();
        assert_eq!(
            client.rest_url(SETUPS_TABLE),
            "http://localhost:54321/rest/v1/icc_setups"
        );
        assert_eq!(client.auth_url("otp"), "http://localhost:54321/auth/v1/otp");
    }

    #[test]
    fn request_attaches_key_and_token() {
        let client = client();
        let session = Session::bearer("user-token");
        let req = client.user_request(&session).build().unwrap();
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.url().path(), "/auth/v1/user");
        assert_eq!(req.headers()["apikey"], "anon-key");
        assert_eq!(req.headers()["authorization"], "Bearer user-token");
    }

    #[test]
    fn otp_creates_user_and_redirects() {
        let req = client()
            .otp_request("trader@example.com", "http://localhost:3000/auth/callback")
            .build()
            .unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.url().path(), "/auth/v1/otp");
        assert_eq!(req.headers()["authorization"], "Bearer anon-key");
        assert_eq!(
            query(&req)["redirect_to"],
            "http://localhost:3000/auth/callback"
        );
        let body = json_body(&req);
        assert_eq!(body["email"], "trader@example.com");
        assert_eq!(body["create_user"], true);
    }

    #[test]
    fn refresh_uses_token_grant() {
        let req = client().refresh_request("r-1").build().unwrap();
        assert_eq!(req.url().path(), "/auth/v1/token");
        assert_eq!(query(&req)["grant_type"], "refresh_token");
        assert_eq!(json_body(&req)["refresh_token"], "r-1");
        assert_eq!(req.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn logout_sends_user_token() {
        let req = client()
            .logout_request(&Session::bearer("user-token"))
            .build()
            .unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.url().path(), "/auth/v1/logout");
        assert_eq!(query(&req)["scope"], "global");
        assert_eq!(req.headers()["authorization"], "Bearer user-token");
    }

    #[test]
    fn insert_returns_minimal() {
        let record = NewConfluenceLog {
            user_id: "u1".into(),
            weekly_percent: 10.0,
            daily_percent: 20.0,
            h4_percent: 0.0,
            h2_1h_30m_percent: 0.0,
            lower_tf_percent: 10.0,
            overall_percent: 40.0,
        };
        let req = client()
            .insert_request(&Session::bearer("t"), CONFLUENCE_TABLE, &record)
            .build()
            .unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.url().path(), "/rest/v1/confluence_logs");
        assert_eq!(req.headers()["prefer"], "return=minimal");
        let body = json_body(&req);
        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["overall_percent"], 40.0);
    }

    #[test]
    fn setup_insert_carries_columns() {
        let record = NewIccSetup {
            user_id: "u1".into(),
            pair: "XAUUSD".into(),
            direction: Direction::Long,
            htf: Timeframe::D1,
            indication_type: "Grade: A".into(),
            indication_price: 2500.0,
            correction_done: true,
            liquidity_grab: false,
            ltf: Timeframe::M5,
            ltf_structure_ok: true,
            sl_price: Some(2450.0),
            entry_price: Some(2500.0),
            risk_percent: Some(1.0),
        };
        let req = client()
            .insert_request(&Session::bearer("t"), SETUPS_TABLE, &record)
            .build()
            .unwrap();
        let body = json_body(&req);
        assert_eq!(body["htf"], "Daily");
        assert_eq!(body["ltf"], "5m");
        assert_eq!(body["liquidity_grab"], false);
        assert_eq!(body["entry_price"], 2500.0);
    }

    #[test]
    fn settings_upsert_merges_on_user() {
        let row = SettingsRow {
            user_id: "u1".into(),
            settings: UserSettings::default(),
            updated_at: None,
        };
        let req = client()
            .settings_upsert_request(&Session::bearer("t"), &row)
            .build()
            .unwrap();
        assert_eq!(req.url().path(), "/rest/v1/icc_settings");
        assert_eq!(query(&req)["on_conflict"], "user_id");
        assert_eq!(
            req.headers()["prefer"],
            "resolution=merge-duplicates,return=minimal"
        );
        let body = json_body(&req);
        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["min_score"], 60.0);
        assert_eq!(body["m15_weight"], 5.0);
    }

    #[test]
    fn selects_filter_by_user() {
        let client = client();
        let session = Session::bearer("t");

        let req = client.settings_select_request(&session, "u1").build().unwrap();
        let q = query(&req);
        assert_eq!(q["user_id"], "eq.u1");
        assert_eq!(q["limit"], "1");

        let req = client
            .setups_select_request(&session, "u1", SortOrder::Desc)
            .build()
            .unwrap();
        let q = query(&req);
        assert_eq!(req.url().path(), "/rest/v1/icc_setups");
        assert_eq!(q["select"], SETUP_HISTORY_COLUMNS);
        assert_eq!(q["user_id"], "eq.u1");
        assert_eq!(q["order"], "created_at.desc");

        let req = client
            .setups_select_request(&session, "u1", SortOrder::Asc)
            .build()
            .unwrap();
        assert_eq!(query(&req)["order"], "created_at.asc");

        let req = client.confluence_select_request(&session, "u1").build().unwrap();
        let q = query(&req);
        assert_eq!(req.url().path(), "/rest/v1/confluence_logs");
        assert_eq!(q["user_id"], "eq.u1");
        assert_eq!(q["order"], "created_at.desc");
    }

    #[test]
    fn error_message_prefers_backend_text() {
        assert_eq!(
            error_message(
                StatusCode::CONFLICT,
                r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#
            ),
            "duplicate key value violates unique constraint"
        );
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS, r#"{"msg":"Email rate limit exceeded"}"#),
            "Email rate limit exceeded"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "503 Service Unavailable"
        );
    }
}
