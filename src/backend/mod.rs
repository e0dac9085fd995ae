pub mod session;
pub mod supabase;

pub use session::{AccessClaims, Session};
pub use supabase::SupabaseClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    ConfluenceLogRow, IccSetupRow, NewConfluenceLog, NewIccSetup, SortOrder, UserSettings,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Hosted store behind the journal: auth plus three tables. Every call is a
/// single independent request; nothing is retried.
#[async_trait]
pub trait JournalBackend: Send + Sync {
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<()>;
    async fn current_user(&self, session: &Session) -> Result<User>;
    /// Trades a refresh token for a new access/refresh pair.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session>;
    /// Revokes the session's refresh tokens everywhere.
    async fn sign_out(&self, session: &Session) -> Result<()>;
    async fn insert_icc_setup(&self, session: &Session, record: &NewIccSetup) -> Result<()>;
    async fn insert_confluence_log(&self, session: &Session, record: &NewConfluenceLog)
        -> Result<()>;
    async fn get_settings(&self, session: &Session, user_id: &str) -> Result<Option<UserSettings>>;
    async fn upsert_settings(
        &self,
        session: &Session,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<()>;
    async fn list_setups(
        &self,
        session: &Session,
        user_id: &str,
        order: SortOrder,
    ) -> Result<Vec<IccSetupRow>>;
    async fn list_confluence_logs(
        &self,
        session: &Session,
        user_id: &str,
    ) -> Result<Vec<ConfluenceLogRow>>;
}
