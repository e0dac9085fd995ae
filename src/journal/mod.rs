pub mod history;
pub mod rules;

pub use history::HistoryEntry;
pub use rules::{check_rules, RuleWarning};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::{JournalBackend, Session, User};
use crate::config::SharedConfig;
use crate::confluence::{ConfluenceChecklist, ConfluenceSummary};
use crate::error::{JournalError, Result};
use crate::models::{ConfluenceLogRow, NewIccSetup, SortOrder, UserSettings};
use crate::scoring::{IccAssessment, IccForm};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved {
        assessment: IccAssessment,
        description: String,
    },
    /// Nothing was written; resubmit with `confirm_override` to save anyway.
    NeedsConfirmation {
        assessment: IccAssessment,
        warnings: Vec<RuleWarning>,
    },
}

/// The journal's user-facing flows on top of a backend.
#[derive(Clone)]
pub struct Journal {
    backend: Arc<dyn JournalBackend>,
    cfg: SharedConfig,
}

impl Journal {
    pub fn new(cfg: SharedConfig, backend: Arc<dyn JournalBackend>) -> Self {
        Self { backend, cfg }
    }

    // --- Auth ---

    pub async fn request_login(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(JournalError::InvalidInput(format!("not an email address: '{}'", email)));
        }
        self.backend
            .send_magic_link(email, &self.cfg.callback_url())
            .await
    }

    /// Turns the magic-link callback fragment into a live session.
    pub async fn complete_login(&self, fragment: &str) -> Result<(Session, User)> {
        let session = Session::from_fragment(fragment)?;
        let user = self.authenticate(Some(&session)).await?;
        info!("Logged in {}", user.email.as_deref().unwrap_or(&user.id));
        Ok((session, user))
    }

    /// Exchanges the refresh token for a new session once the access token
    /// has expired.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(Session, User)> {
        let refresh_token = refresh_token.trim();
        if refresh_token.is_empty() {
            return Err(JournalError::InvalidInput("refresh_token is empty".to_string()));
        }
        let session = self.backend.refresh_session(refresh_token).await?;
        let user = self.authenticate(Some(&session)).await?;
        debug!("Refreshed session for {}", user.id);
        Ok((session, user))
    }

    pub async fn logout(&self, session: Option<&Session>) -> Result<()> {
        let session = session.ok_or(JournalError::Unauthenticated)?;
        self.backend.sign_out(session).await
    }

    /// Resolves the session's user. Expired or malformed tokens are rejected
    /// before any network call.
    pub async fn authenticate(&self, session: Option<&Session>) -> Result<User> {
        let session = session.ok_or(JournalError::Unauthenticated)?;
        session.claims(self.cfg.supabase_jwt_secret.as_deref())?;
        self.backend.current_user(session).await
    }

    async fn require<'a>(&self, session: Option<&'a Session>) -> Result<(&'a Session, User)> {
        let user = self.authenticate(session).await?;
        let session = session.ok_or(JournalError::Unauthenticated)?;
        Ok((session, user))
    }

    /// Like `require`, but a missing session is not an error.
    async fn resolve<'a>(&self, session: Option<&'a Session>) -> Result<Option<(&'a Session, User)>> {
        match session {
            Some(_) => self.require(session).await.map(Some),
            None => Ok(None),
        }
    }

    // --- Settings ---

    /// Settings for the form. Never fails: logged-out users and read errors
    /// get the defaults, and a missing row is created with them.
    pub async fn load_settings(&self, session: Option<&Session>) -> UserSettings {
        match self.resolve(session).await {
            Ok(Some((s, user))) => self.settings_for(s, &user).await,
            Ok(None) | Err(JournalError::Unauthenticated) => UserSettings::default(),
            Err(e) => {
                warn!("Settings: could not resolve user: {}", e);
                UserSettings::default()
            }
        }
    }

    /// Stored settings of an already resolved user.
    async fn settings_for(&self, s: &Session, user: &User) -> UserSettings {
        match self.backend.get_settings(s, &user.id).await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                let defaults = UserSettings::default();
                match self.backend.upsert_settings(s, &user.id, &defaults).await {
                    Ok(()) => debug!("Created default settings for {}", user.id),
                    Err(e) => warn!("Could not create default settings for {}: {}", user.id, e),
                }
                defaults
            }
            Err(e) => {
                warn!("Settings read failed for {}, using defaults: {}", user.id, e);
                UserSettings::default()
            }
        }
    }

    pub async fn save_settings(
        &self,
        session: Option<&Session>,
        settings: UserSettings,
    ) -> Result<UserSettings> {
        settings.validate().map_err(JournalError::InvalidInput)?;
        let (session, user) = self.require(session).await?;
        self.backend
            .upsert_settings(session, &user.id, &settings)
            .await?;
        Ok(settings)
    }

    // --- ICC ---

    /// Scores the form with the user's settings, or the defaults when
    /// logged out.
    pub async fn assess(
        &self,
        session: Option<&Session>,
        form: &IccForm,
    ) -> Result<(IccAssessment, Vec<RuleWarning>)> {
        form.check_timeframes().map_err(JournalError::InvalidInput)?;
        let user = self.resolve(session).await?;
        Ok(self.assess_for(user.as_ref(), form).await)
    }

    async fn assess_for(
        &self,
        user: Option<&(&Session, User)>,
        form: &IccForm,
    ) -> (IccAssessment, Vec<RuleWarning>) {
        let settings = match user {
            Some((s, u)) => self.settings_for(s, u).await,
            None => UserSettings::default(),
        };
        let assessment = IccAssessment::evaluate(form, &settings);
        let warnings = check_rules(&assessment, &settings);
        (assessment, warnings)
    }

    /// Scores the form and appends it to the user's setups. Rule warnings
    /// hold the save back unless `confirm_override` is set. The user is
    /// resolved once, so scoring and the row share the same settings.
    pub async fn save_setup(
        &self,
        session: Option<&Session>,
        form: &IccForm,
        confirm_override: bool,
    ) -> Result<SaveOutcome> {
        form.check_timeframes().map_err(JournalError::InvalidInput)?;
        let user = self.resolve(session).await?;
        let (assessment, warnings) = self.assess_for(user.as_ref(), form).await;
        if !warnings.is_empty() && !confirm_override {
            debug!(
                "Setup {} held for confirmation: {} warning(s)",
                assessment.pair,
                warnings.len()
            );
            return Ok(SaveOutcome::NeedsConfirmation {
                assessment,
                warnings,
            });
        }

        let (session, user) = user.ok_or(JournalError::Unauthenticated)?;

        let description = assessment.description(form).to_string();
        let record = NewIccSetup {
            user_id: user.id,
            pair: assessment.pair.clone(),
            direction: form.direction,
            htf: form.htf,
            indication_type: description.clone(),
            indication_price: form.indication_price.unwrap_or(0.0),
            correction_done: form.flags.correction,
            liquidity_grab: false,
            ltf: form.ltf,
            ltf_structure_ok: form.flags.continuation,
            sl_price: form.sl_price,
            entry_price: form.indication_price,
            risk_percent: assessment.risk_percent,
        };
        self.backend.insert_icc_setup(session, &record).await?;

        Ok(SaveOutcome::Saved {
            assessment,
            description,
        })
    }

    pub async fn history(
        &self,
        session: Option<&Session>,
        order: SortOrder,
    ) -> Result<Vec<HistoryEntry>> {
        let (session, user) = self.require(session).await?;
        let rows = self.backend.list_setups(session, &user.id, order).await?;
        let tz = self.cfg.display_tz;
        Ok(rows
            .into_iter()
            .map(|r| HistoryEntry::from_row(r, tz))
            .collect())
    }

    // --- Confluence ---

    pub async fn save_confluence(
        &self,
        session: Option<&Session>,
        checklist: &ConfluenceChecklist,
    ) -> Result<ConfluenceSummary> {
        let (session, user) = self.require(session).await?;
        let summary = checklist.summary();
        self.backend
            .insert_confluence_log(session, &summary.to_log(&user.id))
            .await?;
        Ok(summary)
    }

    pub async fn confluence_history(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<ConfluenceLogRow>> {
        let (session, user) = self.require(session).await?;
        self.backend.list_confluence_logs(session, &user.id).await
    }
}
