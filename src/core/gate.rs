//! Cosmetic password gate for the presentation pages.
//!
//! This only hides pages from casual visitors. The password ships with the
//! site and the session flag lives in tab storage, so it is not access control.

use crate::config::{GateConfig, GateMessages};
use crate::domain::model::Redirect;
use crate::domain::ports::SessionStore;
use crate::utils::error::{Result, SiteError};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session flag as stored in tab storage. Times are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSession {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub expires: i64,
}

impl GateSession {
    pub fn issue(now: DateTime<Utc>, lifetime: ChronoDuration) -> Result<Self> {
        let expires = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| SiteError::InvalidConfigValueError {
                field: "gate.session_hours".to_string(),
                value: lifetime.num_hours().to_string(),
                reason: "Session expiry is out of the representable time range".to_string(),
            })?;

        Ok(Self {
            authenticated: true,
            timestamp: now.timestamp_millis(),
            expires: expires.timestamp_millis(),
        })
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.expires)
    }

    /// A zero expiry never validates.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires != 0 && now.timestamp_millis() < self.expires
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Missing,
    Valid(GateSession),
    /// Expired or unusable sessions are removed from the store when read.
    Expired,
    /// Data that is not JSON at all is left in place.
    Malformed,
}

pub fn read_session<S: SessionStore + ?Sized>(store: &S, key: &str, now: DateTime<Utc>) -> SessionStatus {
    let Some(raw) = store.get_item(key) else {
        return SessionStatus::Missing;
    };

    let value = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring malformed gate session under '{}': {}", key, e);
            return SessionStatus::Malformed;
        }
    };

    // 合法 JSON 但沒有可用的 expires 也視為過期
    match serde_json::from_value::<GateSession>(value) {
        Ok(session) if session.is_valid(now) => SessionStatus::Valid(session),
        _ => {
            tracing::debug!("Gate session under '{}' expired or unusable, removing", key);
            store.remove_item(key);
            SessionStatus::Expired
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Nothing typed. No verification delay.
    Empty { message: String },
    Denied { message: String },
    Granted { message: String, redirect: Redirect },
}

/// Login-page side of the gate.
pub struct PasswordGate<S: SessionStore> {
    store: S,
    password: String,
    storage_key: String,
    redirect_to: String,
    login_page: String,
    session_lifetime: ChronoDuration,
    verify_delay: Duration,
    redirect_delay: Duration,
    messages: GateMessages,
}

impl<S: SessionStore> PasswordGate<S> {
    pub fn new(config: &GateConfig, store: S) -> Result<Self> {
        let password = config
            .password
            .clone()
            .ok_or_else(|| SiteError::MissingConfigError {
                field: "gate.password".to_string(),
            })?;
        let session_lifetime = ChronoDuration::try_hours(config.session_hours)
            .filter(|lifetime| *lifetime > ChronoDuration::zero())
            .ok_or_else(|| SiteError::InvalidConfigValueError {
                field: "gate.session_hours".to_string(),
                value: config.session_hours.to_string(),
                reason: "Session lifetime must be a positive number of hours".to_string(),
            })?;

        Ok(Self {
            store,
            password,
            storage_key: config.storage_key.clone(),
            redirect_to: config.redirect_to.clone(),
            login_page: config.login_page.clone(),
            session_lifetime,
            verify_delay: Duration::from_millis(config.verify_delay_ms),
            redirect_delay: Duration::from_millis(config.redirect_delay_ms),
            messages: config.messages.clone(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        matches!(
            read_session(&self.store, &self.storage_key, now),
            SessionStatus::Valid(_)
        )
    }

    /// On page load: a live session goes straight to the protected page.
    pub fn check(&self, now: DateTime<Utc>) -> Option<Redirect> {
        self.is_authenticated(now).then(|| Redirect {
            to: self.redirect_to.clone(),
            after: Duration::ZERO,
        })
    }

    pub fn validate_password(&self, input: &str) -> bool {
        input == self.password
    }

    /// Handles a form submit: trims the input, waits the verification delay,
    /// then either creates a session or reports the failure.
    pub async fn submit(&self, input: &str, now: DateTime<Utc>) -> Result<GateOutcome> {
        let password = input.trim();
        if password.is_empty() {
            return Ok(GateOutcome::Empty {
                message: self.messages.empty.clone(),
            });
        }

        if !self.verify_delay.is_zero() {
            tokio::time::sleep(self.verify_delay).await;
        }

        if !self.validate_password(password) {
            tracing::info!("Gate password rejected");
            return Ok(GateOutcome::Denied {
                message: self.messages.invalid.clone(),
            });
        }

        self.create_session(now)?;
        tracing::info!("Gate session created, redirecting to {}", self.redirect_to);
        Ok(GateOutcome::Granted {
            message: self.messages.success.clone(),
            redirect: Redirect {
                to: self.redirect_to.clone(),
                after: self.redirect_delay,
            },
        })
    }

    fn create_session(&self, now: DateTime<Utc>) -> Result<()> {
        let session = GateSession::issue(now, self.session_lifetime)?;
        let json = serde_json::to_string(&session)?;
        self.store.set_item(&self.storage_key, &json);
        Ok(())
    }

    pub fn logout(&self) -> Redirect {
        self.store.remove_item(&self.storage_key);
        Redirect {
            to: self.login_page.clone(),
            after: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

/// Protected-page side of the gate.
pub struct AccessGuard<S: SessionStore> {
    store: S,
    storage_key: String,
    login_page: String,
}

impl<S: SessionStore> AccessGuard<S> {
    pub fn new(config: &GateConfig, store: S) -> Self {
        Self {
            store,
            storage_key: config.storage_key.clone(),
            login_page: config.login_page.clone(),
        }
    }

    pub fn check(&self, now: DateTime<Utc>) -> GuardDecision {
        match read_session(&self.store, &self.storage_key, now) {
            SessionStatus::Valid(_) => GuardDecision::Allow,
            status => {
                tracing::debug!("Access guard redirecting to login ({:?})", status);
                GuardDecision::Redirect(self.login_redirect())
            }
        }
    }

    pub fn logout(&self) -> Redirect {
        self.store.remove_item(&self.storage_key);
        self.login_redirect()
    }

    fn login_redirect(&self) -> Redirect {
        Redirect {
            to: self.login_page.clone(),
            after: Duration::ZERO,
        }
    }
}
