//! Admin session store
//!
//! Maps opaque tokens to the identity they were issued for and the moment
//! they stop being valid. The store owns its expiry policy: expired entries
//! are evicted when looked up, and a full sweep runs at most once per sweep
//! interval as a side effect of issuing tokens, or on demand.
//!
//! # Example
//!
//! ```rust
//! use pantry_core::session::{SessionPolicy, SessionStore};
//!
//! let store = SessionStore::new(SessionPolicy::default());
//! let session = store.issue("admin");
//!
//! assert_eq!(store.validate(&session.token).unwrap().identity, "admin");
//! assert!(store.revoke(&session.token));
//! assert!(store.validate(&session.token).is_err());
//! ```

use crate::config::SessionConfig;
use crate::error::{Error, ErrorCode};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Upper bound for configured durations (100 years).
const MAX_DURATION_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Session lookup failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Token was never issued, was revoked, or has been swept
    #[error("Unknown session token")]
    UnknownToken,

    /// Token exists but its lifetime is over
    #[error("Session expired at {0}")]
    Expired(DateTime<Utc>),
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        let code = match err {
            SessionError::UnknownToken => ErrorCode::UnknownToken,
            SessionError::Expired(_) => ErrorCode::SessionExpired,
        };
        Error::new(code, err.to_string())
            .with_suggestion("Authenticate again to obtain a new token")
    }
}

/// An issued session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,
    /// Who the token was issued to
    pub identity: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// First instant at which the token is no longer valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Token lifetime and sweep cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            ttl: seconds(config.ttl_secs),
            sweep_interval: seconds(config.sweep_interval_secs),
        }
    }
}

fn seconds(secs: u64) -> Duration {
    let secs = i64::try_from(secs).unwrap_or(MAX_DURATION_SECS).min(MAX_DURATION_SECS);
    Duration::seconds(secs)
}

/// Thread-safe token → session map
#[derive(Debug)]
pub struct SessionStore {
    policy: SessionPolicy,
    sessions: RwLock<HashMap<String, Session>>,
    last_sweep: Mutex<DateTime<Utc>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            sessions: RwLock::new(HashMap::new()),
            last_sweep: Mutex::new(Utc::now()),
        }
    }

    /// Policy in effect
    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Issue a token for `identity`
    pub fn issue(&self, identity: impl Into<String>) -> Session {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, identity: impl Into<String>, now: DateTime<Utc>) -> Session {
        self.sweep_if_due(now);

        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            identity: identity.into(),
            issued_at: now,
            expires_at: now + self.policy.ttl,
        };

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.token.clone(), session.clone());

        info!(identity = %session.identity, expires_at = %session.expires_at, "Session issued");
        session
    }

    /// Resolve a token to its session
    pub fn validate(&self, token: &str) -> Result<Session, SessionError> {
        self.validate_at(token, Utc::now())
    }

    /// Resolve a token as if the current time were `now`
    ///
    /// An expired session is evicted and reported as [`SessionError::Expired`].
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(SessionError::UnknownToken)?;

        if session.is_expired_at(now) {
            self.sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(token);
            debug!(identity = %session.identity, "Evicted expired session");
            return Err(SessionError::Expired(session.expires_at));
        }

        Ok(session)
    }

    /// Revoke a token, returning whether it existed
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }

    /// Remove every expired session, returning how many were removed
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    /// Remove every session expired at `now`
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let removed = {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            let before = sessions.len();
            sessions.retain(|_, session| !session.is_expired_at(now));
            before - sessions.len()
        };

        *self.last_sweep.lock().unwrap_or_else(PoisonError::into_inner) = now;

        if removed > 0 {
            debug!(removed, "Swept expired sessions");
        }
        removed
    }

    fn sweep_if_due(&self, now: DateTime<Utc>) {
        let due = {
            let last = self.last_sweep.lock().unwrap_or_else(PoisonError::into_inner);
            now - *last >= self.policy.sweep_interval
        };
        if due {
            self.sweep_expired_at(now);
        }
    }

    /// Number of stored sessions, expired ones included until swept
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no sessions are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionPolicy::default())
    }
}
