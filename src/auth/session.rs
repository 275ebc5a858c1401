use std::sync::Arc;

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::StorageBackend;

/// Storage key for the bearer token
pub const KEY_TOKEN: &str = "token";

/// Storage key for the client-estimated expiry (epoch milliseconds)
pub const KEY_EXPIRES_ON: &str = "expiresOn";

/// Storage key for the serialized user snapshot
pub const KEY_SESSION: &str = "session";

/// Fallback session lifetime when the token carries no usable expiry.
/// Matches the server's access-token lifetime.
const SESSION_TTL_MINUTES: i64 = 15;

/// Denormalized snapshot of the authenticated user, persisted alongside the
/// token and refreshed lazily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionUser {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub user_email: Option<String>,
    pub role: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Partial update for the stored user snapshot. Absent fields are left
/// untouched by a merge.
#[derive(Debug, Clone, Default)]
pub struct SessionUserPatch {
    pub username: Option<String>,
    pub user_email: Option<String>,
    pub role: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Client-held session state over a persistent key-value store.
///
/// The token is the single source of truth for "logged in": every derived
/// identity read collapses to `None` while no token is stored, even if a
/// stale user snapshot remains from an earlier session.
pub struct Session {
    store: Arc<dyn StorageBackend>,
}

impl Session {
    pub fn new(store: Arc<dyn StorageBackend>) -> Self {
        Self { store }
    }

    /// The bearer token, if one is stored. An empty string counts as absent.
    pub fn token(&self) -> Option<String> {
        self.store.get(KEY_TOKEN).filter(|t| !t.is_empty())
    }

    /// Client-estimated expiry as epoch milliseconds. Absent whenever no
    /// token is stored, like every other derived read.
    pub fn expires_on(&self) -> Option<i64> {
        self.token()?;
        self.store
            .get(KEY_EXPIRES_ON)
            .and_then(|v| v.parse().ok())
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_on() {
            Some(expires_on) => Utc::now().timestamp_millis() > expires_on,
            None => false,
        }
    }

    /// Persist a freshly issued token together with the user snapshot from a
    /// login or registration response.
    pub fn establish(&self, token: &str, user: &SessionUser) -> Result<()> {
        let blob = serde_json::to_string(user).context("Failed to serialize session user")?;
        self.store.set(KEY_SESSION, &blob)?;
        self.apply_token(token)
    }

    /// Persist a replacement token, leaving the user snapshot in place.
    /// Used by the silent-refresh flow and the OAuth redirect flow.
    pub fn apply_token(&self, token: &str) -> Result<()> {
        self.store.set(KEY_TOKEN, token)?;
        self.store
            .set(KEY_EXPIRES_ON, &Self::token_expiry_millis(token).to_string())?;
        Ok(())
    }

    /// Merge a partial patch into the stored user snapshot. A missing or
    /// corrupt snapshot is treated as empty.
    pub fn merge_user(&self, patch: &SessionUserPatch) -> Result<()> {
        let mut user = self.stored_user();
        if let Some(ref username) = patch.username {
            user.username = Some(username.clone());
        }
        if let Some(ref email) = patch.user_email {
            user.user_email = Some(email.clone());
        }
        if let Some(ref role) = patch.role {
            user.role = Some(role.clone());
        }
        if let Some(ref url) = patch.profile_picture_url {
            user.profile_picture_url = Some(url.clone());
        }
        let blob = serde_json::to_string(&user).context("Failed to serialize session user")?;
        self.store.set(KEY_SESSION, &blob)
    }

    /// Remove every trace of the session. Afterwards the store is
    /// indistinguishable from one that never held a login.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(KEY_TOKEN)?;
        self.store.remove(KEY_EXPIRES_ON)?;
        self.store.remove(KEY_SESSION)?;
        Ok(())
    }

    /// The user snapshot, gated on an authenticated session.
    pub fn user(&self) -> Option<SessionUser> {
        self.token().map(|_| self.stored_user())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().and_then(|u| u.user_id)
    }

    pub fn username(&self) -> Option<String> {
        self.user().and_then(|u| u.username)
    }

    pub fn email(&self) -> Option<String> {
        self.user().and_then(|u| u.user_email)
    }

    pub fn role(&self) -> Option<String> {
        self.user().and_then(|u| u.role)
    }

    pub fn profile_picture_url(&self) -> Option<String> {
        self.user().and_then(|u| u.profile_picture_url)
    }

    fn stored_user(&self) -> SessionUser {
        match self.store.get(KEY_SESSION) {
            Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                debug!(error = %e, "Corrupt session snapshot, treating as empty");
                SessionUser::default()
            }),
            None => SessionUser::default(),
        }
    }

    /// Expiry for a freshly stored token: the token's own `exp` claim when it
    /// is a well-formed JWT, otherwise a fixed TTL from now.
    fn token_expiry_millis(token: &str) -> i64 {
        Self::jwt_exp_millis(token).unwrap_or_else(|| {
            (Utc::now() + Duration::minutes(SESSION_TTL_MINUTES)).timestamp_millis()
        })
    }

    /// Extract the `exp` claim (seconds) from a JWT payload, as milliseconds.
    fn jwt_exp_millis(token: &str) -> Option<i64> {
        let mut parts = token.split('.');
        let _header = parts.next()?;
        let payload = parts.next()?;
        let _signature = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        #[derive(Deserialize)]
        struct Claims {
            exp: Option<i64>,
        }

        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;
        claims.exp.map(|exp| exp * 1000)
    }
}
