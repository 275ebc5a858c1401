use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::api::ApiClient;

use super::session::{Session, SessionUser, SessionUserPatch};

/// High-level authentication operations over a shared `Session`.
///
/// Constructed once at startup and passed to whoever needs it; tests inject
/// a `Session` backed by an in-memory store.
pub struct SessionManager {
    api: ApiClient,
    session: Arc<Session>,
}

impl SessionManager {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    /// Create an account and establish a session from the response.
    /// Transport and validation errors propagate unchanged to the caller.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let auth = self.api.register(username, email, password).await?;
        self.session.establish(
            &auth.token,
            &SessionUser {
                user_id: Some(auth.user_id),
                username: Some(username.to_string()),
                user_email: auth.email,
                role: auth.role,
                profile_picture_url: None,
            },
        )?;
        debug!(username, "Registered and session established");
        Ok(())
    }

    /// Log in with credentials. Rejected credentials surface as
    /// `ApiError::Unauthorized` so callers can present a targeted message.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let auth = self.api.login(username, password).await?;
        self.session.establish(
            &auth.token,
            &SessionUser {
                user_id: Some(auth.user_id),
                username: Some(username.to_string()),
                user_email: auth.email,
                role: auth.role,
                profile_picture_url: None,
            },
        )?;
        debug!(username, "Logged in");
        Ok(())
    }

    /// Store a pre-issued token from the identity-provider redirect flow.
    /// No user snapshot is written; it is backfilled lazily.
    pub fn login_with_token(&self, token: &str) -> Result<()> {
        self.session.apply_token(token)
    }

    /// Drop all session state. Afterwards the client is indistinguishable
    /// from one that never logged in.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }

    /// Merge a partial update into the stored user snapshot, e.g. after an
    /// avatar upload.
    pub fn update_session(&self, patch: &SessionUserPatch) -> Result<()> {
        self.session.merge_user(patch)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.api.forgot_password(email).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        self.api.reset_password(token, new_password).await
    }

    /// Backfill the avatar URL when the snapshot lacks one (the auth
    /// response never carries it).
    pub async fn sync_profile_picture(&self) -> Result<()> {
        let user = match self.session.user() {
            Some(user) => user,
            None => return Ok(()),
        };
        if user.profile_picture_url.is_some() {
            return Ok(());
        }
        if let Some(user_id) = user.user_id {
            let details = self.api.user_details(user_id).await?;
            if let Some(url) = details.profile_picture_url {
                self.session.merge_user(&SessionUserPatch {
                    profile_picture_url: Some(url),
                    ..Default::default()
                })?;
            }
        }
        Ok(())
    }

    // ===== Derived reads =====

    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    pub fn expires_on(&self) -> Option<i64> {
        self.session.expires_on()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session.user_id()
    }

    pub fn username(&self) -> Option<String> {
        self.session.username()
    }

    pub fn email(&self) -> Option<String> {
        self.session.email()
    }

    pub fn role(&self) -> Option<String> {
        self.session.role()
    }

    pub fn profile_picture_url(&self) -> Option<String> {
        self.session.profile_picture_url()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
