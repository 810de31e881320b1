use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::dto::User;
use crate::storage::SessionStorage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Client-held token plus the profile snapshot returned at login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
}

/// Shared session state with its persistence boundary.
///
/// Loaded once at startup; every mutation writes through to storage.
#[derive(Clone)]
pub struct SessionHandle {
    current: Arc<RwLock<Option<Session>>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHandle {
    pub async fn load(storage: Arc<dyn SessionStorage>) -> anyhow::Result<Self> {
        let token = storage.get_item(TOKEN_KEY).await?;
        let user = match storage.get_item(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "stored user record unreadable; ignoring");
                    None
                }
            },
            None => None,
        };
        let session = token
            .filter(|t| !t.is_empty())
            .map(|token| Session { token, user });
        debug!(authenticated = session.is_some(), "session loaded");
        Ok(Self {
            current: Arc::new(RwLock::new(session)),
            storage,
        })
    }

    pub async fn snapshot(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn user(&self) -> Option<User> {
        self.current
            .read()
            .await
            .as_ref()
            .and_then(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn set(&self, session: Session) -> anyhow::Result<()> {
        self.storage.set_item(TOKEN_KEY, &session.token).await?;
        self.persist_user(session.user.as_ref()).await?;
        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Replaces the profile snapshot of the active session.
    pub async fn set_user(&self, user: User) -> anyhow::Result<()> {
        self.persist_user(Some(&user)).await?;
        if let Some(session) = self.current.write().await.as_mut() {
            session.user = Some(user);
        }
        Ok(())
    }

    /// In-memory state is cleared even when storage fails.
    pub async fn clear(&self) -> anyhow::Result<()> {
        *self.current.write().await = None;
        let token = self.storage.remove_item(TOKEN_KEY).await;
        let user = self.storage.remove_item(USER_KEY).await;
        token.and(user)
    }

    async fn persist_user(&self, user: Option<&User>) -> anyhow::Result<()> {
        match user {
            Some(user) => {
                let raw = serde_json::to_string(user)?;
                self.storage.set_item(USER_KEY, &raw).await
            }
            None => self.storage.remove_item(USER_KEY).await,
        }
    }
}
