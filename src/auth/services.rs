use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::auth::dto::{AuthOutcome, Credentials, ProfileUpdate, Registration, User};
use crate::auth::repo;
use crate::auth::session::Session;
use crate::client::ApiClient;
use crate::error::{ApiResult, FieldErrors};
use crate::routes::Route;

const LOGIN_FIELDS: &[&str] = &["email", "password", "non_field_errors"];
const REGISTER_FIELDS: &[&str] = &["username", "email", "password", "non_field_errors"];

const LOGIN_RETRY: &str = "Login failed. Please try again.";
const REGISTER_RETRY: &str = "Registration failed. Please try again.";
const PROFILE_RETRY: &str = "Profile update failed. Please try again.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Login, registration, logout and profile updates over the shared session.
///
/// None of the operations return `Err`: transport and decoding failures are
/// logged and folded into an [`AuthOutcome`] with a fixed message.
#[derive(Clone)]
pub struct SessionStore {
    client: ApiClient,
}

impl SessionStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated().await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.client.session().user().await
    }

    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> AuthOutcome {
        let response = match repo::login(&self.client, credentials).await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "login request failed");
                return AuthOutcome::failed(LOGIN_RETRY);
            }
        };

        let Some(session) = session_from_login(&response.body) else {
            let errors = FieldErrors::from_body(&response.body);
            let message = errors.summarize(LOGIN_FIELDS, "Login failed");
            warn!(status = %response.status, %message, "login rejected");
            return AuthOutcome::failed(message);
        };

        let user_id = session.user.as_ref().map(|u| u.id);
        if let Err(e) = self.client.session().set(session).await {
            error!(error = %e, "failed to persist session");
            return AuthOutcome::failed(LOGIN_RETRY);
        }
        info!(?user_id, "logged in");
        AuthOutcome::ok()
    }

    #[instrument(skip_all, fields(email = %registration.email, username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> AuthOutcome {
        let response = match repo::register(&self.client, registration).await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "registration request failed");
                return AuthOutcome::failed(REGISTER_RETRY);
            }
        };

        let message = response
            .body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        match message {
            Some(message) if response.is_success() => {
                info!("registration accepted");
                AuthOutcome::ok_with_message(message)
            }
            _ => {
                let errors = FieldErrors::from_body(&response.body);
                let message = errors.summarize(REGISTER_FIELDS, "Registration failed");
                warn!(status = %response.status, %message, "registration rejected");
                AuthOutcome::failed(message)
            }
        }
    }

    /// Server-side invalidation is best effort; local state is always cleared.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        if self.client.session().is_authenticated().await {
            if let Err(e) = repo::logout(&self.client).await {
                warn!(error = %e, "server logout failed; clearing local session anyway");
            }
        }
        if let Err(e) = self.client.session().clear().await {
            error!(error = %e, "failed to clear stored session");
        }
        self.client.navigator().navigate(Route::Login);
        info!("logged out");
    }

    #[instrument(skip_all)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AuthOutcome {
        let response = match User::update_profile(&self.client, update).await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "profile update request failed");
                return AuthOutcome::failed(PROFILE_RETRY);
            }
        };

        if response.body.get("id").is_none() {
            warn!(status = %response.status, "profile update rejected");
            return AuthOutcome::failed("Profile update failed");
        }
        let user: User = match serde_json::from_value(response.body) {
            Ok(u) => u,
            Err(e) => {
                error!(error = %e, "profile response unreadable");
                return AuthOutcome::failed(PROFILE_RETRY);
            }
        };
        if let Err(e) = self.client.session().set_user(user).await {
            error!(error = %e, "failed to persist profile");
            return AuthOutcome::failed(PROFILE_RETRY);
        }
        AuthOutcome::ok()
    }

    /// Reloads the profile from the backend into the session.
    pub async fn refresh_profile(&self) -> ApiResult<User> {
        let user = User::fetch_profile(&self.client).await?;
        if let Err(e) = self.client.session().set_user(user.clone()).await {
            error!(error = %e, "failed to persist profile");
        }
        Ok(user)
    }
}

/// A login answer counts as a session only when it carries a token.
fn session_from_login(body: &Value) -> Option<Session> {
    let token = body.get("token")?.as_str()?.trim();
    if token.is_empty() {
        return None;
    }
    let user = match body.get("user") {
        Some(raw) if !raw.is_null() => match serde_json::from_value::<User>(raw.clone()) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "login user record unreadable");
                None
            }
        },
        _ => None,
    };
    Some(Session {
        token: token.to_string(),
        user,
    })
}
