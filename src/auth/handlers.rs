use tracing::{info, instrument};

use crate::auth::dto::{Credentials, Registration};
use crate::auth::services::{is_valid_email, SessionStore};
use crate::page::PageState;
use crate::routes::Route;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct LoginPage {
    auth: SessionStore,
    pub form: Credentials,
    pub state: PageState,
}

impl LoginPage {
    pub fn new(auth: SessionStore) -> Self {
        Self {
            auth,
            form: Credentials::default(),
            state: PageState::default(),
        }
    }

    /// An existing session skips the form.
    pub async fn mount(&mut self) -> Route {
        if self.auth.is_authenticated().await {
            self.auth.client().navigator().navigate(Route::Dashboard);
            return Route::Dashboard;
        }
        Route::Login
    }

    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> bool {
        self.state.start();
        let outcome = self.auth.login(&self.form).await;
        if outcome.success {
            self.state.succeed();
            self.form.password.clear();
            self.auth.client().navigator().navigate(Route::Dashboard);
            true
        } else {
            self.state
                .fail(outcome.error.unwrap_or_else(|| "Login failed".to_string()));
            false
        }
    }
}

pub struct RegisterPage {
    auth: SessionStore,
    pub form: Registration,
    pub state: PageState,
    /// Backend confirmation shown once registration went through.
    pub success_message: Option<String>,
}

impl RegisterPage {
    pub fn new(auth: SessionStore) -> Self {
        Self {
            auth,
            form: Registration::default(),
            state: PageState::default(),
            success_message: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_registration(&self.form)
    }

    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> bool {
        self.state.start();
        self.success_message = None;

        if let Err(message) = self.validate() {
            self.state.fail(message);
            return false;
        }

        let outcome = self.auth.register(&self.form).await;
        if outcome.success {
            info!("account registered; awaiting approval");
            self.success_message = outcome.message;
            self.form = Registration::default();
            self.state.succeed();
            true
        } else {
            self.state
                .fail(outcome.error.unwrap_or_else(|| "Registration failed".to_string()));
            false
        }
    }
}

pub fn validate_registration(form: &Registration) -> Result<(), String> {
    if form.password != form.confirm_password {
        return Err("Passwords do not match".into());
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    }
    if form.username.trim().is_empty() {
        return Err("Username is required".into());
    }
    if !is_valid_email(form.email.trim()) {
        return Err("Enter a valid email address".into());
    }
    Ok(())
}
