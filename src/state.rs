use std::sync::Arc;

use crate::auth::{LoginPage, RegisterPage, SessionHandle, SessionStore};
use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::dashboard::DashboardPage;
use crate::fees::FeesPage;
use crate::payments::PaymentsPage;
use crate::routes::{Navigator, Route};
use crate::storage::{FileStorage, SessionStorage};
use crate::students::{StudentProfile, StudentsPage};

/// Everything a page needs, passed explicitly instead of living in globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub navigator: Navigator,
    pub client: ApiClient,
    pub auth: SessionStore,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let storage = Arc::new(FileStorage::new(config.session_file.clone())) as Arc<dyn SessionStorage>;
        Self::from_parts(Arc::new(config), storage).await
    }

    pub async fn from_parts(
        config: Arc<AppConfig>,
        storage: Arc<dyn SessionStorage>,
    ) -> anyhow::Result<Self> {
        let session = SessionHandle::load(storage).await?;
        let start = if session.is_authenticated().await {
            Route::Dashboard
        } else {
            Route::Login
        };
        let navigator = Navigator::new(start);
        let client = ApiClient::new(&config.api, session, navigator.clone())?;
        let auth = SessionStore::new(client.clone());
        Ok(Self {
            config,
            navigator,
            client,
            auth,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        self.client.session()
    }

    /// Guarded navigation; returns where the visit landed.
    pub async fn visit(&self, route: Route) -> Route {
        let authenticated = self.session().is_authenticated().await;
        self.navigator.visit(route, authenticated)
    }

    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.auth.clone())
    }

    pub fn register_page(&self) -> RegisterPage {
        RegisterPage::new(self.auth.clone())
    }

    pub fn dashboard(&self) -> DashboardPage {
        DashboardPage::new(self.client.clone())
    }

    pub fn students(&self) -> StudentsPage {
        StudentsPage::new(self.client.clone())
    }

    pub fn student_profile(&self) -> StudentProfile {
        StudentProfile::new(self.client.clone())
    }

    pub fn payments(&self) -> PaymentsPage {
        PaymentsPage::new(self.client.clone())
    }

    pub fn fees(&self) -> FeesPage {
        FeesPage::new(self.client.clone())
    }
}
