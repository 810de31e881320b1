use tracing::{debug, info, instrument, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::page::{self, Confirm, PageState};
use crate::payments::Payment;
use crate::students::dto::{PaymentSummary, Student, StudentForm};
use crate::students::search::filter_students;

pub struct StudentsPage {
    client: ApiClient,
    pub students: Vec<Student>,
    /// Current search hits; `None` when no search is active.
    pub results: Option<Vec<Student>>,
    pub query: String,
    pub state: PageState,
}

impl StudentsPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            students: Vec::new(),
            results: None,
            query: String::new(),
            state: PageState::default(),
        }
    }

    pub async fn mount(&mut self) {
        if self.client.session().is_authenticated().await {
            self.refresh().await;
        }
    }

    /// Rows to display: search hits, or the full list.
    pub fn visible(&self) -> &[Student] {
        self.results.as_deref().unwrap_or(&self.students)
    }

    #[instrument(skip_all)]
    pub async fn refresh(&mut self) {
        self.state.start();
        match Student::list(&self.client).await {
            Ok(list) => {
                debug!(count = list.len(), "students loaded");
                self.students = list;
                self.state.succeed();
            }
            Err(e) => self.state.fail_with(&e, "fetch students"),
        }
    }

    /// Backend search first; the local filter covers a failed call.
    #[instrument(skip(self))]
    pub async fn search(&mut self, query: &str) {
        self.query = query.to_string();
        if query.trim().is_empty() {
            self.results = None;
            self.state.reset();
            return;
        }
        self.state.start();
        match Student::search(&self.client, query.trim()).await {
            Ok(found) => {
                self.results = Some(found);
                self.state.succeed();
            }
            Err(ApiError::Unauthorized) => {
                self.results = None;
                self.state.reset();
            }
            Err(e) => {
                warn!(error = %e, "search endpoint failed, filtering locally");
                let found = filter_students(&self.students, query)
                    .into_iter()
                    .cloned()
                    .collect();
                self.results = Some(found);
                self.state.succeed();
            }
        }
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.results = None;
    }

    #[instrument(skip_all)]
    pub async fn create(&mut self, form: &StudentForm) -> Option<Student> {
        if let Err(message) = form.validate() {
            self.state.fail(message);
            return None;
        }
        self.state.start();
        match Student::create(&self.client, form).await {
            Ok(created) => {
                info!(id = created.id, "student created");
                page::upsert(&mut self.students, created.clone());
                self.clear_search();
                self.state.succeed();
                Some(created)
            }
            Err(e) => {
                self.state.fail_with(&e, "add student");
                None
            }
        }
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn update(&mut self, id: i64, form: &StudentForm) -> Option<Student> {
        if let Err(message) = form.validate() {
            self.state.fail(message);
            return None;
        }
        self.state.start();
        match Student::update(&self.client, id, form).await {
            Ok(updated) => {
                page::upsert(&mut self.students, updated.clone());
                if let Some(results) = self.results.as_mut() {
                    if results.iter().any(|s| s.id == id) {
                        page::upsert(results, updated.clone());
                    }
                }
                self.state.succeed();
                Some(updated)
            }
            Err(e) => {
                self.state.fail_with(&e, "update student");
                None
            }
        }
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm("Are you sure you want to delete this student?") {
            return false;
        }
        self.state.start();
        match Student::delete(&self.client, id).await {
            Ok(()) => {
                page::remove(&mut self.students, id);
                if let Some(results) = self.results.as_mut() {
                    page::remove(results, id);
                }
                self.state.succeed();
                true
            }
            Err(e) => {
                self.state.fail_with(&e, "delete student");
                false
            }
        }
    }
}

/// Detail panel for one student: record, payment history and totals.
pub struct StudentProfile {
    client: ApiClient,
    pub student: Option<Student>,
    pub payments: Vec<Payment>,
    pub summary: Option<PaymentSummary>,
    pub state: PageState,
}

impl StudentProfile {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            student: None,
            payments: Vec::new(),
            summary: None,
            state: PageState::default(),
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self, id: i64) {
        self.state.start();
        let client = &self.client;
        let fetched = tokio::try_join!(
            Student::get(client, id),
            Student::payments(client, id),
            Student::payment_summary(client, id),
        );
        match fetched {
            Ok((student, payments, summary)) => {
                self.student = Some(student);
                self.payments = payments;
                self.summary = Some(summary);
                self.state.succeed();
            }
            Err(e) => self.state.fail_with(&e, "fetch student details"),
        }
    }
}
