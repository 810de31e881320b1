use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::fees::dto::{annual_fee_for, FeeStructure, TERMS_PER_YEAR};
use crate::format::format_currency;
use crate::page::{self, Confirm, PageState};
use crate::payments::dto::{Payment, PaymentForm, PaymentReceipt, PaymentsOverview};
use crate::students::Student;

pub struct PaymentsPage {
    client: ApiClient,
    pub payments: Vec<Payment>,
    pub students: Vec<Student>,
    pub fee_structures: Vec<FeeStructure>,
    pub overview: Option<PaymentsOverview>,
    pub success_message: Option<String>,
    pub state: PageState,
}

impl PaymentsPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            payments: Vec::new(),
            students: Vec::new(),
            fee_structures: Vec::new(),
            overview: None,
            success_message: None,
            state: PageState::default(),
        }
    }

    pub async fn mount(&mut self) {
        if self.client.session().is_authenticated().await {
            self.refresh().await;
        }
    }

    #[instrument(skip_all)]
    pub async fn refresh(&mut self) {
        self.state.start();
        let client = &self.client;
        let fetched = tokio::try_join!(
            Payment::list(client),
            Student::list(client),
            FeeStructure::list(client),
        );
        match fetched {
            Ok((payments, students, fees)) => {
                self.payments = payments;
                self.students = students;
                self.fee_structures = fees;
                self.state.succeed();
            }
            Err(e) => self.state.fail_with(&e, "fetch data"),
        }
    }

    #[instrument(skip_all)]
    pub async fn load_overview(&mut self) {
        self.state.start();
        match Payment::overview(&self.client).await {
            Ok(overview) => {
                self.overview = Some(overview);
                self.state.succeed();
            }
            Err(e) => self.state.fail_with(&e, "fetch payment summary"),
        }
    }

    #[instrument(skip_all, fields(student = form.student, term = %form.payment_term))]
    pub async fn create(&mut self, form: &PaymentForm) -> Option<Payment> {
        self.success_message = None;
        if let Err(message) = form.validate() {
            self.state.fail(message);
            return None;
        }
        self.state.start();
        match Payment::create(&self.client, form).await {
            Ok(created) => {
                info!(id = created.payment.id, amount = created.payment.amount_paid, "payment recorded");
                self.success_message = Some(receipt_message(created.payment_summary.as_ref()));
                page::upsert(&mut self.payments, created.payment.clone());
                self.state.succeed();
                Some(created.payment)
            }
            Err(e) => {
                self.state.fail_with(&e, "add payment");
                None
            }
        }
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn update(&mut self, id: i64, form: &PaymentForm) -> Option<Payment> {
        self.success_message = None;
        if let Err(message) = form.validate() {
            self.state.fail(message);
            return None;
        }
        self.state.start();
        match Payment::update(&self.client, id, form).await {
            Ok(updated) => {
                page::upsert(&mut self.payments, updated.clone());
                self.state.succeed();
                Some(updated)
            }
            Err(e) => {
                self.state.fail_with(&e, "update payment");
                None
            }
        }
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm("Are you sure you want to delete this payment?") {
            return false;
        }
        self.state.start();
        match Payment::delete(&self.client, id).await {
            Ok(()) => {
                page::remove(&mut self.payments, id);
                self.state.succeed();
                true
            }
            Err(e) => {
                self.state.fail_with(&e, "delete payment");
                false
            }
        }
    }

    fn student(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn student_name(&self, id: i64) -> String {
        self.student(id)
            .map(Student::name)
            .unwrap_or_else(|| "Unknown Student".to_string())
    }

    /// Annual fee from the loaded fee structures; zero when unknown.
    pub fn annual_fee(&self, student_id: i64) -> f64 {
        self.student(student_id)
            .map(|s| annual_fee_for(&self.fee_structures, &s.grade, &s.board))
            .unwrap_or(0.0)
    }

    pub fn term_fee(&self, student_id: i64) -> f64 {
        self.annual_fee(student_id) / TERMS_PER_YEAR
    }
}

pub fn receipt_message(receipt: Option<&PaymentReceipt>) -> String {
    match receipt {
        Some(r) => format!(
            "Payment recorded successfully! {} has {} remaining.",
            r.student_name,
            format_currency(r.balance_due)
        ),
        None => "Payment recorded successfully!".to_string(),
    }
}
