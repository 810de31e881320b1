//! Landing page: headline counts and the latest payments.

use std::cmp::Reverse;

use tracing::instrument;

use crate::client::ApiClient;
use crate::page::PageState;
use crate::payments::Payment;
use crate::students::Student;

pub const RECENT_PAYMENTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_payments: usize,
    pub total_revenue: f64,
    /// Whole rupees; zero when there are no students.
    pub average_revenue_per_student: f64,
    /// Newest first; undated payments sort last.
    pub recent_payments: Vec<Payment>,
}

impl DashboardStats {
    pub fn compute(students: &[Student], payments: &[Payment]) -> Self {
        let mut recent = payments.to_vec();
        recent.sort_by_key(|p| Reverse(p.transaction_date));
        recent.truncate(RECENT_PAYMENTS);
        let total_revenue: f64 = payments.iter().map(|p| p.amount_paid).sum();
        let average_revenue_per_student = if students.is_empty() {
            0.0
        } else {
            (total_revenue / students.len() as f64).round()
        };
        Self {
            total_students: students.len(),
            total_payments: payments.len(),
            total_revenue,
            average_revenue_per_student,
            recent_payments: recent,
        }
    }
}

pub struct DashboardPage {
    client: ApiClient,
    pub stats: DashboardStats,
    pub state: PageState,
}

impl DashboardPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            stats: DashboardStats::default(),
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
        match tokio::try_join!(Student::list(client), Payment::list(client)) {
            Ok((students, payments)) => {
                self.stats = DashboardStats::compute(&students, &payments);
                self.state.succeed();
            }
            Err(e) => self.state.fail_with(&e, "fetch dashboard data"),
        }
    }
}
