use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::de;
use crate::page::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    Cash,
    Cheque,
    Online,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 3] = [PaymentMode::Cash, PaymentMode::Cheque, PaymentMode::Online];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Cheque => "Cheque",
            PaymentMode::Online => "Online",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown payment mode {s:?} (expected Cash, Cheque or Online)"))
    }
}

/// One of the four billing periods of an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentTerm {
    #[default]
    #[serde(rename = "Term 1")]
    Term1,
    #[serde(rename = "Term 2")]
    Term2,
    #[serde(rename = "Term 3")]
    Term3,
    #[serde(rename = "Term 4")]
    Term4,
}

impl PaymentTerm {
    pub const ALL: [PaymentTerm; 4] = [
        PaymentTerm::Term1,
        PaymentTerm::Term2,
        PaymentTerm::Term3,
        PaymentTerm::Term4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentTerm::Term1 => "Term 1",
            PaymentTerm::Term2 => "Term 2",
            PaymentTerm::Term3 => "Term 3",
            PaymentTerm::Term4 => "Term 4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentTerm::Term1 => "Term 1 (Months 1-3)",
            PaymentTerm::Term2 => "Term 2 (Months 4-6)",
            PaymentTerm::Term3 => "Term 3 (Months 7-9)",
            PaymentTerm::Term4 => "Term 4 (Months 10-12)",
        }
    }
}

impl fmt::Display for PaymentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentTerm {
    type Err = String;

    /// Accepts `Term 2`, `term2` or just `2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let digit = compact
            .to_ascii_lowercase()
            .trim_start_matches("term")
            .to_string();
        match digit.as_str() {
            "1" => Ok(PaymentTerm::Term1),
            "2" => Ok(PaymentTerm::Term2),
            "3" => Ok(PaymentTerm::Term3),
            "4" => Ok(PaymentTerm::Term4),
            _ => Err(format!("unknown payment term {s:?} (expected Term 1 to Term 4)")),
        }
    }
}

/// CSS class for a backend payment status; unknown statuses get none.
pub fn status_class(status: &str) -> &'static str {
    match status {
        "Paid" => "status-paid",
        "Partial" => "status-partial",
        "Pending" => "status-pending",
        "Overdue" => "status-overdue",
        _ => "",
    }
}

/// Payment record. Status and display strings come from the backend as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub student: i64,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "de::optional_string_or_number")]
    pub student_grade: Option<String>,
    pub payment_mode: String,
    #[serde(default)]
    pub payment_mode_display: Option<String>,
    pub payment_term: String,
    #[serde(default)]
    pub payment_term_display: Option<String>,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub payment_status_display: Option<String>,
    #[serde(deserialize_with = "de::amount")]
    pub amount_paid: f64,
    #[serde(default, deserialize_with = "de::amount")]
    pub amount_due: f64,
    #[serde(default, with = "de::optional_date")]
    pub transaction_date: Option<Date>,
    #[serde(default, with = "de::optional_date")]
    pub due_date: Option<Date>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Payment {
    pub fn status_class(&self) -> &'static str {
        status_class(&self.payment_status)
    }

    pub fn status_label(&self) -> &str {
        self.payment_status_display
            .as_deref()
            .unwrap_or(&self.payment_status)
    }
}

impl Record for Payment {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Request body for creating or updating a payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentForm {
    pub student: i64,
    pub payment_mode: PaymentMode,
    pub payment_term: PaymentTerm,
    pub amount_paid: f64,
    /// Left out so the backend derives it from the fee structure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_due: Option<f64>,
    #[serde(with = "de::optional_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PaymentForm {
    pub fn new(student: i64, amount_paid: f64) -> Self {
        Self {
            student,
            payment_mode: PaymentMode::default(),
            payment_term: PaymentTerm::default(),
            amount_paid,
            amount_due: None,
            due_date: None,
            transaction_id: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.student <= 0 {
            return Err("Select a student".into());
        }
        if !self.amount_paid.is_finite() || self.amount_paid < 0.0 {
            return Err("Amount paid must be a non-negative number".into());
        }
        if let Some(due) = self.amount_due {
            if !due.is_finite() || due < 0.0 {
                return Err("Amount due must be a non-negative number".into());
            }
        }
        Ok(())
    }
}

/// Balance snapshot the backend attaches to a newly created payment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentReceipt {
    pub student_name: String,
    #[serde(deserialize_with = "de::amount")]
    pub total_fee: f64,
    #[serde(deserialize_with = "de::amount")]
    pub total_paid: f64,
    #[serde(deserialize_with = "de::amount")]
    pub balance_due: f64,
    #[serde(default, deserialize_with = "de::amount")]
    pub term_fee: f64,
    #[serde(default)]
    pub current_term: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub amount_just_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedPayment {
    #[serde(flatten)]
    pub payment: Payment,
    #[serde(default)]
    pub payment_summary: Option<PaymentReceipt>,
}

/// School-wide totals from `payments/summary/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentsOverview {
    pub total_payments: u64,
    #[serde(deserialize_with = "de::amount")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "de::amount_map")]
    pub payments_by_mode: BTreeMap<String, f64>,
}
