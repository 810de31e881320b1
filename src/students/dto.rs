use serde::{Deserialize, Serialize};
use time::Date;

use crate::de;
use crate::fees::dto::{validate_board, validate_grade, TERMS_PER_YEAR};
use crate::format;
use crate::page::Record;

/// Fee structure reference the backend embeds in each student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentFee {
    pub id: i64,
    #[serde(deserialize_with = "de::amount")]
    pub fee_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "de::string_or_number")]
    pub grade: String,
    pub board: String,
    #[serde(default)]
    pub parent_name: String,
    #[serde(default)]
    pub parent_contact_primary: String,
    #[serde(default)]
    pub parent_contact_secondary: Option<String>,
    #[serde(default, with = "de::optional_date")]
    pub admission_date: Option<Date>,
    #[serde(default, deserialize_with = "de::amount")]
    pub total_paid: f64,
    #[serde(default)]
    pub fee_structure: Option<StudentFee>,
}

impl Student {
    pub fn name(&self) -> String {
        match &self.full_name {
            Some(full) if !full.trim().is_empty() => full.clone(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    pub fn annual_fee(&self) -> Option<f64> {
        self.fee_structure.as_ref().map(|f| f.fee_amount)
    }

    pub fn term_fee(&self) -> f64 {
        self.annual_fee().unwrap_or(0.0) / TERMS_PER_YEAR
    }

    /// Outstanding amount for display only; the backend owns the ledger.
    pub fn balance(&self) -> f64 {
        format::balance(self.annual_fee(), self.total_paid)
    }
}

impl Record for Student {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    pub board: String,
    pub parent_name: String,
    pub parent_contact_primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_contact_secondary: Option<String>,
    #[serde(with = "de::optional_date", skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<Date>,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            grade: "1".into(),
            board: "CBSE".into(),
            parent_name: String::new(),
            parent_contact_primary: String::new(),
            parent_contact_secondary: None,
            admission_date: None,
        }
    }
}

impl StudentForm {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Parent name", &self.parent_name),
            ("Primary contact", &self.parent_contact_primary),
        ];
        if let Some((label, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("{label} is required"));
        }
        validate_grade(&self.grade)?;
        validate_board(&self.board)
    }

    /// Blank optional fields are dropped rather than sent as empty strings.
    pub fn normalized(&self) -> Self {
        let mut form = self.clone();
        form.parent_contact_secondary = form
            .parent_contact_secondary
            .filter(|s| !s.trim().is_empty());
        form
    }
}

/// Per-student totals from `students/{id}/payment_summary/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentSummary {
    pub student: Student,
    #[serde(deserialize_with = "de::amount")]
    pub total_fee: f64,
    #[serde(deserialize_with = "de::amount")]
    pub total_paid: f64,
    #[serde(deserialize_with = "de::amount")]
    pub balance: f64,
}
