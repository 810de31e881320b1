use serde::{Deserialize, Serialize};

use crate::de;
use crate::page::Record;

pub const TERMS_PER_YEAR: f64 = 4.0;
pub const BOARDS: &[&str] = &["CBSE", "SSC"];
pub const GRADES: std::ops::RangeInclusive<u8> = 1..=10;

/// Annual fee for one grade/board pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructure {
    pub id: i64,
    #[serde(deserialize_with = "de::string_or_number")]
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_display: Option<String>,
    pub board: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_display: Option<String>,
    #[serde(deserialize_with = "de::amount")]
    pub fee_amount: f64,
}

impl FeeStructure {
    pub fn matches(&self, grade: &str, board: &str) -> bool {
        self.grade == grade && self.board == board
    }

    pub fn term_fee(&self) -> f64 {
        self.fee_amount / TERMS_PER_YEAR
    }
}

impl Record for FeeStructure {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeStructureForm {
    pub grade: String,
    pub board: String,
    pub fee_amount: f64,
}

impl FeeStructureForm {
    pub fn validate(&self) -> Result<(), String> {
        validate_grade(&self.grade)?;
        validate_board(&self.board)?;
        if !self.fee_amount.is_finite() || self.fee_amount < 0.0 {
            return Err("Fee amount must be a non-negative number".into());
        }
        Ok(())
    }
}

pub fn validate_grade(grade: &str) -> Result<(), String> {
    match grade.trim().parse::<u8>() {
        Ok(g) if GRADES.contains(&g) => Ok(()),
        _ => Err(format!("Grade must be between {} and {}", GRADES.start(), GRADES.end())),
    }
}

pub fn validate_board(board: &str) -> Result<(), String> {
    if BOARDS.contains(&board) {
        Ok(())
    } else {
        Err(format!("Board must be one of {}", BOARDS.join(", ")))
    }
}

/// Annual fee for a grade/board pair; zero when no structure exists.
pub fn annual_fee_for(structures: &[FeeStructure], grade: &str, board: &str) -> f64 {
    structures
        .iter()
        .find(|f| f.matches(grade, board))
        .map(|f| f.fee_amount)
        .unwrap_or(0.0)
}

pub fn term_fee_for(structures: &[FeeStructure], grade: &str, board: &str) -> f64 {
    annual_fee_for(structures, grade, board) / TERMS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structures() -> Vec<FeeStructure> {
        serde_json::from_str(
            r#"[
                {"id": 1, "grade": "5", "grade_display": "Grade 5", "board": "CBSE", "board_display": "CBSE", "fee_amount": "24000.00"},
                {"id": 2, "grade": 5, "board": "SSC", "fee_amount": 18000}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_grade_and_board() {
        let fees = structures();
        assert_eq!(annual_fee_for(&fees, "5", "CBSE"), 24000.0);
        assert_eq!(annual_fee_for(&fees, "5", "SSC"), 18000.0);
        assert_eq!(term_fee_for(&fees, "5", "CBSE"), 6000.0);
    }

    #[test]
    fn missing_structure_costs_nothing() {
        assert_eq!(annual_fee_for(&structures(), "9", "CBSE"), 0.0);
        assert_eq!(term_fee_for(&[], "1", "SSC"), 0.0);
    }

    #[test]
    fn form_validation() {
        let ok = FeeStructureForm {
            grade: "10".into(),
            board: "SSC".into(),
            fee_amount: 30000.0,
        };
        assert!(ok.validate().is_ok());

        let bad_grade = FeeStructureForm {
            grade: "11".into(),
            ..ok.clone()
        };
        assert_eq!(bad_grade.validate(), Err("Grade must be between 1 and 10".into()));

        let bad_board = FeeStructureForm {
            board: "ICSE".into(),
            ..ok.clone()
        };
        assert_eq!(bad_board.validate(), Err("Board must be one of CBSE, SSC".into()));

        let negative = FeeStructureForm {
            fee_amount: -1.0,
            ..ok
        };
        assert!(negative.validate().is_err());
    }
}
