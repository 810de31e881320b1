pub mod dto;
pub mod handlers;
mod repo;

pub use dto::{annual_fee_for, term_fee_for, FeeStructure, FeeStructureForm};
pub use handlers::FeesPage;
