pub mod dto;
pub mod handlers;
mod repo;

pub use dto::{
    status_class, CreatedPayment, Payment, PaymentForm, PaymentMode, PaymentReceipt, PaymentTerm,
    PaymentsOverview,
};
pub use handlers::PaymentsPage;
