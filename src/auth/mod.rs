pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;
pub mod session;

pub use dto::{AuthOutcome, Credentials, ProfileUpdate, Registration, User};
pub use handlers::{LoginPage, RegisterPage};
pub use services::SessionStore;
pub use session::{Session, SessionHandle};
