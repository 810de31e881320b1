//! State shared by every page controller.

use tracing::warn;

use crate::error::ApiError;

/// `Idle -> Loading -> Success | Error -> Idle`, re-entered per action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl PageState {
    pub fn start(&mut self) {
        *self = PageState::Loading;
    }

    pub fn succeed(&mut self) {
        *self = PageState::Success;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = PageState::Error(message.into());
    }

    pub fn reset(&mut self) {
        *self = PageState::Idle;
    }

    /// Maps a failed call onto the page. Authorization failures are handled
    /// by the client (logout and redirect), so the page just goes idle.
    pub fn fail_with(&mut self, err: &ApiError, action: &str) {
        warn!(error = %err, action, "page action failed");
        match error_message(err, action) {
            Some(message) => self.fail(message),
            None => self.reset(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Error(message) => Some(message),
            _ => None,
        }
    }
}

pub fn failure_message(action: &str) -> String {
    format!("Failed to {action}. Please try again.")
}

/// Field errors verbatim, the generic message for anything else.
pub fn error_message(err: &ApiError, action: &str) -> Option<String> {
    match err {
        ApiError::Unauthorized => None,
        ApiError::Validation(errors) if !errors.fields.is_empty() => Some(errors.to_string()),
        _ => Some(failure_message(action)),
    }
}

/// Blocking yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Records that carry a backend id.
pub trait Record {
    fn id(&self) -> i64;
}

/// Applies a server-returned record: replaces the entry with the same id or
/// appends it.
pub fn upsert<T: Record>(list: &mut Vec<T>, record: T) {
    match list.iter_mut().find(|r| r.id() == record.id()) {
        Some(slot) => *slot = record,
        None => list.push(record),
    }
}

pub fn remove<T: Record>(list: &mut Vec<T>, id: i64) -> bool {
    let before = list.len();
    list.retain(|r| r.id() != id);
    list.len() != before
}
