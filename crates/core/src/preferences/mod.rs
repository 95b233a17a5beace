//! Operator preferences: search toggles, assignment mode and theme.
//!
//! Preferences are flat string key/value pairs. The keys below are the whole
//! persistence format; toggles store `"true"` / `"false"` and the theme
//! stores `"light"` / `"dark"`.

mod store;
mod toggles;

pub use store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use toggles::{icon_name, AssignmentMode, AssignmentToggles, SearchToggles, Theme};

use thiserror::Error;

pub const PHONE_ON: &str = "phoneOn";
pub const MATCH_ON: &str = "matchOn";
pub const SEMANTIC_ON: &str = "semanticOn";
pub const TICKET_ON: &str = "ticketOn";
pub const SINGLE_TICKET_ON: &str = "singleTicketOn";
pub const MULTIPLE_TICKETS_ON: &str = "multipleTicketsOn";
pub const THEME: &str = "theme";

/// Errors reading or writing preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to access preferences file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid preferences file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}
