//! Helpdesk ticket payloads and work-item collection.

mod items;
mod types;

pub use items::{collect_work_items, extract_ticket_id, work_items_from_validation};
pub use types::*;
