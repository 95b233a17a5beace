//! Building batch work items from listed tickets.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::batch::WorkItem;

use super::types::ValidationTicket;

/// Ticket ids are two uppercase letters followed by digits (e.g. `IN12345`).
static TICKET_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z]{2}\d+)").unwrap());

/// Extract the ticket id leading a listing title such as `"IN12345 - Printer"`.
pub fn extract_ticket_id(title: &str) -> Option<&str> {
    TICKET_ID
        .captures(title.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build work items from listing titles in display order.
///
/// The title's position becomes the item index; titles without a ticket id
/// are skipped without shifting the indices of the others.
pub fn collect_work_items<S: AsRef<str>>(titles: &[S]) -> Vec<WorkItem<()>> {
    let items: Vec<_> = titles
        .iter()
        .enumerate()
        .filter_map(|(index, title)| {
            extract_ticket_id(title.as_ref()).map(|id| WorkItem::bare(id, index))
        })
        .collect();

    tracing::debug!(
        listed = titles.len(),
        collected = items.len(),
        "Collected ticket work items"
    );
    items
}

/// Build work items from streamed validation tickets, carrying the ticket as
/// context and keeping the backend-assigned index.
pub fn work_items_from_validation(
    tickets: &[ValidationTicket],
) -> Vec<WorkItem<ValidationTicket>> {
    tickets
        .iter()
        .map(|ticket| WorkItem::new(ticket.id.clone(), ticket.index, ticket.clone()))
        .collect()
}
