use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use triage_core::ticket::{Recommendation, SearchTicket};
use triage_core::{Config, SearchMode, SearchRequest, SearchToggles};

use super::{client, open_preferences};

pub async fn search(config: &Config, text: &str, mode: Option<SearchMode>) -> Result<()> {
    let mut store = open_preferences(config)?;
    let mut toggles = SearchToggles::load(&store)?;

    let mode = match mode {
        Some(mode) => {
            toggles.set_mode(&mut store, mode)?;
            mode
        }
        None => toggles.active_mode(),
    };

    let request = SearchRequest::new(mode, text)?;
    info!(mode = %mode, "Searching tickets");

    let results = client(config)?
        .search_tickets(&request)
        .await
        .context("Search failed")?;

    println!(
        "Found {} result(s) for {} \"{}\"",
        results.result_count,
        mode.label(),
        request.value()
    );
    for ticket in &results.result {
        print_search_ticket(ticket, mode);
    }
    Ok(())
}

fn print_search_ticket(ticket: &SearchTicket, mode: SearchMode) {
    println!();
    println!(
        "{} - {}",
        ticket.id,
        ticket.title.as_deref().unwrap_or("N/A")
    );
    println!(
        "  Status: {} | Priority: {} | Group: {} | Assigned to: {}",
        na(&ticket.status_value),
        na(&ticket.priority_value),
        na(&ticket.support_group_value),
        na(&ticket.assigned_to)
    );
    if mode == SearchMode::Phone {
        println!("  Contact Method: {}", na(&ticket.contact_method));
    }
    if let Some(description) = &ticket.description {
        println!("  {}", truncate(description, 250));
    }
}

pub async fn advise(config: &Config, ticket_id: &str) -> Result<()> {
    let ticket_id = ticket_id.trim();
    anyhow::ensure!(!ticket_id.is_empty(), "Please enter a ticket number");

    let recommendation = client(config)?
        .ticket_advice(ticket_id)
        .await
        .with_context(|| format!("Failed to get advice for {}", ticket_id))?;

    print_recommendation(ticket_id, &recommendation);
    Ok(())
}

fn print_recommendation(ticket_id: &str, rec: &Recommendation) {
    println!("{}: {}", ticket_id, rec.summary_line());

    if let Some(explanation) = &rec.detailed_explanation {
        println!();
        println!("Explanation:");
        println!("{}", indent(&render_value(explanation)));
    }

    if let Some(original) = &rec.original_data {
        println!();
        println!("Original ticket:");
        println!("{}", indent(&render_value(original)));
    }

    if !rec.similar_tickets.is_empty() {
        println!();
        println!("Similar tickets:");
        for similar in &rec.similar_tickets {
            println!(
                "  {} - {} ({})",
                similar.id,
                similar.title.as_deref().unwrap_or("N/A"),
                na(&similar.support_group)
            );
        }
    }

    if !rec.onenote_documentation.is_empty() {
        println!();
        println!("Documentation:");
        for doc in &rec.onenote_documentation {
            match doc.similarity {
                Some(score) => println!("  {} ({:.0}% match)", doc.display_title(), score * 100.0),
                None => println!("  {}", doc.display_title()),
            }
        }
    }
}

fn na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
