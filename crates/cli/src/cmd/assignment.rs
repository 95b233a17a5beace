use anyhow::{bail, Context, Result};
use futures::StreamExt;
use tracing::{info, warn};

use triage_core::workflow::{completion_text, progress_text};
use triage_core::{
    AssignmentWorkflow, BatchCallbacks, BatchRunner, Config, HelpdeskClient, Recommendation,
    RecommendationFetcher, ValidationStreamEvent, ValidationStreamSummary, ValidationTicket,
    WorkItem, WorkflowState,
};

use super::client;

/// Stream the validation listing, printing tickets as they arrive.
async fn load_validation_tickets(client: &HelpdeskClient) -> Result<ValidationStreamSummary> {
    let mut stream = client
        .stream_validation_tickets()
        .await
        .context("Failed to open validation ticket stream")?;

    let mut summary = ValidationStreamSummary::new();
    while let Some(event) = stream.next().await {
        let event = event.context("Validation ticket stream failed")?;
        match &event {
            ValidationStreamEvent::Ticket(ticket) => println!("{}", ticket.heading()),
            ValidationStreamEvent::Error {
                ticket_id: Some(id),
                message,
            } => println!("{} - Error: {}", id, message),
            _ => {}
        }
        if !summary.apply(event) {
            break;
        }
    }
    Ok(summary)
}

/// Why a finished listing cannot be used, if it cannot.
fn listing_failure(summary: &ValidationStreamSummary) -> Option<String> {
    if let Some(message) = &summary.fatal_error {
        return Some(format!("Error loading tickets: {}", message));
    }
    if summary.is_interrupted() {
        return Some(match (summary.loaded(), summary.expected) {
            (0, _) => {
                "Connection error while loading validation tickets. Please try again.".to_string()
            }
            (loaded, Some(expected)) => format!(
                "Connection lost after loading {} of {} validation tickets. Please try again.",
                loaded, expected
            ),
            (loaded, None) => format!(
                "Connection lost after loading {} validation tickets. Please try again.",
                loaded
            ),
        });
    }
    None
}

pub async fn validation(config: &Config) -> Result<()> {
    let summary = load_validation_tickets(&client(config)?).await?;

    if let Some(message) = listing_failure(&summary) {
        bail!(message);
    }
    if summary.is_empty_listing() {
        println!("No validation tickets found.");
        return Ok(());
    }
    println!("{}", summary.progress_line());
    Ok(())
}

pub async fn recommend(config: &Config, concurrency: Option<usize>) -> Result<()> {
    let client = client(config)?;
    let mut workflow = AssignmentWorkflow::new();

    workflow.transition(WorkflowState::TicketsLoading)?;
    let summary = load_validation_tickets(&client).await?;

    if let Some(message) = listing_failure(&summary) {
        workflow.transition(WorkflowState::Idle)?;
        bail!(message);
    }
    if summary.is_empty_listing() {
        workflow.transition(WorkflowState::TicketsLoaded { total: 0 })?;
        println!("No validation tickets found.");
        return Ok(());
    }
    let total = summary.loaded();
    workflow.transition(WorkflowState::TicketsLoaded { total })?;
    println!("{}", summary.progress_line());

    if total == 0 {
        println!("No tickets found to process.");
        return Ok(());
    }

    let items = triage_core::work_items_from_validation(&summary.tickets);
    workflow.transition(WorkflowState::RecommendationsLoading {
        completed: 0,
        total,
    })?;

    let runner = match concurrency {
        Some(limit) => BatchRunner::new(limit),
        None => BatchRunner::from_config(&config.batch),
    };
    let mut reporter = Reporter {
        workflow: &mut workflow,
    };

    let result = runner
        .run(
            items,
            |item: &WorkItem<ValidationTicket>| {
                let client = client.clone();
                let ticket_id = item.id.clone();
                async move { client.fetch(&ticket_id).await }
            },
            &mut reporter,
        )
        .await?;

    info!(
        run_id = %result.run_id,
        succeeded = result.succeeded,
        failed = result.failed,
        "Recommendations finished"
    );

    if workflow.buttons().implement_assignment.enabled {
        println!("Implementing assignments is not available from this client yet.");
    }
    Ok(())
}

/// Prints batch progress and keeps the workflow in step with it.
struct Reporter<'a> {
    workflow: &'a mut AssignmentWorkflow,
}

impl BatchCallbacks<ValidationTicket, Recommendation> for Reporter<'_> {
    fn on_ticket_start(&mut self, item: &WorkItem<ValidationTicket>, current: usize, total: usize) {
        println!("{}", progress_text(current, total, Some(&item.id)));
    }

    fn on_ticket_complete(&mut self, item: &WorkItem<ValidationTicket>, result: Recommendation) {
        println!("{}", render_outcome(&item.context, &result));
    }

    fn on_error(&mut self, item: &WorkItem<ValidationTicket>, error: &str) {
        println!(
            "{}",
            render_outcome(&item.context, &Recommendation::failed(error))
        );
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        if let Err(e) = self.workflow.record_progress(completed, total) {
            warn!(error = %e, "Workflow out of step with batch progress");
        }
    }

    fn on_complete(&mut self) {
        if let WorkflowState::RecommendationsComplete { total } = self.workflow.state() {
            println!("{}", completion_text(total));
        }
    }
}

fn render_outcome(ticket: &ValidationTicket, recommendation: &Recommendation) -> String {
    format!(
        "[{}] {}\n  {}",
        ticket.index + 1,
        ticket.heading(),
        recommendation.summary_line()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_outcome() {
        let ticket = ValidationTicket {
            id: "IN7".to_string(),
            index: 2,
            title: Some("VPN down".to_string()),
            ..Default::default()
        };
        let rec = Recommendation {
            recommended_support_group: Some("Network".to_string()),
            recommended_priority_level: Some("P2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render_outcome(&ticket, &rec),
            "[3] IN7 - VPN down\n  Support Group: Network | Priority: P2"
        );
        assert_eq!(
            render_outcome(&ticket, &Recommendation::failed("HTTP error! status: 500")),
            "[3] IN7 - VPN down\n  AI Analysis Error: HTTP error! status: 500"
        );
    }

    fn summary_after(events: Vec<ValidationStreamEvent>) -> ValidationStreamSummary {
        let mut summary = ValidationStreamSummary::new();
        for event in events {
            summary.apply(event);
        }
        summary
    }

    #[test]
    fn test_listing_failure_when_stream_closes_early() {
        let summary = summary_after(vec![]);
        assert_eq!(
            listing_failure(&summary).as_deref(),
            Some("Connection error while loading validation tickets. Please try again.")
        );

        let summary = summary_after(vec![
            ValidationStreamEvent::Count { count: 3 },
            ValidationStreamEvent::Ticket(triage_core::testing::fixtures::validation_ticket(
                "IN1", 0,
            )),
        ]);
        assert_eq!(
            listing_failure(&summary).as_deref(),
            Some("Connection lost after loading 1 of 3 validation tickets. Please try again.")
        );
    }

    #[test]
    fn test_listing_failure_for_fatal_error_and_usable_listings() {
        let summary = summary_after(vec![ValidationStreamEvent::Error {
            ticket_id: None,
            message: "database unavailable".to_string(),
        }]);
        assert_eq!(
            listing_failure(&summary).as_deref(),
            Some("Error loading tickets: database unavailable")
        );

        let empty = summary_after(vec![ValidationStreamEvent::Count { count: 0 }]);
        assert_eq!(listing_failure(&empty), None);

        let complete = summary_after(vec![
            ValidationStreamEvent::Count { count: 1 },
            ValidationStreamEvent::Ticket(triage_core::testing::fixtures::validation_ticket(
                "IN1", 0,
            )),
            ValidationStreamEvent::Complete { loaded: Some(1) },
        ]);
        assert_eq!(listing_failure(&complete), None);
    }

    #[tokio::test]
    async fn test_reporter_completes_workflow() {
        let mut workflow = AssignmentWorkflow::new();
        workflow.transition(WorkflowState::TicketsLoading).unwrap();
        workflow
            .transition(WorkflowState::TicketsLoaded { total: 2 })
            .unwrap();
        workflow
            .transition(WorkflowState::RecommendationsLoading {
                completed: 0,
                total: 2,
            })
            .unwrap();

        let fetcher = triage_core::testing::MockRecommendationFetcher::new();
        fetcher.fail_with_status("IN2", 500).await;
        let tickets = triage_core::testing::fixtures::validation_tickets(&["IN1", "IN2"]);
        let items = triage_core::work_items_from_validation(&tickets);

        let mut reporter = Reporter {
            workflow: &mut workflow,
        };
        let summary = BatchRunner::new(2)
            .run(
                items,
                |item: &WorkItem<ValidationTicket>| {
                    let fetcher = fetcher.clone();
                    let id = item.id.clone();
                    async move { fetcher.fetch(&id).await }
                },
                &mut reporter,
            )
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(
            workflow.state(),
            WorkflowState::RecommendationsComplete { total: 2 }
        );
        assert!(workflow.buttons().implement_assignment.enabled);
    }
}
