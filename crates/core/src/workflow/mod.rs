//! Multi-step assignment workflow.
//!
//! Load validation tickets, fetch a recommendation for each, then implement
//! the assignment. [`AssignmentWorkflow`] tracks which step the operator is
//! on and which actions are available.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("invalid workflow transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

/// Step of the assignment workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum WorkflowState {
    #[default]
    Idle,
    TicketsLoading,
    TicketsLoaded {
        total: usize,
    },
    RecommendationsLoading {
        completed: usize,
        total: usize,
    },
    RecommendationsComplete {
        total: usize,
    },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::TicketsLoading => "tickets-loading",
            WorkflowState::TicketsLoaded { .. } => "tickets-loaded",
            WorkflowState::RecommendationsLoading { .. } => "recommendations-loading",
            WorkflowState::RecommendationsComplete { .. } => "recommendations-complete",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Availability of one workflow action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ButtonState {
    pub enabled: bool,
    /// The action is running; shown as a spinner.
    pub loading: bool,
}

impl ButtonState {
    const ENABLED: ButtonState = ButtonState {
        enabled: true,
        loading: false,
    };
    const DISABLED: ButtonState = ButtonState {
        enabled: false,
        loading: false,
    };
    const LOADING: ButtonState = ButtonState {
        enabled: false,
        loading: true,
    };
}

/// The three workflow actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowButtons {
    pub get_validation_tickets: ButtonState,
    pub get_recommendations: ButtonState,
    pub implement_assignment: ButtonState,
}

/// Assignment workflow state machine.
#[derive(Debug, Clone, Default)]
pub struct AssignmentWorkflow {
    state: WorkflowState,
}

impl AssignmentWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Move to `next`, rejecting transitions the workflow does not allow.
    pub fn transition(&mut self, next: WorkflowState) -> Result<(), WorkflowError> {
        use WorkflowState::*;

        let allowed = matches!(
            (self.state, next),
            (Idle, TicketsLoading)
                | (TicketsLoading, TicketsLoaded { .. } | Idle)
                | (TicketsLoaded { .. }, TicketsLoading | RecommendationsLoading { .. })
                | (RecommendationsLoading { .. }, RecommendationsComplete { .. })
                | (
                    RecommendationsComplete { .. },
                    TicketsLoading | RecommendationsLoading { .. }
                )
        );

        if !allowed {
            return Err(WorkflowError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }

        debug!(from = %self.state, to = %next, "Workflow transition");
        self.state = next;
        Ok(())
    }

    /// Record recommendation progress. Completes the workflow step once
    /// every ticket has a terminal outcome.
    pub fn record_progress(&mut self, completed: usize, total: usize) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::RecommendationsLoading { .. } => {
                if completed >= total && total > 0 {
                    self.transition(WorkflowState::RecommendationsComplete { total })
                } else {
                    self.state = WorkflowState::RecommendationsLoading { completed, total };
                    Ok(())
                }
            }
            other => Err(WorkflowError::InvalidTransition {
                from: other.to_string(),
                to: WorkflowState::RecommendationsLoading { completed, total }.to_string(),
            }),
        }
    }

    pub fn buttons(&self) -> WorkflowButtons {
        match self.state {
            WorkflowState::Idle => WorkflowButtons {
                get_validation_tickets: ButtonState::ENABLED,
                get_recommendations: ButtonState::DISABLED,
                implement_assignment: ButtonState::DISABLED,
            },
            WorkflowState::TicketsLoading => WorkflowButtons {
                get_validation_tickets: ButtonState::LOADING,
                get_recommendations: ButtonState::DISABLED,
                implement_assignment: ButtonState::DISABLED,
            },
            WorkflowState::TicketsLoaded { .. } => WorkflowButtons {
                get_validation_tickets: ButtonState::ENABLED,
                get_recommendations: ButtonState::ENABLED,
                implement_assignment: ButtonState::DISABLED,
            },
            WorkflowState::RecommendationsLoading { .. } => WorkflowButtons {
                get_validation_tickets: ButtonState::ENABLED,
                get_recommendations: ButtonState::LOADING,
                implement_assignment: ButtonState::DISABLED,
            },
            WorkflowState::RecommendationsComplete { .. } => WorkflowButtons {
                get_validation_tickets: ButtonState::ENABLED,
                get_recommendations: ButtonState::ENABLED,
                implement_assignment: ButtonState::ENABLED,
            },
        }
    }
}

/// `"Processing ticket 3/12 (IN123)..."`; `current` is the launch ordinal.
pub fn progress_text(current: usize, total: usize, ticket_id: Option<&str>) -> String {
    match ticket_id {
        Some(id) => format!("Processing ticket {}/{} ({})...", current, total, id),
        None => format!("Processing ticket {}/{}...", current, total),
    }
}

pub fn completion_text(total: usize) -> String {
    format!("{} recommendations complete", total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut workflow = AssignmentWorkflow::new();
        assert_eq!(workflow.state(), WorkflowState::Idle);

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

        workflow.record_progress(1, 2).unwrap();
        assert_eq!(
            workflow.state(),
            WorkflowState::RecommendationsLoading {
                completed: 1,
                total: 2
            }
        );

        workflow.record_progress(2, 2).unwrap();
        assert_eq!(
            workflow.state(),
            WorkflowState::RecommendationsComplete { total: 2 }
        );
        assert!(workflow.buttons().implement_assignment.enabled);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut workflow = AssignmentWorkflow::new();
        let err = workflow
            .transition(WorkflowState::RecommendationsLoading {
                completed: 0,
                total: 1,
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid workflow transition: idle -> recommendations-loading"
        );
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.record_progress(1, 1).is_err());
    }

    #[test]
    fn test_failed_load_returns_to_idle_and_reloads() {
        let mut workflow = AssignmentWorkflow::new();
        workflow.transition(WorkflowState::TicketsLoading).unwrap();
        workflow.transition(WorkflowState::Idle).unwrap();
        workflow.transition(WorkflowState::TicketsLoading).unwrap();
        workflow
            .transition(WorkflowState::TicketsLoaded { total: 1 })
            .unwrap();
        workflow.transition(WorkflowState::TicketsLoading).unwrap();
    }

    #[test]
    fn test_progress_with_zero_total_never_completes() {
        let mut workflow = AssignmentWorkflow {
            state: WorkflowState::RecommendationsLoading {
                completed: 0,
                total: 0,
            },
        };
        workflow.record_progress(0, 0).unwrap();
        assert!(matches!(
            workflow.state(),
            WorkflowState::RecommendationsLoading { .. }
        ));
    }

    #[test]
    fn test_buttons_per_state() {
        let mut workflow = AssignmentWorkflow::new();
        let idle = workflow.buttons();
        assert!(idle.get_validation_tickets.enabled);
        assert!(!idle.get_recommendations.enabled);

        workflow.transition(WorkflowState::TicketsLoading).unwrap();
        let loading = workflow.buttons();
        assert!(loading.get_validation_tickets.loading);
        assert!(!loading.get_validation_tickets.enabled);

        workflow
            .transition(WorkflowState::TicketsLoaded { total: 3 })
            .unwrap();
        workflow
            .transition(WorkflowState::RecommendationsLoading {
                completed: 0,
                total: 3,
            })
            .unwrap();
        let running = workflow.buttons();
        assert!(running.get_recommendations.loading);
        assert!(!running.implement_assignment.enabled);
    }

    #[test]
    fn test_texts() {
        assert_eq!(
            progress_text(3, 12, Some("IN123")),
            "Processing ticket 3/12 (IN123)..."
        );
        assert_eq!(progress_text(1, 2, None), "Processing ticket 1/2...");
        assert_eq!(completion_text(12), "12 recommendations complete");
    }
}
