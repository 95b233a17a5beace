pub mod batch;
pub mod client;
pub mod config;
pub mod metrics;
pub mod preferences;
pub mod search;
pub mod sse;
pub mod testing;
pub mod ticket;
pub mod workflow;

pub use batch::{
    BatchCallbacks, BatchConfig, BatchError, BatchEvent, BatchRunner, BatchState, BatchSummary,
    EventForwarder, NoopCallbacks, Outcome, WorkItem,
};
pub use client::{ClientError, HelpdeskClient, RecommendationFetcher, ValidationEventStream};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use preferences::{
    AssignmentMode, AssignmentToggles, FilePreferenceStore, MemoryPreferenceStore,
    PreferenceError, PreferenceStore, SearchToggles, Theme,
};
pub use search::{SearchError, SearchMode, SearchRequest};
pub use sse::{SseError, SseEvent, SseParser, ValidationStreamEvent, ValidationStreamSummary};
pub use ticket::{
    collect_work_items, extract_ticket_id, work_items_from_validation, Recommendation,
    ValidationTicket,
};
pub use workflow::{AssignmentWorkflow, WorkflowError, WorkflowState};
