//! Core ticket payload types.
//!
//! Field names follow the helpdesk backend's JSON. Every payload keeps
//! fields it does not model in `extra` so nothing is lost on the way to a
//! renderer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Recommendation Types
// ============================================================================

/// AI assignment recommendation for one ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_support_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_priority_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_explanation: Option<Value>,

    /// The ticket the recommendation was produced for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_tickets: Vec<SimilarTicket>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub onenote_documentation: Vec<OnenoteDocument>,

    /// Set when the recommendation could not be produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recommendation {
    /// Inline-error payload shown in a failed item's slot.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the payload carries any recommendation fields.
    pub fn has_advice(&self) -> bool {
        self.recommended_support_group.is_some()
            || self.recommended_priority_level.is_some()
            || self.detailed_explanation.is_some()
    }

    /// One-line summary, "N/A" for missing values.
    pub fn summary_line(&self) -> String {
        if let Some(error) = &self.error {
            return format!("AI Analysis Error: {}", error);
        }
        format!(
            "Support Group: {} | Priority: {}",
            self.recommended_support_group.as_deref().unwrap_or("N/A"),
            self.recommended_priority_level.as_deref().unwrap_or("N/A")
        )
    }
}

/// A historical ticket similar to the one being triaged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarTicket {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Knowledge-base page referenced by a recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnenoteDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl OnenoteDocument {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Document")
    }
}

/// Body of a ticket-advice request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    pub ticket_id: String,
}

// ============================================================================
// Validation Ticket Types
// ============================================================================

/// A ticket awaiting assignment validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationTicket {
    pub id: String,
    /// Position in the validation list, assigned by the backend.
    #[serde(default)]
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationTicket {
    /// Heading as listed in the validation accordion: "<id> - <title>".
    pub fn heading(&self) -> String {
        format!("{} - {}", self.id, self.title.as_deref().unwrap_or("N/A"))
    }
}

/// Non-streaming validation ticket response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationTicketsResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub tickets: Vec<ValidationTicket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Search Types
// ============================================================================

/// A ticket returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTicket {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_value: Option<String>,
    #[serde(
        default,
        rename = "assignedTo_DisplayName",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_group_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub result: Vec<SearchTicket>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recommendation_deserialize_full() {
        let value = json!({
            "recommended_support_group": "Network Team",
            "recommended_priority_level": "P2",
            "detailed_explanation": {"reasoning": "VPN outage pattern"},
            "original_data": {"id": "IN1001"},
            "similar_tickets": [{"id": "IN0900", "title": "VPN down", "support_group": "Network Team"}],
            "onenote_documentation": [{"title": "VPN runbook", "similarity": 0.91}],
            "model": "gpt"
        });
        let rec: Recommendation = serde_json::from_value(value).unwrap();
        assert_eq!(rec.recommended_support_group.as_deref(), Some("Network Team"));
        assert_eq!(rec.similar_tickets.len(), 1);
        assert_eq!(rec.onenote_documentation[0].display_title(), "VPN runbook");
        assert_eq!(rec.extra.get("model"), Some(&json!("gpt")));
        assert!(rec.has_advice());
        assert!(!rec.is_error());
    }

    #[test]
    fn test_recommendation_failed_summary() {
        let rec = Recommendation::failed("HTTP error! status: 502");
        assert!(rec.is_error());
        assert!(!rec.has_advice());
        assert_eq!(rec.summary_line(), "AI Analysis Error: HTTP error! status: 502");
    }

    #[test]
    fn test_recommendation_summary_defaults_to_na() {
        let rec = Recommendation {
            recommended_support_group: Some("Desktop".to_string()),
            ..Default::default()
        };
        assert_eq!(rec.summary_line(), "Support Group: Desktop | Priority: N/A");
    }

    #[test]
    fn test_advice_request_is_camel_case() {
        let body = serde_json::to_value(AdviceRequest {
            ticket_id: "IN42".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({"ticketId": "IN42"}));
    }

    #[test]
    fn test_validation_ticket_keeps_unknown_fields() {
        let ticket: ValidationTicket = serde_json::from_value(json!({
            "id": "SR77",
            "index": 4,
            "title": "New laptop",
            "urgency": "High"
        }))
        .unwrap();
        assert_eq!(ticket.index, 4);
        assert_eq!(ticket.heading(), "SR77 - New laptop");
        assert_eq!(ticket.extra.get("urgency"), Some(&json!("High")));
    }

    #[test]
    fn test_search_results_deserialize() {
        let results: SearchResults = serde_json::from_value(json!({
            "resultCount": 1,
            "result": [{
                "id": "IN5",
                "title": "Printer jam",
                "statusValue": "Closed",
                "assignedTo_DisplayName": "Sam"
            }]
        }))
        .unwrap();
        assert_eq!(results.result_count, 1);
        assert_eq!(results.result[0].status_value.as_deref(), Some("Closed"));
        assert_eq!(results.result[0].assigned_to.as_deref(), Some("Sam"));
    }
}
