//! Cable selection commands.
//!
//! Provides the select_cable command that:
//! 1. Parses the installation context from JSON
//! 2. Merges requirements implied by the load description (unless disabled)
//! 3. Runs the context through the rule table

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cable::{
    get_load_type_requirements, CableAdvisor, CableSelectionContext, CableType, LoadRequirements,
};

/// Request payload for cable selection.
#[derive(Debug, Deserialize)]
pub struct SelectCableRequest {
    #[serde(flatten)]
    pub context: CableSelectionContext,
    /// Merge requirements derived from `load_type` before selecting
    #[serde(default = "default_true")]
    pub apply_load_requirements: bool,
}

fn default_true() -> bool {
    true
}

/// Cable type with display-friendly labels.
#[derive(Debug, Serialize)]
pub struct CableTypeDisplay {
    pub cable_type: CableType,
    pub label: String,
    pub description: String,
}

impl From<CableType> for CableTypeDisplay {
    fn from(cable_type: CableType) -> Self {
        Self {
            cable_type,
            label: cable_type.label().to_string(),
            description: cable_type.description().to_string(),
        }
    }
}

/// Full selection response.
#[derive(Debug, Serialize)]
pub struct SelectCableResponse {
    pub recommended: CableTypeDisplay,
    pub reason: String,
    pub alternatives: Vec<CableTypeDisplay>,
    pub matched_rule: Option<String>,
    /// Requirements merged into the context before evaluation
    pub applied_requirements: LoadRequirements,
    /// The context the rules were evaluated against
    pub context: CableSelectionContext,
}

/// One row of the active rule table.
#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub priority: usize,
    pub id: String,
    pub cable_type: CableType,
    pub label: String,
}

/// Select a cable for the JSON-encoded context.
pub fn select_cable(advisor: &CableAdvisor, request_json: &str) -> Result<SelectCableResponse, String> {
    let request: SelectCableRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid cable selection request: {}", e))?;

    let applied_requirements = if request.apply_load_requirements {
        get_load_type_requirements(request.context.load_type.as_deref().unwrap_or(""))
    } else {
        LoadRequirements::default()
    };
    let context = applied_requirements.apply_to(&request.context);

    let selection = advisor.select(&context);
    info!(
        "Selected {} (rule: {})",
        selection.cable_type.label(),
        selection.matched_rule.as_deref().unwrap_or("fallback")
    );

    Ok(SelectCableResponse {
        recommended: selection.cable_type.into(),
        reason: selection.reason,
        alternatives: selection.alternatives.into_iter().map(Into::into).collect(),
        matched_rule: selection.matched_rule,
        applied_requirements,
        context,
    })
}

/// List the rule table in evaluation order.
pub fn list_rules(advisor: &CableAdvisor) -> Vec<RuleSummary> {
    advisor
        .rules()
        .rules
        .iter()
        .enumerate()
        .map(|(i, rule)| RuleSummary {
            priority: i + 1,
            id: rule.id.clone(),
            cable_type: rule.cable_type,
            label: rule.cable_type.label().to_string(),
        })
        .collect()
}
