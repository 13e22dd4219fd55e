//! Rich result types for request lifecycle operations.

#[derive(Debug, Clone)]
pub struct StateTransitionResult {
    pub valid: bool,
    pub from_state: String,
    pub to_state: String,
    pub transition_reason: Option<String>,
}
