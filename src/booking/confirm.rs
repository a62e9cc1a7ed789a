//! Confirmation gates for destructive administrative operations
//!
//! Gating is a two-step protocol: validate the operator's input first, then
//! hand the resulting decision to the service. Keeping validation separate
//! from execution lets the gates be tested without an interactive surface.

/// The literal word the operator must type to confirm a full reset.
/// Matching is case-insensitive.
pub const RESET_CODE: &str = "AMOR";

/// Operator answer to a yes/no administrative prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminConfirmation {
    Confirmed,
    Declined,
}

impl AdminConfirmation {
    pub fn is_confirmed(self) -> bool {
        self == AdminConfirmation::Confirmed
    }
}

/// Validated outcome of the typed full-reset prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetDecision {
    /// Input matched the confirmation word; the reset may run.
    Proceed,

    /// Non-empty input that did not match. The operator gets a wrong-code
    /// notice and nothing is written.
    WrongCode,

    /// Empty or cancelled prompt. Aborts silently.
    Cancelled,
}

/// Validate the operator's typed input for a full reset. `None` models a
/// cancelled prompt.
pub fn validate_reset_input(input: Option<&str>) -> ResetDecision {
    match input {
        None => ResetDecision::Cancelled,
        Some(text) if text.is_empty() => ResetDecision::Cancelled,
        Some(text) if text.to_uppercase() == RESET_CODE => ResetDecision::Proceed,
        Some(_) => ResetDecision::WrongCode,
    }
}
