//! Validated status transitions.

use super::ValidationError;

/// A status enum whose values move along a fixed transition table.
///
/// `SyncState` routes every status change through `transition_to`, so a
/// sync that never started cannot be marked successful.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every status reachable in one step; must agree with `can_transition_to`.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns `target`, or a validation error naming both states.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True when no transition leaves this status.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
