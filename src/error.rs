use thiserror::Error;

/// Errors raised by the planning engine.
///
/// A search that finds no plan is not an error: it is reported through
/// [`PlanningResult::is_success`](crate::PlanningResult::is_success).
///
/// # Examples
///
/// ```
/// use regressive_goap::GoapError;
///
/// let error = GoapError::UnknownPlannerType("forward".to_string());
/// assert_eq!(format!("{}", error), "Unknown planner type: forward");
/// ```
#[derive(Error, Debug)]
pub enum GoapError {
    /// Static action cost is negative or not a finite number
    #[error("Action cost must be a non-negative finite number, got {0}")]
    InvalidActionCost(f32),

    /// The planner selector does not name a known strategy
    #[error("Unknown planner type: {0}")]
    UnknownPlannerType(String),

    /// `dequeue` was called on an empty frontier
    #[error("Queue is empty")]
    EmptyQueue,

    /// A wrapper around standard IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, GoapError>;
