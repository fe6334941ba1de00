mod action;
mod error;
mod frontier;
mod graph;
mod node;
mod planner;
mod regressive;
mod search;
mod state;
mod value;

pub use action::{Action, ActionId, ActionRef, ActionSet, Candidate, CostFn, DomainAction};
pub use error::{GoapError, Result};
pub use frontier::{PriorityQueue, DEFAULT_PRECISION};
pub use graph::{SearchTree, TreeEdge};
pub use node::{NodeId, PlanNode};
pub use planner::{create_planner, Planner, PlannerSettings, PlannerType, PlanningResult};
pub use regressive::RegressivePlanner;
pub use state::State;
pub use value::{FromValue, Value};
