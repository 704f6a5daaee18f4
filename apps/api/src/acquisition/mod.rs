// Image acquisition: turns keywords into a balanced, deduplicated image set sized for a board.
// Network-bound. Keywords are fetched concurrently; pages within one query are sequential.

pub mod category;
pub mod keywords;
pub mod planner;

use thiserror::Error;

use crate::provider::ProviderError;

pub use planner::{AcquisitionPlanner, PlannerSettings};

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Keyword fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
