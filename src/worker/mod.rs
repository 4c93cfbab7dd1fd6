//! Worker Lambda handler and reply processing

pub mod handler;
pub mod reply;

// Re-export the main handler for convenience
pub use handler::{RecordOutcome, WorkerHandler, function_handler};
pub use reply::Delivery;
