//! API Lambda handler and request processing

pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;
pub mod sqs;

// Re-export the main handler for convenience
pub use handler::{IngressHandler, function_handler};
pub use sqs::{MessageQueue, SqsQueue};
