//! All Bedrock functionality

pub mod client;
pub mod flow;

// Re-export main types for convenience
pub use client::{BedrockBackend, GenerativeBackend, Invocation};
pub use flow::{FlowEvent, last_flow_output};
