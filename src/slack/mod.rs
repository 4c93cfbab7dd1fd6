//! All Slack-specific functionality

pub mod client;

pub use client::{ChatPoster, SlackClient};
