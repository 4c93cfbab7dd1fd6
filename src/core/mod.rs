//! Configuration, shared models and secret access

pub mod config;
pub mod models;
pub mod secrets;
