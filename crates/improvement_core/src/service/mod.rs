//! Core use-case services.
//!
//! # Responsibility
//! - Turn use-case calls into store commands and persistence calls.
//! - Keep CLI/UI layers decoupled from the store and storage details.

pub mod improvement_service;
pub mod metric_service;
