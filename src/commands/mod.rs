//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - estimate: basic, advanced and targets calculators
//! - catalog: list models, presets and context windows
//! - tokens: estimate prompt length from sample text
//! - subscribe: request the pricing guide by email
//! - config: configuration display and validation

pub mod catalog;
pub mod config;
pub mod estimate;
pub mod report;
pub mod subscribe;
pub mod tokens;
