//! Terminal helpers for the Pantry CLI
//!
//! Provides shared CLI functionality:
//! - Status messages and error reports
//! - Match report tables
//! - Progress indicators for batch matching

#![warn(missing_docs)]

pub mod output;
pub mod progress;
