//! Core utilities for Pantry
//!
//! This crate provides shared functionality used by the library crates and
//! the CLI:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Sessions**: Token store for admin sessions with expiry and sweeping
//!
//! # Example
//!
//! ```rust,no_run
//! use pantry_core::{config::Config, session::{SessionPolicy, SessionStore}};
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! let sessions = SessionStore::new(SessionPolicy::from(&config.schema.session));
//!
//! let session = sessions.issue("admin");
//! println!("token {} valid until {}", session.token, session.expires_at);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod session;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::session::{Session, SessionError, SessionPolicy, SessionStore};
}
