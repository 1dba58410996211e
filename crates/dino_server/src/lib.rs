//! # Dino Extinction Server
//!
//! Service layer around the battle engine.
//!
//! Serializes commands per battle so concurrent requests cannot lose
//! updates, loads configuration, and drives battles over a JSON-lines
//! protocol on stdin/stdout.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod driver;
pub mod protocol;
pub mod service;

pub use config::{ConfigError, ServerConfig};
pub use protocol::{Request, Response};
pub use service::{BattleService, CreatedBattle};
