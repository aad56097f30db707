//! Common library for the salon booking client
//!
//! This crate provides functionality shared by the client crates: layered
//! configuration, durable token storage and the related error types.
//!
//! ```rust,no_run
//! use common::{ClientConfig, FileTokenStorage, TokenStorage};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let storage = FileTokenStorage::new(&config.token_path);
//!     let token = storage.load()?;
//!     println!("Stored token present: {}", token.is_some());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::ClientConfig;
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
