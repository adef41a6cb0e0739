//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs overrides (positional subdomain/token, -p, -i, -c)
//!     → validation.rs (semantic checks)
//!     → SlackinConfig (validated, immutable)
//!     → handed to startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{finalize, load_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, RefreshConfig, SlackConfig, SlackinConfig,
    TimeoutConfig,
};
