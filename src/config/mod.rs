//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or code
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → DocConfig handed to the recorder at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the recorder is never toggled at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::DocConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
pub use schema::TimeoutConfig;
