//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, APP_ENVIRONMENT override)
//!     → validation.rs (semantic checks)
//!     → DispatcherConfig (validated, immutable)
//!     → handed to Dispatcher at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::DispatcherConfig;
pub use schema::Environment;
pub use schema::HttpClientConfig;
pub use schema::ObservabilityConfig;
pub use schema::RawSocketConfig;
pub use schema::TimeoutConfig;
pub use schema::TlsConfig;
