//! Consensus configuration loading and validation (`.els/config.toml`).
//!
//! ## Example Config
//!
//! ```toml
//! schema_version = 1
//!
//! [vector]
//! single = "majority"
//! multi = "union"
//! boolean = "majority"
//!
//! # Per-question overrides; keys must name schema questions.
//! [vector.questions]
//! cell_types = "majority"
//!
//! [validation]
//! fail_fast = false
//! ```
//!
//! Every key is optional. A missing file yields the defaults shown above
//! (without the override).

pub mod config;
pub mod validate;

pub use config::{
    CONFIG_DIR, CONFIG_FILE, CURRENT_SCHEMA_VERSION, ConsensusConfig, ValidationConfig,
    VectorConfig,
};
pub use validate::{validate_against_schema, validate_config};
