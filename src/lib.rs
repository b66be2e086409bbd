//! Infra Stack - Deterministic Resource Naming
//!
//! # Ground Rules
//! 1. Names Are Total: every candidate sanitizes to a valid name
//! 2. Context Is Explicit: account and region are parameters, never ambient
//! 3. Descriptors Are Data: resources carry no behavior
//! 4. Deterministic Output: same inputs, same template, same hash

pub mod naming;
pub mod context;
pub mod config;
pub mod resources;
pub mod hashing;
pub mod synth;

pub use naming::{sanitize, check_name, is_valid_name, SanitizedName, NameCheck, NameViolation};
pub use context::{DeploymentContext, ContextSource};
pub use config::{StackConfig, ConfigError};
pub use resources::{Resource, LogicalId};
pub use hashing::{canonical_json, compute_template_hash};
pub use synth::{StackProps, StackSynthesizer, SynthesizedStack, SynthError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
