//! Shared foundation for the pairwise aligner crates: errors, numeric
//! defaults, and an opt-in tracing initializer.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{default_config, load_defaults, save_defaults, AlignerDefaults, GapDefaults};
pub use error::{AlignError, AlignResult, AlignWarning};
pub use logging::init_tracing;
