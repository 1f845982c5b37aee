//! High-level operations.
//!
//! This module contains the implementation of podlink commands.

pub mod integrate;
pub mod status;

pub use integrate::{bundle_from_config, integrate_project, IntegrateResult};
pub use status::{status, ConfigurationStatus, LinkState};
