//! podlink - links generated pod xcconfigs into user build configurations
//!
//! This crate provides the core library functionality for podlink: the
//! project description model, the per-configuration linking decisions, and
//! the detection of custom xcconfigs that already include the generated one.

pub mod core;
pub mod integrator;
pub mod ops;
pub mod util;

/// Test utilities for podlink unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides temporary client roots and project fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    bundle::PodBundle, project::Project, target::BuildConfiguration, target::Target,
};
pub use integrator::{integrate, IntegrateOptions, IntegrationReport, LinkOutcome, XcconfigWarning};
pub use util::context::GlobalContext;
