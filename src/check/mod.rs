//! Conformance rollout for parallel environments

pub mod rollout;

pub use rollout::{CheckError, CheckReport, api_check};
