//! Parallel multi-agent environment API over the escape game
//!
//! Provides:
//! - Agent identities and per-agent maps
//! - `Discrete` / `MultiDiscrete` space descriptors and masked action sampling
//! - The `ParallelEnv` contract and its `EscapeEnv` implementation

pub mod agent;
pub mod errors;
pub mod escape;
pub mod spaces;
pub mod traits;

pub use agent::AgentId;
pub use errors::EnvError;
pub use escape::EscapeEnv;
pub use spaces::{Discrete, MultiDiscrete, sample_action, sample_actions};
pub use traits::{AgentMap, AgentObservation, Info, ParallelEnv, ParallelStep};
