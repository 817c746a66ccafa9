use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

use super::errors::EnvError;
use super::spaces::{Discrete, MultiDiscrete};
use crate::game::ActionMask;

/// Per-agent values, ordered by agent
pub type AgentMap<A, T> = BTreeMap<A, T>;

/// Free-form per-agent diagnostics
pub type Info = BTreeMap<String, String>;

/// What a single agent sees after reset or step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentObservation {
    /// Flat cell indices of prisoner, guard and escape cell
    pub observation: [usize; 3],
    /// Which moves are legal from here
    pub action_mask: ActionMask,
}

/// Everything a parallel step hands back, keyed by agent
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelStep<A: Ord> {
    pub observations: AgentMap<A, AgentObservation>,
    pub rewards: AgentMap<A, f32>,
    pub terminations: AgentMap<A, bool>,
    pub truncations: AgentMap<A, bool>,
    pub infos: AgentMap<A, Info>,
}

impl<A: Ord> ParallelStep<A> {
    pub fn any_terminated(&self) -> bool {
        self.terminations.values().any(|t| *t)
    }

    pub fn any_truncated(&self) -> bool {
        self.truncations.values().any(|t| *t)
    }
}

/// A multi-agent environment where every live agent acts on each step
///
/// Agents drop out of [`ParallelEnv::agents`] once they terminate or are
/// truncated; stepping with no live agents is an error until the next reset.
pub trait ParallelEnv {
    type Agent: Copy + Ord + Debug + Display;

    /// Every agent that can ever take part
    fn possible_agents(&self) -> Vec<Self::Agent>;

    /// Agents still acting in the current episode
    fn agents(&self) -> Vec<Self::Agent>;

    fn reset(
        &mut self,
        seed: Option<u64>,
    ) -> (
        AgentMap<Self::Agent, AgentObservation>,
        AgentMap<Self::Agent, Info>,
    );

    /// Apply one discrete action per live agent
    fn step(
        &mut self,
        actions: &AgentMap<Self::Agent, usize>,
    ) -> Result<ParallelStep<Self::Agent>, EnvError>;

    fn observation_space(&self, agent: Self::Agent) -> MultiDiscrete;

    fn action_space(&self, agent: Self::Agent) -> Discrete;

    /// Text picture of the current state
    fn render(&self) -> String;
}
