use super::agent::AgentId;
use super::errors::EnvError;
use super::spaces::{Discrete, MultiDiscrete};
use super::traits::{AgentMap, AgentObservation, Info, ParallelEnv, ParallelStep};
use crate::game::{EscapeConfig, EscapeEngine, GameState, Move, Outcome};
use crate::render::render_text;

/// Prisoner-and-guard escape game behind the parallel environment API
///
/// - Observation: `[prisoner, guard, escape]` flat cell indices plus an action mask
/// - Action space: `Discrete(4)` (0 left, 1 right, 2 down, 3 up)
/// - Both agents leave the episode together on escape, capture or timeout
pub struct EscapeEnv {
    engine: EscapeEngine,
    state: GameState,
    agents: Vec<AgentId>,
}

impl EscapeEnv {
    /// Create an environment seeded from OS entropy
    pub fn new(config: EscapeConfig) -> Self {
        Self::build(EscapeEngine::new(config, None))
    }

    /// Create an environment whose episodes are reproducible from `seed`
    pub fn with_seed(config: EscapeConfig, seed: u64) -> Self {
        Self::build(EscapeEngine::new(config, Some(seed)))
    }

    /// Validate `config` before building; `None` seeds from OS entropy
    pub fn try_new(config: EscapeConfig, seed: Option<u64>) -> Result<Self, EnvError> {
        config.validate().map_err(EnvError::InvalidConfig)?;
        Ok(Self::build(EscapeEngine::new(config, seed)))
    }

    fn build(mut engine: EscapeEngine) -> Self {
        let state = engine.reset();
        Self {
            engine,
            state,
            agents: AgentId::ALL.to_vec(),
        }
    }

    /// Get reference to current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EscapeConfig {
        self.engine.config()
    }

    /// Observation for one agent in the current state
    pub fn observe(&self, agent: AgentId) -> AgentObservation {
        let action_mask = match agent {
            AgentId::Prisoner => EscapeEngine::prisoner_mask(&self.state),
            AgentId::Guard => EscapeEngine::guard_mask(&self.state),
        };
        AgentObservation {
            observation: self.state.observation(),
            action_mask,
        }
    }

    fn observe_all(&self) -> AgentMap<AgentId, AgentObservation> {
        AgentId::ALL
            .into_iter()
            .map(|agent| (agent, self.observe(agent)))
            .collect()
    }

    fn resolve_move(
        &self,
        actions: &AgentMap<AgentId, usize>,
        agent: AgentId,
    ) -> Result<Move, EnvError> {
        let action = *actions
            .get(&agent)
            .ok_or_else(|| EnvError::MissingAction(agent.to_string()))?;

        Move::from_index(action).ok_or_else(|| EnvError::InvalidAction {
            agent: agent.to_string(),
            action,
        })
    }
}

impl Default for EscapeEnv {
    fn default() -> Self {
        Self::new(EscapeConfig::default())
    }
}

impl ParallelEnv for EscapeEnv {
    type Agent = AgentId;

    fn possible_agents(&self) -> Vec<AgentId> {
        AgentId::ALL.to_vec()
    }

    fn agents(&self) -> Vec<AgentId> {
        self.agents.clone()
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
    ) -> (AgentMap<AgentId, AgentObservation>, AgentMap<AgentId, Info>) {
        if let Some(seed) = seed {
            self.engine.reseed(seed);
        }
        self.state = self.engine.reset();
        self.agents = self.possible_agents();

        let infos = AgentId::ALL
            .into_iter()
            .map(|agent| (agent, Info::new()))
            .collect();
        (self.observe_all(), infos)
    }

    fn step(
        &mut self,
        actions: &AgentMap<AgentId, usize>,
    ) -> Result<ParallelStep<AgentId>, EnvError> {
        if self.agents.is_empty() {
            return Err(EnvError::NeedsReset);
        }

        let prisoner = self.resolve_move(actions, AgentId::Prisoner)?;
        let guard = self.resolve_move(actions, AgentId::Guard)?;

        let result = self.engine.step(&mut self.state, prisoner, guard);
        if result.outcome.is_over() {
            self.agents.clear();
        }

        let terminated = result.outcome.is_terminal();
        let truncated = result.outcome.is_truncated();

        let mut rewards = AgentMap::new();
        rewards.insert(AgentId::Prisoner, result.prisoner_reward);
        rewards.insert(AgentId::Guard, result.guard_reward);

        let infos = AgentId::ALL
            .into_iter()
            .map(|agent| {
                let mut info = Info::new();
                if result.outcome != Outcome::Running {
                    info.insert("outcome".to_string(), result.outcome.as_str().to_string());
                }
                (agent, info)
            })
            .collect();

        Ok(ParallelStep {
            observations: self.observe_all(),
            rewards,
            terminations: AgentId::ALL.into_iter().map(|a| (a, terminated)).collect(),
            truncations: AgentId::ALL.into_iter().map(|a| (a, truncated)).collect(),
            infos,
        })
    }

    fn observation_space(&self, _agent: AgentId) -> MultiDiscrete {
        MultiDiscrete::new(vec![self.config().num_cells(); 3])
    }

    fn action_space(&self, _agent: AgentId) -> Discrete {
        Discrete::new(Move::COUNT)
    }

    fn render(&self) -> String {
        render_text(&self.state)
    }
}
