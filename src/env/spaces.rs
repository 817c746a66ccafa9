//! Observation and action space descriptors

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::traits::{AgentMap, AgentObservation, ParallelEnv};
use crate::game::ActionMask;

/// A single discrete value in `0..n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }

    pub fn contains(&self, value: usize) -> bool {
        value < self.n
    }
}

/// A vector of discrete values, the i-th one in `0..nvec[i]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDiscrete {
    pub nvec: Vec<usize>,
}

impl MultiDiscrete {
    pub fn new(nvec: Vec<usize>) -> Self {
        Self { nvec }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        self.nvec.iter().map(|&n| rng.gen_range(0..n)).collect()
    }

    pub fn contains(&self, value: &[usize]) -> bool {
        value.len() == self.nvec.len() && value.iter().zip(&self.nvec).all(|(v, n)| v < n)
    }

    pub fn len(&self) -> usize {
        self.nvec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nvec.is_empty()
    }
}

/// Pick an action from `space`, uniformly among those the mask allows
///
/// Falls back to the whole space when no mask is given or nothing is legal.
pub fn sample_action<R: Rng + ?Sized>(
    space: &Discrete,
    mask: Option<&ActionMask>,
    rng: &mut R,
) -> usize {
    let legal: Vec<usize> = match mask {
        Some(mask) => mask
            .0
            .iter()
            .enumerate()
            .filter(|(idx, flag)| **flag == 1 && space.contains(*idx))
            .map(|(idx, _)| idx)
            .collect(),
        None => Vec::new(),
    };

    if legal.is_empty() {
        space.sample(rng)
    } else {
        legal[rng.gen_range(0..legal.len())]
    }
}

/// One masked random action for every live agent of `env`
pub fn sample_actions<E: ParallelEnv, R: Rng + ?Sized>(
    env: &E,
    observations: &AgentMap<E::Agent, AgentObservation>,
    rng: &mut R,
) -> AgentMap<E::Agent, usize> {
    env.agents()
        .into_iter()
        .map(|agent| {
            let space = env.action_space(agent);
            let mask = observations.get(&agent).map(|obs| &obs.action_mask);
            (agent, sample_action(&space, mask, rng))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{AgentId, EscapeEnv};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_discrete() {
        let mut rng = StdRng::seed_from_u64(42);
        let space = Discrete::new(4);
        for _ in 0..100 {
            assert!(space.contains(space.sample(&mut rng)));
        }
        assert!(!space.contains(4));
    }

    #[test]
    fn test_multi_discrete() {
        let mut rng = StdRng::seed_from_u64(123);
        let space = MultiDiscrete::new(vec![49; 3]);
        for _ in 0..100 {
            let value = space.sample(&mut rng);
            assert_eq!(value.len(), 3);
            assert!(space.contains(&value));
        }

        assert!(space.contains(&[0, 48, 23]));
        assert!(!space.contains(&[0, 49, 23]));
        assert!(!space.contains(&[0, 1]));
    }

    #[test]
    fn test_sample_action_respects_mask() {
        let mut rng = StdRng::seed_from_u64(7);
        let space = Discrete::new(4);
        let mask = ActionMask([0, 1, 0, 1]);

        for _ in 0..200 {
            let action = sample_action(&space, Some(&mask), &mut rng);
            assert!(action == 1 || action == 3);
        }
    }

    #[test]
    fn test_sample_action_empty_mask_falls_back() {
        let mut rng = StdRng::seed_from_u64(7);
        let space = Discrete::new(4);
        let mask = ActionMask([0, 0, 0, 0]);

        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[sample_action(&space, Some(&mask), &mut rng)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_sample_actions_covers_live_agents() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut env = EscapeEnv::default();
        let (obs, _) = env.reset(Some(5));

        let actions = sample_actions(&env, &obs, &mut rng);

        assert_eq!(actions.len(), 2);
        // Prisoner starts in the corner: only right (1) or up (3)
        let prisoner = actions[&AgentId::Prisoner];
        assert!(prisoner == 1 || prisoner == 3);
    }
}
