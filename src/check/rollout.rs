//! Random-policy rollout that exercises the parallel environment contract
//!
//! Every step is driven by masked uniform sampling and checked against the
//! declared spaces and agent bookkeeping rules. The first failure is returned.

use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::env::{AgentMap, AgentObservation, EnvError, ParallelEnv, ParallelStep, sample_actions};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("agent '{agent}' is live but not a possible agent")]
    UnknownAgent { agent: String },
    #[error("step {step}: no observation for live agent '{agent}'")]
    MissingObservation { step: u64, agent: String },
    #[error("step {step}: observation {observation:?} for '{agent}' is outside its space")]
    ObservationOutOfSpace {
        step: u64,
        agent: String,
        observation: Vec<usize>,
    },
    #[error("step {step}: action mask for '{agent}' has {mask_len} entries, action space has {n}")]
    MaskMismatch {
        step: u64,
        agent: String,
        mask_len: usize,
        n: usize,
    },
    #[error("step {step}: {field} has no entry for acting agent '{agent}'")]
    MissingEntry {
        step: u64,
        agent: String,
        field: &'static str,
    },
    #[error("step {step}: reward {reward} for '{agent}' is not finite")]
    NonFiniteReward { step: u64, agent: String, reward: f32 },
    #[error("step {step}: agents list is inconsistent: {detail}")]
    AgentsInconsistent { step: u64, detail: String },
    #[error("resetting twice with seed {0} gave different observations")]
    NotReproducible(u64),
    #[error("stepping a finished episode returned {0}")]
    FinishedEpisodeAccepted(String),
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Tally of a successful check
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckReport {
    pub steps: u64,
    pub episodes: u64,
    pub terminated_episodes: u64,
    pub truncated_episodes: u64,
    /// Summed rewards per agent across the whole rollout
    pub total_rewards: BTreeMap<String, f64>,
}

impl CheckReport {
    pub fn format_summary(&self) -> String {
        let rewards: Vec<String> = self
            .total_rewards
            .iter()
            .map(|(agent, total)| format!("{agent}={total}"))
            .collect();
        format!(
            "{} steps, {} episodes ({} terminated, {} truncated), total rewards: {}",
            self.steps,
            self.episodes,
            self.terminated_episodes,
            self.truncated_episodes,
            rewards.join(" ")
        )
    }
}

/// Run `cycles` steps of random legal play against `env`
pub fn api_check<E: ParallelEnv>(
    env: &mut E,
    cycles: u64,
    seed: u64,
) -> Result<CheckReport, CheckError> {
    let possible = env.possible_agents();

    let (first, _) = env.reset(Some(seed));
    let (second, _) = env.reset(Some(seed));
    if first != second {
        return Err(CheckError::NotReproducible(seed));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = CheckReport::default();
    let mut reset_guard_checked = false;
    let (mut observations, _) = env.reset(Some(seed));

    for step in 0..cycles {
        let live = env.agents();
        for agent in &live {
            if !possible.contains(agent) {
                return Err(CheckError::UnknownAgent {
                    agent: agent.to_string(),
                });
            }
            check_observation(env, &observations, *agent, step)?;
        }

        let actions = sample_actions(env, &observations, &mut rng);

        let result = env.step(&actions)?;
        report.steps += 1;
        check_step_result(env, &result, &live, step, &mut report)?;

        observations = result.observations;

        if env.agents().is_empty() {
            report.episodes += 1;
            if result.terminations.values().any(|t| *t) {
                report.terminated_episodes += 1;
            } else {
                report.truncated_episodes += 1;
            }

            if !reset_guard_checked {
                match env.step(&actions) {
                    Err(EnvError::NeedsReset) => {}
                    other => return Err(CheckError::FinishedEpisodeAccepted(format!("{other:?}"))),
                }
                reset_guard_checked = true;
            }

            debug!(step, episodes = report.episodes, "episode ended, resetting");
            observations = env.reset(None).0;
        }
    }

    info!(
        steps = report.steps,
        episodes = report.episodes,
        "parallel api check passed"
    );
    Ok(report)
}

fn check_observation<E: ParallelEnv>(
    env: &E,
    observations: &AgentMap<E::Agent, AgentObservation>,
    agent: E::Agent,
    step: u64,
) -> Result<(), CheckError> {
    let obs = observations
        .get(&agent)
        .ok_or_else(|| CheckError::MissingObservation {
            step,
            agent: agent.to_string(),
        })?;

    if !env.observation_space(agent).contains(&obs.observation) {
        return Err(CheckError::ObservationOutOfSpace {
            step,
            agent: agent.to_string(),
            observation: obs.observation.to_vec(),
        });
    }

    let n = env.action_space(agent).n;
    if obs.action_mask.len() != n {
        return Err(CheckError::MaskMismatch {
            step,
            agent: agent.to_string(),
            mask_len: obs.action_mask.len(),
            n,
        });
    }

    Ok(())
}

fn check_step_result<E: ParallelEnv>(
    env: &E,
    result: &ParallelStep<E::Agent>,
    acting: &[E::Agent],
    step: u64,
    report: &mut CheckReport,
) -> Result<(), CheckError> {
    let now_live = env.agents();

    for agent in acting {
        let missing = |field: &'static str| CheckError::MissingEntry {
            step,
            agent: agent.to_string(),
            field,
        };

        let reward = *result.rewards.get(agent).ok_or_else(|| missing("rewards"))?;
        let terminated = *result
            .terminations
            .get(agent)
            .ok_or_else(|| missing("terminations"))?;
        let truncated = *result
            .truncations
            .get(agent)
            .ok_or_else(|| missing("truncations"))?;
        result.infos.get(agent).ok_or_else(|| missing("infos"))?;

        if !reward.is_finite() {
            return Err(CheckError::NonFiniteReward {
                step,
                agent: agent.to_string(),
                reward,
            });
        }
        *report
            .total_rewards
            .entry(agent.to_string())
            .or_insert(0.0) += f64::from(reward);

        let still_live = now_live.contains(agent);
        if still_live == (terminated || truncated) {
            return Err(CheckError::AgentsInconsistent {
                step,
                detail: format!(
                    "'{agent}' live={still_live} but terminated={terminated} truncated={truncated}"
                ),
            });
        }

        if still_live && !result.observations.contains_key(agent) {
            return Err(missing("observations"));
        }
    }

    if let Some(newcomer) = now_live.iter().find(|agent| !acting.contains(agent)) {
        return Err(CheckError::AgentsInconsistent {
            step,
            detail: format!("'{newcomer}' joined mid-episode"),
        });
    }

    Ok(())
}
