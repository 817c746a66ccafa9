use super::{
    action::{ActionMask, Move},
    config::EscapeConfig,
    state::{GameState, Outcome, Position},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub prisoner_reward: f32,
    pub guard_reward: f32,
    pub outcome: Outcome,
}

/// The game engine that handles all game logic
pub struct EscapeEngine {
    config: EscapeConfig,
    rng: StdRng,
}

impl EscapeEngine {
    /// Create a new engine; `None` seeds from OS entropy
    ///
    /// `config` is expected to pass [`EscapeConfig::validate`].
    pub fn new(config: EscapeConfig, seed: Option<u64>) -> Self {
        debug_assert!(config.validate().is_ok(), "unplayable config: {config:?}");
        Self {
            config,
            rng: make_rng(seed),
        }
    }

    pub fn config(&self) -> &EscapeConfig {
        &self.config
    }

    /// Replace the random source
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Reset the game to its initial state
    ///
    /// The prisoner starts at the origin, the guard in the
    /// opposite corner, and the escape cell is drawn from the configured range.
    pub fn reset(&mut self) -> GameState {
        let last = self.config.grid_size - 1;
        let range = self.config.escape_min..=self.config.escape_max;
        let escape = Position::new(
            self.rng.gen_range(range.clone()),
            self.rng.gen_range(range),
        );

        debug!(x = escape.x, y = escape.y, "escape cell placed");

        GameState::new(
            Position::new(0, 0),
            Position::new(last, last),
            escape,
            self.config.grid_size,
        )
    }

    /// Execute one simultaneous step
    ///
    /// Moves that would leave the grid are ignored, as are guard moves onto the
    /// escape cell. Escape is checked before capture.
    pub fn step(&self, state: &mut GameState, prisoner: Move, guard: Move) -> StepResult {
        if state.outcome.is_over() {
            return StepResult {
                prisoner_reward: 0.0,
                guard_reward: 0.0,
                outcome: state.outcome,
            };
        }

        if let Some(next) = state.prisoner.moved(prisoner, state.grid_size) {
            state.prisoner = next;
        }

        if let Some(next) = state
            .guard
            .moved(guard, state.grid_size)
            .filter(|next| *next != state.escape)
        {
            state.guard = next;
        }

        let (outcome, prisoner_reward, guard_reward) = if state.prisoner_escaped() {
            (
                Outcome::Escaped,
                self.config.win_reward,
                self.config.lose_reward,
            )
        } else if state.prisoner_captured() {
            (
                Outcome::Captured,
                self.config.lose_reward,
                self.config.win_reward,
            )
        } else if state.timestep > self.config.max_cycles {
            (Outcome::TimedOut, 0.0, 0.0)
        } else {
            (Outcome::Running, 0.0, 0.0)
        };

        state.outcome = outcome;
        state.timestep += 1;

        if outcome.is_over() {
            debug!(
                outcome = outcome.as_str(),
                timestep = state.timestep,
                "episode finished"
            );
        }

        StepResult {
            prisoner_reward,
            guard_reward,
            outcome,
        }
    }

    /// Prisoner may take any move that stays on the grid
    pub fn prisoner_mask(state: &GameState) -> ActionMask {
        let mut mask = ActionMask::default();
        for mv in Move::ALL {
            if state.prisoner.moved(mv, state.grid_size).is_some() {
                mask.0[mv.index()] = 1;
            }
        }
        mask
    }

    /// Guard may take any move that stays on the grid and avoids the escape cell
    pub fn guard_mask(state: &GameState) -> ActionMask {
        let mut mask = ActionMask::default();
        for mv in Move::ALL {
            let next = state.guard.moved(mv, state.grid_size);
            if next.is_some_and(|next| next != state.escape) {
                mask.0[mv.index()] = 1;
            }
        }
        mask
    }
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(prisoner: (usize, usize), guard: (usize, usize), escape: (usize, usize)) -> GameState {
        GameState::new(
            Position::new(prisoner.0, prisoner.1),
            Position::new(guard.0, guard.1),
            Position::new(escape.0, escape.1),
            7,
        )
    }

    #[test]
    fn test_reset() {
        let mut engine = EscapeEngine::new(EscapeConfig::default(), Some(7));
        let state = engine.reset();

        assert_eq!(state.prisoner, Position::new(0, 0));
        assert_eq!(state.guard, Position::new(6, 6));
        assert!((2..=4).contains(&state.escape.x));
        assert!((2..=4).contains(&state.escape.y));
        assert_eq!(state.timestep, 0);
        assert_eq!(state.outcome, Outcome::Running);
    }

    #[test]
    fn test_seeded_reset_is_reproducible() {
        let mut a = EscapeEngine::new(EscapeConfig::default(), Some(42));
        let mut b = EscapeEngine::new(EscapeConfig::default(), Some(42));
        for _ in 0..10 {
            assert_eq!(a.reset().escape, b.reset().escape);
        }
    }

    #[test]
    fn test_basic_movement() {
        let engine = EscapeEngine::new(EscapeConfig::default(), Some(0));
        let mut state = state_with((0, 0), (6, 6), (3, 3));

        let result = engine.step(&mut state, Move::Right, Move::Down);

        assert_eq!(result.outcome, Outcome::Running);
        assert_eq!(state.prisoner, Position::new(1, 0));
        assert_eq!(state.guard, Position::new(6, 5));
        assert_eq!(state.timestep, 1);
    }

    #[test]
    fn test_moves_off_grid_are_ignored() {
        let engine = EscapeEngine::new(EscapeConfig::default(), Some(0));
        let mut state = state_with((0, 0), (6, 6), (3, 3));

        engine.step(&mut state, Move::Left, Move::Up);
        assert_eq!(state.prisoner, Position::new(0, 0));
        assert_eq!(state.guard, Position::new(6, 6));

        engine.step(&mut state, Move::Down, Move::Right);
        assert_eq!(state.prisoner, Position::new(0, 0));
        assert_eq!(state.guard, Position::new(6, 6));
    }

    #[test]
    fn test_guard_cannot_enter_escape_cell() {
        let engine = EscapeEngine::new(EscapeConfig::default(), Some(0));
        let mut state = state_with((0, 0), (4, 3), (3, 3));

        engine.step(&mut state, Move::Up, Move::Left);

        assert_eq!(state.guard, Position::new(4, 3));
    }

    #[test]
    fn test_escape() {
        let engine = EscapeEngine::new(EscapeConfig::default(), Some(0));
        let mut state = state_with((2, 3), (6, 6), (3, 3));

        let result = engine.step(&mut state, Move::Right, Move::Left);

        assert_eq!(result.outcome, Outcome::Escaped);
        assert_eq!(result.prisoner_reward, 1.0);
        assert_eq!(result.guard_reward, -1.0);
    }

    #[test]
    fn test_capture() {
        let engine = EscapeEngine::new(EscapeConfig::default(), Some(0));
        let mut state = state_with((1, 1), (3, 1), (4, 4));

        let result = engine.step(&mut state, Move::Right, Move::Left);

        assert_eq!(state.prisoner, state.guard);
        assert_eq!(result.outcome, Outcome::Captured);
        assert_eq!(result.prisoner_reward, -1.0);
        assert_eq!(result.guard_reward, 1.0);
    }

    #[test]
    fn test_timeout_after_max_cycles() {
        let config = EscapeConfig {
            max_cycles: 3,
            ..Default::default()
        };
        let engine = EscapeEngine::new(config, Some(0));
        let mut state = state_with((0, 0), (6, 6), (3, 3));

        // Both agents push into walls, so nobody moves
        let mut outcomes = Vec::new();
        for _ in 0..5 {
            outcomes.push(engine.step(&mut state, Move::Left, Move::Up).outcome);
        }

        assert_eq!(&outcomes[..4], &[Outcome::Running; 4]);
        assert_eq!(outcomes[4], Outcome::TimedOut);
        assert_eq!(state.timestep, 5);
    }

    #[test]
    fn test_finished_game_no_update() {
        let engine = EscapeEngine::new(EscapeConfig::default(), Some(0));
        let mut state = state_with((2, 3), (6, 6), (3, 3));
        engine.step(&mut state, Move::Right, Move::Left);
        let before = state.clone();

        let result = engine.step(&mut state, Move::Up, Move::Left);

        assert_eq!(result.outcome, Outcome::Escaped);
        assert_eq!(result.prisoner_reward, 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_prisoner_mask() {
        let corner = state_with((0, 0), (6, 6), (3, 3));
        assert_eq!(EscapeEngine::prisoner_mask(&corner), ActionMask([0, 1, 0, 1]));

        let centre = state_with((3, 2), (6, 6), (3, 3));
        assert_eq!(EscapeEngine::prisoner_mask(&centre), ActionMask::all());

        let far = state_with((6, 6), (0, 0), (3, 3));
        assert_eq!(EscapeEngine::prisoner_mask(&far), ActionMask([1, 0, 1, 0]));
    }

    #[test]
    fn test_guard_mask() {
        // Escape to the guard's left
        let state = state_with((0, 0), (4, 3), (3, 3));
        assert_eq!(EscapeEngine::guard_mask(&state), ActionMask([0, 1, 1, 1]));

        // Escape above, guard on the right wall
        let state = state_with((0, 0), (6, 2), (6, 3));
        assert_eq!(EscapeEngine::guard_mask(&state), ActionMask([1, 0, 1, 0]));
    }
}
