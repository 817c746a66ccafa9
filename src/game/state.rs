use super::action::Move;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell in `mv`'s direction, or `None` if it would leave a
    /// `grid_size` x `grid_size` grid
    pub fn moved(&self, mv: Move, grid_size: usize) -> Option<Self> {
        let (dx, dy) = mv.delta();
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        (x < grid_size && y < grid_size).then_some(Self { x, y })
    }

    /// Flat cell index, `x + grid_size * y`
    pub fn flat_index(&self, grid_size: usize) -> usize {
        self.x + grid_size * self.y
    }
}

/// How an episode stands after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Running,
    /// Prisoner reached the escape cell
    Escaped,
    /// Guard caught the prisoner
    Captured,
    /// Cycle limit exceeded
    TimedOut,
}

impl Outcome {
    /// Terminal for both agents (not a truncation)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Escaped | Outcome::Captured)
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Outcome::TimedOut)
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Running => "running",
            Outcome::Escaped => "escaped",
            Outcome::Captured => "captured",
            Outcome::TimedOut => "timed out",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub prisoner: Position,
    pub guard: Position,
    pub escape: Position,
    pub grid_size: usize,
    pub timestep: usize,
    pub outcome: Outcome,
}

impl GameState {
    /// Create a new game state at timestep 0
    pub fn new(prisoner: Position, guard: Position, escape: Position, grid_size: usize) -> Self {
        Self {
            prisoner,
            guard,
            escape,
            grid_size,
            timestep: 0,
            outcome: Outcome::Running,
        }
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x < self.grid_size && pos.y < self.grid_size
    }

    pub fn prisoner_escaped(&self) -> bool {
        self.prisoner == self.escape
    }

    pub fn prisoner_captured(&self) -> bool {
        self.prisoner == self.guard
    }

    /// Flat indices of prisoner, guard and escape cell
    pub fn observation(&self) -> [usize; 3] {
        [
            self.prisoner.flat_index(self.grid_size),
            self.guard.flat_index(self.grid_size),
            self.escape.flat_index(self.grid_size),
        ]
    }
}
