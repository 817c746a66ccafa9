/// A single grid move. The discriminant is the discrete action index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    /// x - 1
    Left = 0,
    /// x + 1
    Right = 1,
    /// y - 1
    Down = 2,
    /// y + 1
    Up = 3,
}

impl Move {
    /// Every move, ordered by action index
    pub const ALL: [Move; 4] = [Move::Left, Move::Right, Move::Down, Move::Up];

    /// Number of discrete actions
    pub const COUNT: usize = 4;

    /// Convert a discrete action index to a move
    ///
    /// Returns `None` for indices outside `0..4`.
    pub fn from_index(idx: usize) -> Option<Move> {
        Self::ALL.get(idx).copied()
    }

    /// The discrete action index of this move
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the delta (dx, dy) for this move
    pub fn delta(self) -> (i32, i32) {
        match self {
            Move::Left => (-1, 0),
            Move::Right => (1, 0),
            Move::Down => (0, -1),
            Move::Up => (0, 1),
        }
    }
}

/// Per-move legality flags, indexed by [`Move::index`]. 1 = legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionMask(pub [u8; Move::COUNT]);

impl ActionMask {
    /// A mask with every move legal
    pub fn all() -> Self {
        Self([1; Move::COUNT])
    }

    pub fn allows(&self, mv: Move) -> bool {
        self.0[mv.index()] == 1
    }

    /// Legal moves in action-index order
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|mv| self.allows(*mv)).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
