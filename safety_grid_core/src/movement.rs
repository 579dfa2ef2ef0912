use serde::{Deserialize, Serialize};

use crate::{EnvError, Position, map::GridGeometry};

/// The five discrete actions an agent can take.
///
/// The discriminants are the wire indices: 0 = null, 1 = right, 2 = up,
/// 3 = left, 4 = down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Null,
    Right,
    Up,
    Left,
    Down,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Null,
        Action::Right,
        Action::Up,
        Action::Left,
        Action::Down,
    ];

    pub fn from_index(index: usize) -> Result<Self, EnvError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(EnvError::InvalidAction(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit vector for this action. `Up` is `+y`, `Down` is `-y`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Null => (0, 0),
            Action::Right => (1, 0),
            Action::Up => (0, 1),
            Action::Left => (-1, 0),
            Action::Down => (0, -1),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Action::Null => Action::Null,
            Action::Right => Action::Left,
            Action::Up => Action::Down,
            Action::Left => Action::Right,
            Action::Down => Action::Up,
        }
    }

    /// The action that moves from `src` to an orthogonally adjacent `dst`.
    pub fn between(src: Position, dst: Position) -> Option<Self> {
        let dx = dst.x as isize - src.x as isize;
        let dy = dst.y as isize - src.y as isize;
        Self::ALL.into_iter().find(|a| a.delta() == (dx, dy))
    }
}

impl TryFrom<usize> for Action {
    type Error = EnvError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::from_index(index)
    }
}

/// Shifts `pos` by `delta`, clamping each coordinate into the board.
pub fn offset(pos: Position, delta: (isize, isize), geometry: &GridGeometry) -> Position {
    let max = geometry.size() - 1;
    Position {
        x: pos.x.saturating_add_signed(delta.0).min(max),
        y: pos.y.saturating_add_signed(delta.1).min(max),
    }
}

/// Candidate cell for an agent at `pos` taking `action`.
///
/// Only the board edge is applied here; walls and entities are left to the
/// scenario rules.
pub fn resolve(pos: Position, action: Action, geometry: &GridGeometry) -> Position {
    offset(pos, action.delta(), geometry)
}

/// L1 distance between two cells.
pub fn manhattan(a: Position, b: Position) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
