//! Primitives shared by every 3x3 grid in this crate, and the single win/draw check used for
//! classic boards, ultimate sub-boards and the ultimate meta-grid alike.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row, column and diagonal index triples of a row-major 3x3 grid.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A side in the game. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Player::X => "X",
            Player::O => "O",
        })
    }
}

/// A single square. Once set to `X` or `O` it never changes.
///
/// Numeric encoding (see [`Cell::code`]): `Empty = 0`, `X = 1`, `O = 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::X),
            2 => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

/// Status of a 3x3 grid. For a sub-board it is monotonic: once resolved it never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubBoardStatus {
    #[default]
    InProgress,
    Won(Player),
    Drawn,
}

impl SubBoardStatus {
    pub fn is_resolved(self) -> bool {
        self != SubBoardStatus::InProgress
    }
}

/// A square of a grid that [`grid_status`] can evaluate.
pub trait GridCell: Copy {
    /// The player owning this square, if any.
    fn owner(self) -> Option<Player>;

    /// Whether the square counts as filled when checking for a draw.
    fn is_occupied(self) -> bool;
}

impl GridCell for Cell {
    fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }

    fn is_occupied(self) -> bool {
        !self.is_empty()
    }
}

/// A drawn sub-board fills its meta-grid square without belonging to anyone.
impl GridCell for SubBoardStatus {
    fn owner(self) -> Option<Player> {
        match self {
            SubBoardStatus::Won(player) => Some(player),
            _ => None,
        }
    }

    fn is_occupied(self) -> bool {
        self.is_resolved()
    }
}

/// Evaluates a row-major 3x3 grid: a win if any line is owned by a single player, a draw if
/// every square is occupied without a winner, otherwise still in progress.
pub fn grid_status<C: GridCell>(grid: &[C; 9]) -> SubBoardStatus {
    for line in &WINNING_LINES {
        let Some(owner) = grid[line[0]].owner() else {
            continue;
        };
        if line[1..].iter().all(|&idx| grid[idx].owner() == Some(owner)) {
            return SubBoardStatus::Won(owner);
        }
    }

    if grid.iter().all(|square| square.is_occupied()) {
        SubBoardStatus::Drawn
    } else {
        SubBoardStatus::InProgress
    }
}
