use super::{BoardSnapshot, UltimateBoard};
use crate::boards::grid::Player;

/// Every sub-board but the bottom-right one is decided and X holds the main diagonal's first
/// two squares. With X to move, only `(2,2)/(0,2)` wins; the other two cells of the last
/// sub-board can be blocked by O.
pub(crate) const ONE_WINNING_MOVE: &str = "
    XXX OOO OOO
    OO. XX. XX.
    ... ... ...
    OOO XXX XXX
    XX. OO. OO.
    ... ... ...
    XXX OOO XX.
    OO. XX. OOX
    ... ... ..O";

pub(crate) fn board_from_layout(
    layout: &str,
    current_player: Player,
    forced_board: Option<usize>,
) -> UltimateBoard {
    let snapshot = BoardSnapshot::from_layout(layout, current_player, forced_board).unwrap();
    UltimateBoard::from_snapshot(&snapshot).unwrap()
}
