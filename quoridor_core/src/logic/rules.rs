use crate::logic::board::{Board, Position};
use crate::logic::player::Player;
use crate::logic::wall::Wall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("{0} is not a legal destination")]
    IllegalStep(Position),
    #[error("no walls remaining")]
    NoWallsRemaining,
    #[error("wall {0} lies outside the wall lattice")]
    WallOutOfBounds(Wall),
    #[error("wall {0} overlaps or crosses a placed wall")]
    WallConflict(Wall),
    #[error("wall {0} would cut a player off from their goal")]
    WallBlocksPath(Wall),
}

/// Checks a pawn move for `mover` against the opponent's position.
pub fn is_valid_step(
    board: &Board,
    mover: &Player,
    opponent: &Player,
    to: Position,
) -> Result<(), MoveError> {
    if board
        .get_valid_moves(mover.position, opponent.position)
        .contains(&to)
    {
        Ok(())
    } else {
        Err(MoveError::IllegalStep(to))
    }
}

/// Checks a wall for the player at `mover` in `players`, including the wall budget.
pub fn is_valid_wall(
    board: &Board,
    players: &[Player],
    mover: usize,
    wall: &Wall,
) -> Result<(), MoveError> {
    if !players.get(mover).is_some_and(Player::can_place_wall) {
        return Err(MoveError::NoWallsRemaining);
    }
    board.check_wall(wall, players)
}
