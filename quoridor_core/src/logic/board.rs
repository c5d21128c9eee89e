use crate::logic::player::Player;
use crate::logic::rules::MoveError;
use crate::logic::wall::{Orientation, Wall};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

pub const BOARD_SIZE: u8 = 9;
pub const WALL_LATTICE: u8 = BOARD_SIZE - 1;
pub const CELL_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

// up, down, left, right
const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_index(idx: usize) -> Self {
        Self::new(
            (idx / BOARD_SIZE as usize) as u8,
            (idx % BOARD_SIZE as usize) as u8,
        )
    }

    /// The neighbouring cell in direction `(dr, dc)`, or `None` off the board.
    #[must_use]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let pos = Self::new(row, col);
        pos.in_bounds().then_some(pos)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'a' + self.col), self.row + 1)
    }
}

/// Blocked edges as two bitboards, one bit per cell.
///
/// `south` bit `i` is set when the edge below cell `i` is walled, `east` bit `i`
/// when the edge to its right is. Kept in sync with the wall list so every
/// movement query is a single mask test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeMask {
    south: u128,
    east: u128,
}

impl EdgeMask {
    const fn wall_bits(wall: &Wall) -> (u128, u128) {
        let anchor = Position::new(wall.row, wall.col).index();
        match wall.orientation {
            Orientation::Horizontal => ((1u128 << anchor) | (1u128 << (anchor + 1)), 0),
            Orientation::Vertical => (
                0,
                (1u128 << anchor) | (1u128 << (anchor + BOARD_SIZE as usize)),
            ),
        }
    }

    pub fn add(&mut self, wall: &Wall) {
        let (south, east) = Self::wall_bits(wall);
        self.south |= south;
        self.east |= east;
    }

    pub fn remove(&mut self, wall: &Wall) {
        let (south, east) = Self::wall_bits(wall);
        self.south &= !south;
        self.east &= !east;
    }

    #[must_use]
    pub fn with_wall(mut self, wall: &Wall) -> Self {
        self.add(wall);
        self
    }

    #[must_use]
    pub const fn is_blocked(&self, from: Position, to: Position) -> bool {
        if from.col == to.col && from.row.abs_diff(to.row) == 1 {
            let upper = if from.row < to.row { from } else { to };
            self.south & (1u128 << upper.index()) != 0
        } else if from.row == to.row && from.col.abs_diff(to.col) == 1 {
            let left = if from.col < to.col { from } else { to };
            self.east & (1u128 << left.index()) != 0
        } else {
            false
        }
    }

    /// One orthogonal step, if it stays on the board and no wall is in the way.
    fn step(&self, from: Position, dr: i8, dc: i8) -> Option<Position> {
        let to = from.offset(dr, dc)?;
        (!self.is_blocked(from, to)).then_some(to)
    }

    fn neighbors(self, from: Position) -> impl Iterator<Item = Position> {
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dr, dc)| self.step(from, dr, dc))
    }

    // BFS that ignores pawns. Stops on the first goal-row cell reached and
    // returns it with its distance; `parents` receives the BFS tree.
    #[allow(clippy::cast_possible_truncation)]
    fn search(
        &self,
        start: Position,
        goal_row: u8,
        parents: &mut [u8; CELL_COUNT],
    ) -> Option<(Position, u32)> {
        if start.row == goal_row {
            return Some((start, 0));
        }

        let mut visited: u128 = 1u128 << start.index();
        let mut queue = VecDeque::with_capacity(CELL_COUNT);
        queue.push_back((start, 0u32));

        while let Some((current, dist)) = queue.pop_front() {
            for next in self.neighbors(current) {
                let bit = 1u128 << next.index();
                if visited & bit != 0 {
                    continue;
                }
                visited |= bit;
                parents[next.index()] = current.index() as u8;

                if next.row == goal_row {
                    return Some((next, dist + 1));
                }
                queue.push_back((next, dist + 1));
            }
        }
        None
    }

    #[must_use]
    pub fn shortest_path_length(&self, start: Position, goal_row: u8) -> Option<u32> {
        let mut parents = [u8::MAX; CELL_COUNT];
        self.search(start, goal_row, &mut parents)
            .map(|(_, dist)| dist)
    }

    #[must_use]
    pub fn has_path_to_goal(&self, start: Position, goal_row: u8) -> bool {
        self.shortest_path_length(start, goal_row).is_some()
    }

    #[must_use]
    pub fn shortest_path(&self, start: Position, goal_row: u8) -> Option<Vec<Position>> {
        let mut parents = [u8::MAX; CELL_COUNT];
        let (end, dist) = self.search(start, goal_row, &mut parents)?;

        let mut path = Vec::with_capacity(dist as usize + 1);
        let mut current = end;
        path.push(current);
        while current != start {
            current = Position::from_index(usize::from(parents[current.index()]));
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    // Insertion order is kept for snapshots and undo.
    walls: Vec<Wall>,
    edges: EdgeMask,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    #[must_use]
    pub const fn edges(&self) -> EdgeMask {
        self.edges
    }

    pub fn clear(&mut self) {
        self.walls.clear();
        self.edges = EdgeMask::default();
    }

    /// Legal pawn destinations for a player, including jumps over the opponent.
    #[must_use]
    pub fn get_valid_moves(&self, player_pos: Position, opponent_pos: Position) -> Vec<Position> {
        let mut moves = Vec::with_capacity(5);

        for (dr, dc) in DIRECTIONS {
            // 1. Adjacent cell, unless off the board or walled off
            let Some(next) = self.edges.step(player_pos, dr, dc) else {
                continue;
            };

            if next != opponent_pos {
                moves.push(next);
                continue;
            }

            // 2. Straight jump over the opponent
            if let Some(landing) = self.edges.step(opponent_pos, dr, dc) {
                moves.push(landing);
                continue;
            }

            // 3. Straight jump unavailable: sidestep from the opponent's cell
            for (pr, pc) in [(dc, dr), (-dc, -dr)] {
                if let Some(side) = self.edges.step(opponent_pos, pr, pc) {
                    moves.push(side);
                }
            }
        }

        moves
    }

    #[must_use]
    pub const fn is_blocked_by_wall(&self, from: Position, to: Position) -> bool {
        self.edges.is_blocked(from, to)
    }

    /// Duplicate, same-orientation overlap, or crossing at the same anchor.
    #[must_use]
    pub fn conflicts(&self, wall: &Wall) -> bool {
        self.walls.iter().any(|placed| placed.conflicts_with(wall))
    }

    fn speculative_edges(&self, wall: &Wall) -> Result<EdgeMask, MoveError> {
        if !wall.in_bounds() {
            return Err(MoveError::WallOutOfBounds(*wall));
        }
        if self.conflicts(wall) {
            return Err(MoveError::WallConflict(*wall));
        }
        Ok(self.edges.with_wall(wall))
    }

    /// Full wall legality short of the mover's wall budget. The wall is tried
    /// on a copy of the edge mask, so the board is never touched.
    pub fn check_wall(&self, wall: &Wall, players: &[Player]) -> Result<(), MoveError> {
        let edges = self.speculative_edges(wall)?;
        if players
            .iter()
            .all(|p| edges.has_path_to_goal(p.position, p.goal_row))
        {
            Ok(())
        } else {
            Err(MoveError::WallBlocksPath(*wall))
        }
    }

    #[must_use]
    pub fn can_place_wall(&self, wall: &Wall, players: &[Player]) -> bool {
        self.check_wall(wall, players).is_ok()
    }

    /// Like `check_wall`, but also reports both players' shortest-path lengths
    /// with the wall in place.
    pub fn probe_wall(&self, wall: &Wall, players: &[Player; 2]) -> Result<[u32; 2], MoveError> {
        let edges = self.speculative_edges(wall)?;
        let [first, second] = players;
        match (
            edges.shortest_path_length(first.position, first.goal_row),
            edges.shortest_path_length(second.position, second.goal_row),
        ) {
            (Some(a), Some(b)) => Ok([a, b]),
            _ => Err(MoveError::WallBlocksPath(*wall)),
        }
    }

    /// Persists a wall without checking it.
    pub fn place_wall(&mut self, wall: Wall) {
        self.edges.add(&wall);
        self.walls.push(wall);
    }

    pub fn remove_wall(&mut self, wall: &Wall) -> bool {
        let Some(idx) = self.walls.iter().rposition(|placed| placed == wall) else {
            return false;
        };
        self.walls.remove(idx);
        // Placed walls never share an edge, so clearing its bits is exact.
        self.edges.remove(wall);
        true
    }

    #[must_use]
    pub fn has_path_to_goal(&self, start: Position, goal_row: u8) -> bool {
        self.edges.has_path_to_goal(start, goal_row)
    }

    /// Steps from `start` to the nearest cell of `goal_row`; `None` if walled off.
    #[must_use]
    pub fn get_shortest_path_length(&self, start: Position, goal_row: u8) -> Option<u32> {
        self.edges.shortest_path_length(start, goal_row)
    }

    #[must_use]
    pub fn shortest_path(&self, start: Position, goal_row: u8) -> Option<Vec<Position>> {
        self.edges.shortest_path(start, goal_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(first: Position, second: Position) -> [Player; 2] {
        [
            Player::new(0, first, 0, [0, 0, 255], "first"),
            Player::new(1, second, 8, [255, 0, 0], "second"),
        ]
    }

    fn sorted(mut moves: Vec<Position>) -> Vec<Position> {
        moves.sort();
        moves
    }

    #[test]
    fn test_empty_board_path_lengths() {
        let board = Board::new();
        assert_eq!(board.get_shortest_path_length(Position::new(8, 4), 0), Some(8));
        assert_eq!(board.get_shortest_path_length(Position::new(0, 4), 8), Some(8));
        assert_eq!(board.get_shortest_path_length(Position::new(0, 4), 0), Some(0));
    }

    #[test]
    fn test_wall_ahead_forces_detour() {
        let mut board = Board::new();
        let start = Position::new(8, 0);
        assert_eq!(board.get_shortest_path_length(start, 0), Some(8));

        // Covers columns 0 and 1; the only way round is two cells to the right.
        board.place_wall(Wall::horizontal(7, 0));
        assert_eq!(board.get_shortest_path_length(start, 0), Some(10));
    }

    #[test]
    fn test_sealing_wall_is_rejected() {
        let mut board = Board::new();
        let players = players(Position::new(8, 0), Position::new(0, 4));
        board.place_wall(Wall::horizontal(7, 0));

        let seal = Wall::vertical(7, 1);
        assert_eq!(
            board.check_wall(&seal, &players),
            Err(MoveError::WallBlocksPath(seal))
        );
        assert_eq!(board.walls(), &[Wall::horizontal(7, 0)]);
        assert!(board.has_path_to_goal(Position::new(8, 0), 0));
        assert!(!board.edges().with_wall(&seal).has_path_to_goal(Position::new(8, 0), 0));
    }

    #[test]
    fn test_wall_bounds() {
        let board = Board::new();
        let players = players(Position::new(8, 4), Position::new(0, 4));
        assert!(board.can_place_wall(&Wall::horizontal(7, 7), &players));
        assert_eq!(
            board.check_wall(&Wall::horizontal(8, 0), &players),
            Err(MoveError::WallOutOfBounds(Wall::horizontal(8, 0)))
        );
        assert!(!board.can_place_wall(&Wall::vertical(0, 8), &players));
    }

    #[test]
    fn test_conflicting_walls_rejected() {
        let mut board = Board::new();
        let players = players(Position::new(8, 4), Position::new(0, 4));
        board.place_wall(Wall::horizontal(4, 4));

        for wall in [
            Wall::horizontal(4, 4),
            Wall::horizontal(4, 3),
            Wall::horizontal(4, 5),
            Wall::vertical(4, 4),
        ] {
            assert_eq!(
                board.check_wall(&wall, &players),
                Err(MoveError::WallConflict(wall))
            );
        }
        assert!(board.can_place_wall(&Wall::horizontal(4, 6), &players));
        assert!(board.can_place_wall(&Wall::vertical(3, 4), &players));
    }

    #[test]
    fn test_plain_moves() {
        let board = Board::new();
        let moves = sorted(board.get_valid_moves(Position::new(4, 4), Position::new(0, 0)));
        assert_eq!(
            moves,
            vec![
                Position::new(3, 4),
                Position::new(4, 3),
                Position::new(4, 5),
                Position::new(5, 4),
            ]
        );

        let corner = sorted(board.get_valid_moves(Position::new(8, 0), Position::new(0, 0)));
        assert_eq!(corner, vec![Position::new(7, 0), Position::new(8, 1)]);
    }

    #[test]
    fn test_walls_block_moves() {
        let mut board = Board::new();
        board.place_wall(Wall::horizontal(3, 4));
        board.place_wall(Wall::vertical(4, 4));
        let moves = sorted(board.get_valid_moves(Position::new(4, 4), Position::new(0, 0)));
        assert_eq!(moves, vec![Position::new(4, 3), Position::new(5, 4)]);
    }

    #[test]
    fn test_straight_jump_excludes_diagonals() {
        let board = Board::new();
        let moves = sorted(board.get_valid_moves(Position::new(4, 4), Position::new(3, 4)));
        assert!(moves.contains(&Position::new(2, 4)));
        assert!(!moves.contains(&Position::new(3, 4)));
        assert!(!moves.contains(&Position::new(3, 3)));
        assert!(!moves.contains(&Position::new(3, 5)));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_wall_behind_opponent_offers_diagonals() {
        let mut board = Board::new();
        // Wall between rows 2 and 3 behind the opponent at (3, 4)
        board.place_wall(Wall::horizontal(2, 4));
        let moves = sorted(board.get_valid_moves(Position::new(4, 4), Position::new(3, 4)));
        assert!(!moves.contains(&Position::new(2, 4)));
        assert!(moves.contains(&Position::new(3, 3)));
        assert!(moves.contains(&Position::new(3, 5)));
        assert_eq!(moves.len(), 5);
    }

    #[test]
    fn test_diagonal_blocked_by_side_wall() {
        let mut board = Board::new();
        board.place_wall(Wall::horizontal(2, 3));
        // Vertical wall between columns 4 and 5 beside the opponent
        board.place_wall(Wall::vertical(2, 4));
        let moves = sorted(board.get_valid_moves(Position::new(4, 4), Position::new(3, 4)));
        assert!(moves.contains(&Position::new(3, 3)));
        assert!(!moves.contains(&Position::new(3, 5)));
    }

    #[test]
    fn test_board_edge_behind_opponent_offers_diagonals() {
        let board = Board::new();
        let moves = sorted(board.get_valid_moves(Position::new(1, 4), Position::new(0, 4)));
        assert_eq!(
            moves,
            vec![
                Position::new(0, 3),
                Position::new(0, 5),
                Position::new(1, 3),
                Position::new(1, 5),
                Position::new(2, 4),
            ]
        );
    }

    #[test]
    fn test_wall_in_front_blocks_jump_entirely() {
        let mut board = Board::new();
        board.place_wall(Wall::horizontal(3, 4));
        let moves = board.get_valid_moves(Position::new(4, 4), Position::new(3, 4));
        assert!(moves.iter().all(|p| p.row >= 4));
    }

    #[test]
    fn test_shortest_path_matches_length() {
        let mut board = Board::new();
        board.place_wall(Wall::horizontal(3, 3));
        board.place_wall(Wall::vertical(5, 5));
        let start = Position::new(8, 4);
        let path = board.shortest_path(start, 0).unwrap();
        let len = board.get_shortest_path_length(start, 0).unwrap();

        assert_eq!(path.len() as u32, len + 1);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last().map(|p| p.row), Some(0));
        for pair in path.windows(2) {
            assert!(!board.is_blocked_by_wall(pair[0], pair[1]));
            assert_eq!(
                pair[0].row.abs_diff(pair[1].row) + pair[0].col.abs_diff(pair[1].col),
                1
            );
        }
    }

    #[test]
    fn test_remove_wall_restores_edges() {
        let mut board = Board::new();
        board.place_wall(Wall::horizontal(1, 1));
        board.place_wall(Wall::vertical(6, 2));
        assert!(board.remove_wall(&Wall::vertical(6, 2)));
        assert!(!board.remove_wall(&Wall::vertical(6, 2)));

        let mut expected = Board::new();
        expected.place_wall(Wall::horizontal(1, 1));
        assert_eq!(board, expected);
    }

    #[test]
    fn test_legal_walls_never_shorten_paths() {
        let mut board = Board::new();
        let players = players(Position::new(8, 4), Position::new(0, 4));
        let candidates = [
            Wall::horizontal(6, 3),
            Wall::vertical(6, 5),
            Wall::horizontal(2, 4),
            Wall::vertical(1, 3),
            Wall::horizontal(4, 0),
            Wall::horizontal(4, 2),
            Wall::horizontal(4, 6),
            Wall::vertical(3, 7),
        ];

        for wall in candidates {
            let before: Vec<_> = players
                .iter()
                .map(|p| board.get_shortest_path_length(p.position, p.goal_row))
                .collect();
            if !board.can_place_wall(&wall, &players) {
                continue;
            }
            board.place_wall(wall);
            for (p, old) in players.iter().zip(before) {
                let new = board.get_shortest_path_length(p.position, p.goal_row);
                assert!(new.is_some());
                assert!(new >= old, "{wall} shortened a path");
            }
        }
    }

    #[test]
    fn test_probe_reports_lengths() {
        let board = Board::new();
        let players = players(Position::new(8, 4), Position::new(0, 4));
        // Both pawns now need a sidestep around columns 4 and 5 at the top edge
        let lengths = board.probe_wall(&Wall::horizontal(0, 4), &players).unwrap();
        assert_eq!(lengths, [9, 9]);
        assert!(board.walls().is_empty());
    }
}
