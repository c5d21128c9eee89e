use crate::engine::Move;
use crate::logic::board::{Board, Position, WALL_LATTICE};
use crate::logic::player::{Player, CRIMSON, ROYAL_BLUE};
use crate::logic::rules::{is_valid_step, is_valid_wall, MoveError};
use crate::logic::wall::{Orientation, Wall};
use serde::{Deserialize, Serialize};

pub const FIRST_START: Position = Position::new(8, 4);
pub const SECOND_START: Position = Position::new(0, 4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won(usize), // Index of the winner
}

/// An applied move together with what it takes to revert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: usize,
    pub mv: Move,
    pub from: Position,
    status_before: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub players: [Player; 2],
    pub current: usize,
    pub status: GameStatus,
    pub history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new("Player 1", "Player 2")
    }
}

impl GameState {
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            board: Board::new(),
            players: [
                // First player starts at the bottom and races to row 0
                Player::new(0, FIRST_START, 0, ROYAL_BLUE, first),
                Player::new(1, SECOND_START, 8, CRIMSON, second),
            ],
            current: 0,
            status: GameStatus::Playing,
            history: Vec::new(),
        }
    }

    pub fn setup_game(&mut self, first: impl Into<String>, second: impl Into<String>) {
        *self = Self::new(first, second);
    }

    /// Starts over with the same player names.
    pub fn reset(&mut self) {
        let [first, second] = &self.players;
        let (first, second) = (first.name.clone(), second.name.clone());
        self.setup_game(first, second);
    }

    #[must_use]
    pub const fn opponent_index(&self) -> usize {
        1 - self.current
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    #[must_use]
    pub fn opponent(&self) -> &Player {
        &self.players[self.opponent_index()]
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Won(_))
    }

    #[must_use]
    pub fn winner(&self) -> Option<&Player> {
        match self.status {
            GameStatus::Won(idx) => self.players.get(idx),
            GameStatus::Playing => None,
        }
    }

    #[must_use]
    pub fn valid_steps(&self) -> Vec<Position> {
        self.board
            .get_valid_moves(self.current_player().position, self.opponent().position)
    }

    #[must_use]
    pub fn path_length(&self, idx: usize) -> Option<u32> {
        let player = self.players.get(idx)?;
        self.board
            .get_shortest_path_length(player.position, player.goal_row)
    }

    pub fn validate(&self, mv: &Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        match mv {
            Move::Step(to) => is_valid_step(&self.board, self.current_player(), self.opponent(), *to),
            Move::Wall(wall) => is_valid_wall(&self.board, &self.players, self.current, wall),
        }
    }

    /// Validates and applies a move for the player to move, recording it in the history.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        self.validate(&mv)?;
        let record = self.apply(mv);
        self.history.push(record);

        if let Some(winner) = self.winner() {
            log::info!("{} reached row {} and wins", winner.name, winner.goal_row);
        }
        Ok(())
    }

    pub fn try_move(&mut self, to: Position) -> Result<(), MoveError> {
        self.play(Move::Step(to))
    }

    pub fn make_move(&mut self, to: Position) -> bool {
        self.try_move(to).is_ok()
    }

    pub fn try_place_wall(&mut self, wall: Wall) -> Result<(), MoveError> {
        self.play(Move::Wall(wall))
    }

    pub fn place_wall(&mut self, wall: Wall) -> bool {
        self.try_place_wall(wall).is_ok()
    }

    /// Applies an already-validated move without touching the history.
    ///
    /// A winning step ends the game and leaves the turn with the winner; every
    /// other move passes the turn. Feed the returned record to `revert` to undo.
    pub fn apply(&mut self, mv: Move) -> MoveRecord {
        let player = self.current;
        let record = MoveRecord {
            player,
            mv,
            from: self.players[player].position,
            status_before: self.status,
        };

        match mv {
            Move::Step(to) => {
                let mover = &mut self.players[player];
                mover.move_to(to);
                if mover.has_won() {
                    self.status = GameStatus::Won(player);
                } else {
                    self.current = 1 - player;
                }
            }
            Move::Wall(wall) => {
                self.board.place_wall(wall);
                self.players[player].spend_wall();
                self.current = 1 - player;
            }
        }

        record
    }

    pub fn revert(&mut self, record: &MoveRecord) {
        let player = record.player;
        match record.mv {
            Move::Step(_) => self.players[player].move_to(record.from),
            Move::Wall(wall) => {
                let removed = self.board.remove_wall(&wall);
                debug_assert!(removed, "reverting {wall} which is not on the board");
                self.players[player].walls_remaining += 1;
            }
        }
        self.current = player;
        self.status = record.status_before;
    }

    /// Takes back the last recorded move.
    pub fn undo_last(&mut self) -> bool {
        if let Some(record) = self.history.pop() {
            self.revert(&record);
            true
        } else {
            false
        }
    }

    /// Every legal wall for the player to move.
    ///
    /// Runs a reachability check for each of the 128 lattice slots, so this is
    /// meant for occasional full listings rather than per-node search use.
    #[must_use]
    pub fn get_valid_wall_positions(&self) -> Vec<Wall> {
        if self.is_over() || !self.current_player().can_place_wall() {
            return Vec::new();
        }

        let mut walls = Vec::new();
        for row in 0..WALL_LATTICE {
            for col in 0..WALL_LATTICE {
                for orientation in Orientation::ALL {
                    let wall = Wall::new(row, col, orientation);
                    if self.board.can_place_wall(&wall, &self.players) {
                        walls.push(wall);
                    }
                }
            }
        }
        walls
    }

    /// A copy for hypothetical play: same position, empty history.
    #[must_use]
    pub fn scratch_copy(&self) -> Self {
        Self {
            board: self.board.clone(),
            players: self.players.clone(),
            current: self.current,
            status: self.status,
            history: Vec::new(),
        }
    }
}
