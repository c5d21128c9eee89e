use crate::logic::board::{Board, Position, BOARD_SIZE};
use crate::logic::game::{GameState, GameStatus};
use crate::logic::player::{Player, Rgb, WALLS_PER_PLAYER};
use crate::logic::rules::MoveError;
use crate::logic::wall::{Orientation, Wall};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub position: (u8, u8),
    pub goal_row: u8,
    pub walls_remaining: u8,
    pub id: u8,
    pub name: String,
    pub color: Rgb,
}

/// On-disk layout of a game. Move history is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub walls: Vec<(u8, u8, bool)>, // (row, col, horizontal)
    pub players: Vec<SavedPlayer>,
    pub current_player_idx: usize,
    pub game_over: bool,
    pub winner_id: Option<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected 2 players, found {0}")]
    PlayerCount(usize),
    #[error("player at index {index} has id {id}")]
    PlayerId { index: usize, id: u8 },
    #[error("player {id} is off the board at ({row}, {col})")]
    Position { id: u8, row: u8, col: u8 },
    #[error("goal rows must be 0 and 8, one per player")]
    GoalRow,
    #[error("player {id} has {remaining} walls in hand, with {placed} on the board")]
    WallCount { id: u8, remaining: u8, placed: usize },
    #[error("wall {wall} rejected: {reason}")]
    Wall { wall: Wall, reason: MoveError },
    #[error("current_player_idx {0} is not 0 or 1")]
    Turn(usize),
    #[error("inconsistent result: {0}")]
    Winner(&'static str),
    #[error("both pawns are on {0}")]
    Overlap(Position),
}

fn decode_player(index: usize, saved: &SavedPlayer) -> Result<Player, DecodeError> {
    if usize::from(saved.id) != index {
        return Err(DecodeError::PlayerId {
            index,
            id: saved.id,
        });
    }
    let (row, col) = saved.position;
    let position = Position::new(row, col);
    if !position.in_bounds() {
        return Err(DecodeError::Position {
            id: saved.id,
            row,
            col,
        });
    }
    if saved.goal_row != 0 && saved.goal_row != BOARD_SIZE - 1 {
        return Err(DecodeError::GoalRow);
    }
    if saved.walls_remaining > WALLS_PER_PLAYER {
        return Err(DecodeError::WallCount {
            id: saved.id,
            remaining: saved.walls_remaining,
            placed: 0,
        });
    }

    let mut player = Player::new(
        saved.id,
        position,
        saved.goal_row,
        saved.color,
        saved.name.clone(),
    );
    player.walls_remaining = saved.walls_remaining;
    Ok(player)
}

impl GameState {
    #[must_use]
    pub fn to_saved(&self) -> SavedGame {
        SavedGame {
            walls: self
                .board
                .walls()
                .iter()
                .map(|w| (w.row, w.col, w.is_horizontal()))
                .collect(),
            players: self
                .players
                .iter()
                .map(|p| SavedPlayer {
                    position: (p.position.row, p.position.col),
                    goal_row: p.goal_row,
                    walls_remaining: p.walls_remaining,
                    id: p.id,
                    name: p.name.clone(),
                    color: p.color,
                })
                .collect(),
            current_player_idx: self.current,
            game_over: self.is_over(),
            winner_id: self.winner().map(|p| p.id),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_saved())
    }

    /// Rebuilds a game from a snapshot, rejecting anything that could not
    /// arise from legal play.
    pub fn from_saved(saved: &SavedGame) -> Result<Self, DecodeError> {
        // 1. Players
        let [first, second] = saved.players.as_slice() else {
            return Err(DecodeError::PlayerCount(saved.players.len()));
        };
        let players = [decode_player(0, first)?, decode_player(1, second)?];
        if players[0].goal_row == players[1].goal_row {
            return Err(DecodeError::GoalRow);
        }
        if players[0].position == players[1].position {
            return Err(DecodeError::Overlap(players[0].position));
        }

        // 2. Wall budget
        let placed = saved.walls.len();
        let in_hand = usize::from(players[0].walls_remaining) + usize::from(players[1].walls_remaining);
        if placed + in_hand > 2 * usize::from(WALLS_PER_PLAYER) {
            let worst = players
                .iter()
                .max_by_key(|p| p.walls_remaining)
                .unwrap_or(&players[0]);
            return Err(DecodeError::WallCount {
                id: worst.id,
                remaining: worst.walls_remaining,
                placed,
            });
        }

        // 3. Walls, in placement order. Reachability only shrinks as walls are
        // added, so the first sealing wall is the one reported.
        let mut board = Board::new();
        for &(row, col, horizontal) in &saved.walls {
            let wall = Wall::new(row, col, Orientation::from_horizontal(horizontal));
            board
                .check_wall(&wall, &players)
                .map_err(|reason| DecodeError::Wall { wall, reason })?;
            board.place_wall(wall);
        }

        // 4. Turn and result
        if saved.current_player_idx > 1 {
            return Err(DecodeError::Turn(saved.current_player_idx));
        }
        let status = match (saved.game_over, saved.winner_id) {
            (false, None) => {
                if players.iter().any(Player::has_won) {
                    return Err(DecodeError::Winner("a pawn is on its goal row in an unfinished game"));
                }
                GameStatus::Playing
            }
            (true, Some(id)) => {
                let winner = players
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(DecodeError::Winner("winner_id names no player"))?;
                if !players[winner].has_won() {
                    return Err(DecodeError::Winner("the winner is not on their goal row"));
                }
                // A winning step keeps the turn with the winner.
                if saved.current_player_idx != winner {
                    return Err(DecodeError::Winner("the loser is on move in a finished game"));
                }
                GameStatus::Won(winner)
            }
            (true, None) => return Err(DecodeError::Winner("game_over without a winner_id")),
            (false, Some(_)) => return Err(DecodeError::Winner("winner_id set on an unfinished game")),
        };

        Ok(Self {
            board,
            players,
            current: saved.current_player_idx,
            status,
            history: Vec::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let saved: SavedGame = serde_json::from_str(json)?;
        Self::from_saved(&saved)
    }

    /// Replaces this game with a decoded snapshot. On error the game is untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), DecodeError> {
        let loaded = Self::from_json(json)?;
        *self = loaded;
        log::info!(
            "Loaded game: {} walls placed, {} to move",
            self.board.walls().len(),
            self.current_player().name
        );
        Ok(())
    }
}
