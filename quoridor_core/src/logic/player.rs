use crate::logic::board::Position;

pub const WALLS_PER_PLAYER: u8 = 10;

pub type Rgb = [u8; 3];

pub const ROYAL_BLUE: Rgb = [65, 105, 225];
pub const CRIMSON: Rgb = [220, 20, 60];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: u8,
    pub position: Position,
    pub goal_row: u8,
    pub walls_remaining: u8,
    // Display metadata, carried for the presentation layer
    pub name: String,
    pub color: Rgb,
}

impl Player {
    pub fn new(
        id: u8,
        start: Position,
        goal_row: u8,
        color: Rgb,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            position: start,
            goal_row,
            walls_remaining: WALLS_PER_PLAYER,
            name: name.into(),
            color,
        }
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    pub fn spend_wall(&mut self) -> bool {
        if self.walls_remaining > 0 {
            self.walls_remaining -= 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn can_place_wall(&self) -> bool {
        self.walls_remaining > 0
    }

    #[must_use]
    pub const fn has_won(&self) -> bool {
        self.position.row == self.goal_row
    }

    /// Rows still to cover, ignoring walls.
    #[must_use]
    pub const fn row_distance(&self) -> u8 {
        self.position.row.abs_diff(self.goal_row)
    }
}
