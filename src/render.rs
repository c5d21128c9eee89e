use quoridor_core::logic::board::{Position, BOARD_SIZE};
use quoridor_core::logic::game::GameState;

/// Text diagram of the board. Row 1 is printed first; `|` and `-` mark walls.
pub fn board(game: &GameState) -> String {
    let mut out = String::from("   a b c d e f g h i\n");

    for row in 0..BOARD_SIZE {
        out.push_str(&format!("{:>2} ", row + 1));
        for col in 0..BOARD_SIZE {
            let pos = Position::new(row, col);
            let glyph = game
                .players
                .iter()
                .find(|p| p.position == pos)
                .map_or('.', |player| char::from(b'1' + player.id));
            out.push(glyph);
            if col + 1 < BOARD_SIZE {
                let east = Position::new(row, col + 1);
                out.push(if game.board.is_blocked_by_wall(pos, east) { '|' } else { ' ' });
            }
        }
        out.push('\n');

        if row + 1 < BOARD_SIZE {
            out.push_str("   ");
            for col in 0..BOARD_SIZE {
                let south = Position::new(row + 1, col);
                let blocked = game.board.is_blocked_by_wall(Position::new(row, col), south);
                out.push(if blocked { '-' } else { ' ' });
                if col + 1 < BOARD_SIZE {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
    }
    out
}
