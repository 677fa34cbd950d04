pub mod game_data;
pub mod pgn;

pub use game_data::{GameHeaders, GameRecord, InvalidColor, PlayedMove, PlayerColor};
pub use pgn::{read_first_game, PgnError};
