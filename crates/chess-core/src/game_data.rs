use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Side whose moves are analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    #[default]
    White,
    Black,
}

impl PlayerColor {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerColor::White => "white",
            PlayerColor::Black => "black",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid player color '{0}' (expected 'white' or 'black')")]
pub struct InvalidColor(pub String);

impl FromStr for PlayerColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(PlayerColor::White),
            "black" => Ok(PlayerColor::Black),
            _ => Err(InvalidColor(s.to_string())),
        }
    }
}

impl From<Color> for PlayerColor {
    fn from(color: Color) -> Self {
        match color {
            Color::White => PlayerColor::White,
            Color::Black => PlayerColor::Black,
        }
    }
}

impl From<PlayerColor> for Color {
    fn from(color: PlayerColor) -> Self {
        match color {
            PlayerColor::White => Color::White,
            PlayerColor::Black => Color::Black,
        }
    }
}

/// Seven-tag-roster subset kept from the game headers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameHeaders {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>, // "1-0", "0-1", "1/2-1/2", "*"
    pub event: Option<String>,
    pub date: Option<String>,
    /// Starting position when the game begins from a set-up board
    pub fen: Option<String>,
}

/// A mainline move together with the position it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayedMove {
    /// 1-based half-move index within the game
    pub ply: usize,
    pub san: String,
    pub uci: String,
    /// Side that made the move
    pub mover: PlayerColor,
    /// FEN of the position after the move
    pub fen_after: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub headers: GameHeaders,
    pub moves: Vec<PlayedMove>,
}

impl GameRecord {
    /// Mainline moves made by `color`, in game order.
    pub fn moves_by(&self, color: PlayerColor) -> impl Iterator<Item = &PlayedMove> {
        self.moves.iter().filter(move |m| m.mover == color)
    }
}
