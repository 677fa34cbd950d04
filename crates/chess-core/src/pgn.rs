//! PGN reading — first game only, mainline only.

use std::io;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, EnPassantMode, Position};

use crate::game_data::{GameHeaders, GameRecord, PlayedMove};

#[derive(Debug, thiserror::Error)]
pub enum PgnError {
    #[error("failed to read PGN: {0}")]
    Io(#[from] io::Error),

    #[error("invalid starting position '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal move '{san}' at ply {ply}")]
    IllegalMove { san: String, ply: usize },
}

/// Movetext state while walking the mainline.
struct Mainline {
    headers: GameHeaders,
    board: Chess,
    moves: Vec<PlayedMove>,
}

/// Visitor that replays the mainline of a single game.
struct GameReplay;

impl Visitor for GameReplay {
    type Tags = GameHeaders;
    type Movetext = Mainline;
    type Output = Result<GameRecord, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, GameHeaders> {
        ControlFlow::Continue(GameHeaders::default())
    }

    fn tag(
        &mut self,
        tags: &mut GameHeaders,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match name {
            b"White" => tags.white = Some(value),
            b"Black" => tags.black = Some(value),
            b"Result" => tags.result = Some(value),
            b"Event" => tags.event = Some(value),
            b"Date" => tags.date = Some(value),
            b"FEN" => tags.fen = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameHeaders) -> ControlFlow<Self::Output, Mainline> {
        let board = match tags.fen.as_deref().map(starting_position) {
            None => Chess::default(),
            Some(Ok(board)) => board,
            Some(Err(e)) => return ControlFlow::Break(Err(e)),
        };

        ControlFlow::Continue(Mainline {
            headers: tags,
            board,
            moves: Vec::new(),
        })
    }

    fn begin_variation(&mut self, _: &mut Mainline) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, state: &mut Mainline, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        let ply = state.moves.len() + 1;
        let mv = match san_plus.san.to_move(&state.board) {
            Ok(mv) => mv,
            Err(_) => {
                return ControlFlow::Break(Err(PgnError::IllegalMove {
                    san: san_plus.to_string(),
                    ply,
                }))
            }
        };

        let mover = state.board.turn().into();
        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        state.board.play_unchecked(mv);

        state.moves.push(PlayedMove {
            ply,
            san: san_plus.to_string(),
            uci,
            mover,
            fen_after: Fen::from_position(&state.board, EnPassantMode::Legal).to_string(),
        });

        ControlFlow::Continue(())
    }

    fn end_game(&mut self, state: Mainline) -> Self::Output {
        Ok(GameRecord {
            headers: state.headers,
            moves: state.moves,
        })
    }
}

/// Board described by a `FEN` header.
fn starting_position(fen: &str) -> Result<Chess, PgnError> {
    let invalid = |reason: String| PgnError::InvalidFen {
        fen: fen.to_string(),
        reason,
    };
    Fen::from_ascii(fen.trim().as_bytes())
        .map_err(|e| invalid(e.to_string()))?
        .into_position(CastlingMode::Standard)
        .map_err(|e| invalid(e.to_string()))
}

/// Read the first game from PGN text.
///
/// Returns `Ok(None)` when the text holds no game at all. A `FEN` header sets
/// the starting position. A move that is illegal in its position aborts the
/// game with [`PgnError::IllegalMove`].
pub fn read_first_game(pgn: &str) -> Result<Option<GameRecord>, PgnError> {
    let mut reader = Reader::new(pgn.as_bytes());
    match reader.read_game(&mut GameReplay)? {
        Some(outcome) => outcome.map(Some),
        None => Ok(None),
    }
}
