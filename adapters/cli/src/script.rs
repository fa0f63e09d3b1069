//! Parsing of scripted player input supplied on the command line.

use cavern_core::{CellCoord, Direction};
use cavern_system_player_control::PlayerInput;
use thiserror::Error;

/// Errors raised while parsing scripted input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The cell argument is not of the form `ROW,COL`.
    #[error("cell `{0}` must be written as ROW,COL")]
    InvalidCell(String),
    /// A move character has no associated action.
    #[error("unknown move `{character}` at tick {tick}; expected one of n, e, s, w, a, .")]
    UnknownMove {
        /// Offending character.
        character: char,
        /// Tick the character was scheduled for.
        tick: usize,
    },
}

/// Parses a `ROW,COL` pair.
pub(crate) fn parse_cell(value: &str) -> Result<CellCoord, ScriptError> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| ScriptError::InvalidCell(value.to_owned()))?;

    let row = row
        .trim()
        .parse::<i32>()
        .map_err(|_| ScriptError::InvalidCell(value.to_owned()))?;
    let column = column
        .trim()
        .parse::<i32>()
        .map_err(|_| ScriptError::InvalidCell(value.to_owned()))?;

    Ok(CellCoord::new(row, column))
}

/// Parses one move per tick. `.` idles for that tick.
pub(crate) fn parse_moves(moves: &str) -> Result<Vec<Option<PlayerInput>>, ScriptError> {
    moves
        .chars()
        .enumerate()
        .map(|(tick, character)| match character.to_ascii_lowercase() {
            'n' => Ok(Some(PlayerInput::Step(Direction::North))),
            'e' => Ok(Some(PlayerInput::Step(Direction::East))),
            's' => Ok(Some(PlayerInput::Step(Direction::South))),
            'w' => Ok(Some(PlayerInput::Step(Direction::West))),
            'a' => Ok(Some(PlayerInput::Strike)),
            '.' => Ok(None),
            _ => Err(ScriptError::UnknownMove { character, tick }),
        })
        .collect()
}

/// Per-tick player input assembled from the command line.
#[derive(Clone, Debug, Default)]
pub(crate) struct Script {
    route: Option<CellCoord>,
    moves: Vec<Option<PlayerInput>>,
}

impl Script {
    /// Creates a script issuing `route` on the first tick followed by `moves`.
    pub(crate) fn new(route: Option<CellCoord>, moves: Vec<Option<PlayerInput>>) -> Self {
        Self { route, moves }
    }

    /// Inputs scheduled for the zero-based `tick`.
    pub(crate) fn inputs(&self, tick: usize) -> Vec<PlayerInput> {
        let route = self
            .route
            .filter(|_| tick == 0)
            .map(PlayerInput::RouteTo);
        let step = self.moves.get(tick).copied().flatten();
        route.into_iter().chain(step).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells_with_whitespace() {
        assert_eq!(parse_cell(" 3, 14"), Ok(CellCoord::new(3, 14)));
        assert_eq!(
            parse_cell("3x14"),
            Err(ScriptError::InvalidCell("3x14".to_owned()))
        );
        assert!(parse_cell("a,b").is_err());
    }

    #[test]
    fn parses_moves_and_idles() {
        let moves = parse_moves("nE.a").expect("valid moves");
        assert_eq!(
            moves,
            vec![
                Some(PlayerInput::Step(Direction::North)),
                Some(PlayerInput::Step(Direction::East)),
                None,
                Some(PlayerInput::Strike),
            ]
        );
    }

    #[test]
    fn rejects_unknown_moves() {
        assert_eq!(
            parse_moves("nq"),
            Err(ScriptError::UnknownMove {
                character: 'q',
                tick: 1,
            })
        );
    }

    #[test]
    fn route_is_issued_before_first_move() {
        let script = Script::new(
            Some(CellCoord::new(5, 5)),
            vec![Some(PlayerInput::Strike), Some(PlayerInput::Step(Direction::West))],
        );

        assert_eq!(
            script.inputs(0),
            vec![PlayerInput::RouteTo(CellCoord::new(5, 5)), PlayerInput::Strike]
        );
        assert_eq!(script.inputs(1), vec![PlayerInput::Step(Direction::West)]);
        assert!(script.inputs(2).is_empty());
    }
}
