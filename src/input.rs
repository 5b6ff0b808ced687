//! Reading boards from text.
//!
//! The format is the one [`Board`]'s `Display` produces: the dimension n,
//! followed by n*n tile values, blank as 0. Values are separated by any
//! whitespace, so the row layout is a convention rather than a requirement.

use thiserror::Error;

use crate::board::Board;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("input is empty, expected the board dimension")]
    MissingDimension,

    #[error("`{0}` is not a non-negative integer")]
    InvalidNumber(String),

    #[error(
        "dimension {0} is out of range, expected {} to {}",
        Board::MIN_DIMENSION,
        Board::MAX_DIMENSION
    )]
    DimensionOutOfRange(usize),

    #[error("expected {expected} tiles, found {found}")]
    TileCount { expected: usize, found: usize },

    #[error("tile {tile} is out of range, expected 0 to {max}")]
    TileOutOfRange { tile: u32, max: u32 },

    #[error("tile {0} appears more than once")]
    DuplicateTile(u32),
}

/// Parses and validates a board. The tiles must be a permutation of
/// `0..n*n`.
pub fn parse_board(text: &str) -> Result<Board, ParseError> {
    let mut tokens = text.split_whitespace();

    let size: usize = parse_number(tokens.next().ok_or(ParseError::MissingDimension)?)?;
    if !(Board::MIN_DIMENSION..=Board::MAX_DIMENSION).contains(&size) {
        return Err(ParseError::DimensionOutOfRange(size));
    }

    let values = tokens
        .map(parse_number::<u32>)
        .collect::<Result<Vec<_>, _>>()?;
    let expected = size * size;
    if values.len() != expected {
        return Err(ParseError::TileCount {
            expected,
            found: values.len(),
        });
    }

    let max = (expected - 1) as u32;
    let mut seen = vec![false; expected];
    for &tile in &values {
        if tile > max {
            return Err(ParseError::TileOutOfRange { tile, max });
        }
        if std::mem::replace(&mut seen[tile as usize], true) {
            return Err(ParseError::DuplicateTile(tile));
        }
    }

    Ok(Board::new(
        values.chunks(size).map(|row| row.to_vec()).collect(),
    ))
}

fn parse_number<T: std::str::FromStr>(token: &str) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows() {
        let board = parse_board("3\n 0  1  3\n 4  2  5\n 7  8  6\n").unwrap();
        assert_eq!(board.dimension(), 3);
        assert_eq!(board.blank(), (0, 0));
        assert_eq!(board.tile(1, 1), 2);
        assert_eq!(board.tile(2, 2), 6);
    }

    #[test]
    fn display_output_parses_back() {
        let goal = Board::goal(4);
        assert_eq!(parse_board(&goal.to_string()), Ok(goal));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse_board("  \n"), Err(ParseError::MissingDimension));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_board("two\n1 2\n3 0"),
            Err(ParseError::InvalidNumber("two".to_string()))
        );
        assert_eq!(
            parse_board("2\n1 -2\n3 0"),
            Err(ParseError::InvalidNumber("-2".to_string()))
        );
    }

    #[test]
    fn rejects_bad_dimension() {
        assert_eq!(parse_board("1\n0"), Err(ParseError::DimensionOutOfRange(1)));
        assert_eq!(parse_board("128"), Err(ParseError::DimensionOutOfRange(128)));
    }

    #[test]
    fn rejects_wrong_tile_count() {
        assert_eq!(
            parse_board("2\n1 2\n3"),
            Err(ParseError::TileCount {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            parse_board("2\n1 2\n3 0 4"),
            Err(ParseError::TileCount {
                expected: 4,
                found: 5
            })
        );
    }

    #[test]
    fn rejects_non_permutations() {
        assert_eq!(
            parse_board("2\n1 2\n4 0"),
            Err(ParseError::TileOutOfRange { tile: 4, max: 3 })
        );
        assert_eq!(parse_board("2\n1 1\n3 0"), Err(ParseError::DuplicateTile(1)));
        assert_eq!(parse_board("2\n1 2\n3 3"), Err(ParseError::DuplicateTile(3)));
    }
}
