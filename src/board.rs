use rand::{seq::SliceRandom, thread_rng, Rng};
use std::fmt;

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Left, Move::Down, Move::Right];

    /// Offset of the tile that fills the blank, relative to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The move that turns `from` into `to`, if they are one blank swap apart.
    pub fn between(from: &Board, to: &Board) -> Option<Move> {
        if from.size != to.size {
            return None;
        }
        let (row, col) = from.blank();
        let (to_row, to_col) = to.blank();
        let delta = (
            to_row as isize - row as isize,
            to_col as isize - col as isize,
        );
        let movement = Move::ALL.into_iter().find(|m| m.as_offset() == delta)?;
        match from.try_move(movement) {
            Some(moved) if moved == *to => Some(movement),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An immutable n-by-n arrangement of tiles, 0 being the blank.
///
/// The tiles are expected to be a permutation of `0..n*n`. This type does not
/// check that; see [`crate::parse_board`] for a validating constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<Vec<u32>>,
    // position of the blank, (row, col)
    x_pos: usize,
    y_pos: usize,
}

impl Board {
    pub const MIN_DIMENSION: usize = 2;
    pub const MAX_DIMENSION: usize = 127;

    /// Builds a board from its rows.
    pub fn new(tiles: Vec<Vec<u32>>) -> Self {
        let size = tiles.len();
        debug_assert!(tiles.iter().all(|row| row.len() == size));

        let (x_pos, y_pos) = tiles
            .iter()
            .enumerate()
            .find_map(|(i, row)| row.iter().position(|&v| v == 0).map(|j| (i, j)))
            .unwrap_or((size.saturating_sub(1), size.saturating_sub(1)));

        Self {
            size,
            tiles,
            x_pos,
            y_pos,
        }
    }

    /// The solved arrangement: 1..n*n-1 in row-major order, blank last.
    pub fn goal(size: usize) -> Self {
        let mut tiles = Vec::new();
        let mut value = 1;

        for i in 0..size {
            let mut row = Vec::new();
            for j in 0..size {
                if i == size - 1 && j == size - 1 {
                    row.push(0);
                } else {
                    row.push(value);
                    value += 1;
                }
            }
            tiles.push(row);
        }

        Self {
            size,
            tiles,
            x_pos: size - 1,
            y_pos: size - 1,
        }
    }

    /// A uniformly shuffled board that can reach the goal.
    pub fn random_solvable<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut flattened: Vec<u32> = (0..(size * size) as u32).collect();

        loop {
            flattened.shuffle(rng);
            let board = Self::new(flattened.chunks(size).map(|row| row.to_vec()).collect());
            if board.is_solvable_by_parity() {
                return board;
            }
        }
    }

    pub fn dimension(&self) -> usize {
        self.size
    }

    pub fn tile(&self, row: usize, col: usize) -> u32 {
        self.tiles[row][col]
    }

    /// Position of the blank as (row, col).
    pub fn blank(&self) -> (usize, usize) {
        (self.x_pos, self.y_pos)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.tiles.iter().map(|row| row.as_slice())
    }

    /// Number of tiles, blank excluded, that are not in their goal position.
    pub fn hamming(&self) -> usize {
        let mut count = 0;
        for i in 0..self.size {
            for j in 0..self.size {
                let value = self.tiles[i][j];
                if value != 0 && value as usize != i * self.size + j + 1 {
                    count += 1;
                }
            }
        }
        count
    }

    /// Sum of the vertical and horizontal distances of each tile, blank
    /// excluded, to its goal position.
    pub fn manhattan(&self) -> usize {
        let mut distance = 0;
        for i in 0..self.size {
            for j in 0..self.size {
                let value = self.tiles[i][j];
                if value != 0 {
                    let target_x = (value - 1) as usize / self.size;
                    let target_y = (value - 1) as usize % self.size;
                    distance += i.abs_diff(target_x) + j.abs_diff(target_y);
                }
            }
        }
        distance
    }

    /// Number of tiles sitting in their goal row (or column) behind a larger
    /// tile of the same goal row (or column).
    pub fn linear_conflicts(&self) -> usize {
        let mut conflicts = 0;

        for row in 0..self.size {
            let mut max_seen = 0;
            for col in 0..self.size {
                let value = self.tiles[row][col];
                if value != 0 && (value - 1) as usize / self.size == row {
                    if value > max_seen {
                        max_seen = value;
                    } else {
                        conflicts += 1;
                    }
                }
            }
        }

        for col in 0..self.size {
            let mut max_seen = 0;
            for row in 0..self.size {
                let value = self.tiles[row][col];
                if value != 0 && (value - 1) as usize % self.size == col {
                    if value > max_seen {
                        max_seen = value;
                    } else {
                        conflicts += 1;
                    }
                }
            }
        }

        conflicts
    }

    pub fn is_goal(&self) -> bool {
        self.hamming() == 0
    }

    /// The board reached by sliding a tile into the blank, if that tile exists.
    pub fn try_move(&self, movement: Move) -> Option<Self> {
        let (dx, dy) = movement.as_offset();

        let new_x = self.x_pos as isize + dx;
        let new_y = self.y_pos as isize + dy;

        if new_x < 0 || new_x >= self.size as isize || new_y < 0 || new_y >= self.size as isize {
            return None;
        }
        let new_x = new_x as usize;
        let new_y = new_y as usize;

        let mut tiles = self.tiles.clone();
        tiles[self.x_pos][self.y_pos] = tiles[new_x][new_y];
        tiles[new_x][new_y] = 0;

        Some(Self {
            size: self.size,
            tiles,
            x_pos: new_x,
            y_pos: new_y,
        })
    }

    /// All boards one blank move away. Callers must not rely on the order.
    pub fn neighbors(&self) -> Vec<Board> {
        Move::ALL
            .iter()
            .filter_map(|&movement| self.try_move(movement))
            .collect()
    }

    /// This board with a random pair of non-blank tiles exchanged.
    pub fn twin(&self) -> Self {
        self.twin_with(&mut thread_rng())
    }

    pub fn twin_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let occupied: Vec<(usize, usize)> = (0..self.size)
            .flat_map(|i| (0..self.size).map(move |j| (i, j)))
            .filter(|&(i, j)| self.tiles[i][j] != 0)
            .collect();

        let pair: Vec<&(usize, usize)> = occupied.choose_multiple(rng, 2).collect();

        let mut tiles = self.tiles.clone();
        if let [&(x1, y1), &(x2, y2)] = pair.as_slice() {
            let first = tiles[x1][y1];
            tiles[x1][y1] = tiles[x2][y2];
            tiles[x2][y2] = first;
        }

        Self {
            size: self.size,
            tiles,
            x_pos: self.x_pos,
            y_pos: self.y_pos,
        }
    }

    /// Closed-form solvability via inversion parity.
    ///
    /// Odd widths are solvable with an even inversion count. Even widths are
    /// solvable when inversions plus the blank's row is odd.
    pub fn is_solvable_by_parity(&self) -> bool {
        let flattened: Vec<u32> = self.tiles.iter().flatten().copied().collect();
        let inversions = count_inversions(&flattened);

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.x_pos) % 2 == 1
        }
    }
}

fn count_inversions(flattened: &[u32]) -> usize {
    flattened
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.size * self.size - 1).to_string().len();
        writeln!(f, "{}", self.size)?;
        for row in &self.tiles {
            for (j, &val) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>width$}", val, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
