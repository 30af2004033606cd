//! Quixo position representation and move execution.
//!
//! This module provides the rules engine:
//! - Board state (25 cells, player to move, ply counter)
//! - The two-phase move protocol: take a perimeter cube, then slide it back in
//! - Legal move enumeration
//! - Win detection over rows, columns and diagonals
//!
//! A move is atomic. The take phase writes the mover's mark immediately, so
//! [`Position::apply`] snapshots the board first and restores it when the
//! slide turns out to be illegal.

use std::fmt;

use thiserror::Error;

use crate::constants::{MAX_MOVES, N, NUM_CELLS, NUM_LINES};

/// One of the two players. `X` always moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// The opponent of this player.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Seat index: 0 for `X`, 1 for `O`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::X => 0,
            Player::O => 1,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Content of a cell: `None` is unmarked, `Some(p)` is owned by `p`.
pub type Cell = Option<Player>;

/// Opaque key identifying the cell contents of a position.
pub type BoardKey = String;

/// A cell address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[inline]
    fn from_index(i: usize) -> Self {
        Self::new(i / N, i % N)
    }

    #[inline]
    fn index(self) -> usize {
        self.row * N + self.col
    }

    /// Whether the coordinate lies on the board.
    pub fn in_bounds(self) -> bool {
        self.row < N && self.col < N
    }

    /// Whether the cell is on the first/last row or column.
    pub fn is_perimeter(self) -> bool {
        self.in_bounds()
            && (self.row == 0 || self.row == N - 1 || self.col == 0 || self.col == N - 1)
    }

    /// Whether the cell is one of the four extreme corners.
    pub fn is_corner(self) -> bool {
        (self.row == 0 || self.row == N - 1) && (self.col == 0 || self.col == N - 1)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Iterate over the 16 perimeter cells in row-major order.
pub fn perimeter() -> impl Iterator<Item = Coord> {
    (0..NUM_CELLS).map(Coord::from_index).filter(|c| c.is_perimeter())
}

/// The edge at which the taken cube is pushed back into its line.
///
/// `Top`/`Bottom` slide the cube's column, `Left`/`Right` its row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slide {
    Top,
    Bottom,
    Left,
    Right,
}

impl Slide {
    /// All directions, in enumeration order.
    pub const ALL: [Slide; 4] = [Slide::Top, Slide::Bottom, Slide::Left, Slide::Right];

    /// Whether this slide may follow a take at `coord`.
    ///
    /// A cube can never be pushed back in through the edge it was taken
    /// from, so corners keep two directions and other edge cells three.
    pub fn is_legal_from(self, coord: Coord) -> bool {
        coord.is_perimeter()
            && match self {
                Slide::Top => coord.row != 0,
                Slide::Bottom => coord.row != N - 1,
                Slide::Left => coord.col != 0,
                Slide::Right => coord.col != N - 1,
            }
    }

    #[inline]
    fn is_vertical(self) -> bool {
        matches!(self, Slide::Top | Slide::Bottom)
    }

    pub fn name(self) -> &'static str {
        match self {
            Slide::Top => "top",
            Slide::Bottom => "bottom",
            Slide::Left => "left",
            Slide::Right => "right",
        }
    }

    /// Parse a direction by name, initial, or number (0 top .. 3 right).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "top" | "t" | "0" => Some(Slide::Top),
            "bottom" | "b" | "1" => Some(Slide::Bottom),
            "left" | "l" | "2" => Some(Slide::Left),
            "right" | "r" | "3" => Some(Slide::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete move: the cube to take and where to push it back in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub coord: Coord,
    pub slide: Slide,
}

impl Move {
    pub const fn new(coord: Coord, slide: Slide) -> Self {
        Self { coord, slide }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.coord.row, self.coord.col, self.slide)
    }
}

/// Why a move was rejected. The board is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("{0} is not a perimeter cell")]
    NotPerimeter(Coord),
    #[error("{0} belongs to the opponent")]
    NotOwned(Coord),
    #[error("cannot slide {slide} from {coord}")]
    BlockedSlide { coord: Coord, slide: Slide },
}

/// A Quixo position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    cells: [Cell; NUM_CELLS],
    to_move: Player,
    ply: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The empty board with `X` to move.
    pub fn new() -> Self {
        Self {
            cells: [None; NUM_CELLS],
            to_move: Player::X,
            ply: 0,
        }
    }

    /// Build a position from a textual layout, one string per row.
    ///
    /// Each row holds `N` characters: `X`, `O`, or `.` for unmarked.
    /// Whitespace is ignored.
    pub fn from_rows(rows: [&str; N], to_move: Player) -> Option<Self> {
        let mut pos = Self::new();
        pos.to_move = to_move;
        for (r, row) in rows.iter().enumerate() {
            let marks: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if marks.len() != N {
                return None;
            }
            for (c, mark) in marks.into_iter().enumerate() {
                let cell = match mark.to_ascii_uppercase() {
                    'X' => Some(Player::X),
                    'O' => Some(Player::O),
                    '.' => None,
                    _ => return None,
                };
                pos.set(Coord::new(r, c), cell);
            }
        }
        Some(pos)
    }

    /// Reset to the empty board with `X` to move.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn get(&self, coord: Coord) -> Cell {
        debug_assert!(coord.in_bounds(), "{coord} is off the board");
        self.cells[coord.index()]
    }

    #[inline]
    pub(crate) fn set(&mut self, coord: Coord, cell: Cell) {
        debug_assert!(coord.in_bounds(), "{coord} is off the board");
        self.cells[coord.index()] = cell;
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell; NUM_CELLS] {
        &self.cells
    }

    #[inline]
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Number of moves played since the empty board.
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Hand the turn to the other player.
    pub fn advance_turn(&mut self) {
        self.to_move = self.to_move.other();
        self.ply += 1;
    }

    /// Lookup key over the cell contents, independent of whose turn it is.
    pub fn hash_key(&self) -> BoardKey {
        self.cells
            .iter()
            .map(|c| c.map_or('.', Player::symbol))
            .collect()
    }

    /// Take and slide for the player to move. The turn does not change.
    ///
    /// On error the position is left exactly as it was.
    pub fn apply(&mut self, mv: Move) -> Result<(), IllegalMove> {
        let saved = *self;
        self.take(mv.coord)?;
        if let Err(e) = self.slide(mv) {
            *self = saved;
            return Err(e);
        }
        Ok(())
    }

    /// Mark a perimeter cell that is unmarked or already ours.
    fn take(&mut self, coord: Coord) -> Result<(), IllegalMove> {
        if !coord.is_perimeter() {
            return Err(IllegalMove::NotPerimeter(coord));
        }
        match self.get(coord) {
            Some(owner) if owner != self.to_move => Err(IllegalMove::NotOwned(coord)),
            _ => {
                self.set(coord, Some(self.to_move));
                Ok(())
            }
        }
    }

    /// Remove the cube at `mv.coord` from its line and push it back in at
    /// the end named by `mv.slide`; the cubes in between shift one step.
    fn slide(&mut self, mv: Move) -> Result<(), IllegalMove> {
        let Move { coord, slide } = mv;
        if !slide.is_legal_from(coord) {
            return Err(IllegalMove::BlockedSlide { coord, slide });
        }

        let (line, origin): ([Coord; N], usize) = if slide.is_vertical() {
            (std::array::from_fn(|r| Coord::new(r, coord.col)), coord.row)
        } else {
            (std::array::from_fn(|c| Coord::new(coord.row, c)), coord.col)
        };

        let mut marks = line.map(|c| self.get(c));
        match slide {
            Slide::Top | Slide::Left => marks[..=origin].rotate_right(1),
            Slide::Bottom | Slide::Right => marks[origin..].rotate_left(1),
        }
        for (c, mark) in line.into_iter().zip(marks) {
            self.set(c, mark);
        }
        Ok(())
    }
}

/// Play a move and pass the turn.
///
/// # Errors
/// Returns the [`IllegalMove`] reason and leaves `pos` untouched if the take
/// or the slide is not allowed.
pub fn play_move(pos: &mut Position, mv: Move) -> Result<(), IllegalMove> {
    pos.apply(mv)?;
    pos.advance_turn();
    Ok(())
}

/// All legal moves for the player to move.
///
/// Perimeter cells are scanned in row-major order and directions in
/// [`Slide::ALL`] order, so the list is reproducible.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(MAX_MOVES);
    for coord in perimeter() {
        for slide in Slide::ALL {
            let mv = Move::new(coord, slide);
            let mut probe = *pos;
            if probe.apply(mv).is_ok() {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Cell indices of every line: rows, then columns, then the main diagonal,
/// then the anti-diagonal.
pub const LINES: [[usize; N]; NUM_LINES] = build_lines();

const fn build_lines() -> [[usize; N]; NUM_LINES] {
    let mut lines = [[0; N]; NUM_LINES];
    let mut i = 0;
    while i < N {
        let mut j = 0;
        while j < N {
            lines[i][j] = i * N + j;
            lines[N + i][j] = j * N + i;
            j += 1;
        }
        lines[2 * N][i] = i * N + i;
        lines[2 * N + 1][i] = i * N + (N - 1 - i);
        i += 1;
    }
    lines
}

/// The common owner of a run of cells, if they all share one.
pub fn run_owner(pos: &Position, run: &[usize]) -> Option<Player> {
    let first = pos.cells[*run.first()?]?;
    run.iter()
        .all(|&i| pos.cells[i] == Some(first))
        .then_some(first)
}

/// Return the winner, if any line is complete.
///
/// A slide can complete lines for both players at once. In that case the
/// player to move (the one who did not make the slide) wins.
pub fn check_winner(pos: &Position) -> Option<Player> {
    let mut complete = [false; 2];
    for line in &LINES {
        if let Some(owner) = run_owner(pos, line) {
            complete[owner.index()] = true;
        }
    }
    match complete {
        [true, true] => Some(pos.to_move),
        [true, false] => Some(Player::X),
        [false, true] => Some(Player::O),
        [false, false] => None,
    }
}

/// Parse a move written as `row col slide`, e.g. `"0 4 left"` or `"2,0,t"`.
///
/// Returns `None` for malformed input. Legality is not checked.
pub fn parse_move(s: &str) -> Option<Move> {
    let parts: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .collect();
    let [row, col, slide] = parts.as_slice() else {
        return None;
    };
    let coord = Coord::new(row.parse().ok()?, col.parse().ok()?);
    if !coord.in_bounds() {
        return None;
    }
    Some(Move::new(coord, Slide::parse(slide)?))
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..N {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for row in 0..N {
            write!(f, "{row} ")?;
            for col in 0..N {
                let ch = self.get(Coord::new(row, col)).map_or('.', Player::symbol);
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rows: [&str; N], to_move: Player) -> Position {
        Position::from_rows(rows, to_move).expect("valid layout")
    }

    #[test]
    fn test_empty_position() {
        let pos = Position::new();
        assert!(pos.cells().iter().all(|c| c.is_none()));
        assert_eq!(pos.to_move(), Player::X);
        assert_eq!(pos.ply(), 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "off the board")]
    fn test_get_rejects_wrapped_column() {
        // (0, 7) would alias cell (1, 2) without the bounds check
        let _ = Position::new().get(Coord::new(0, 7));
    }

    #[test]
    fn test_perimeter_has_sixteen_cells() {
        let cells: Vec<Coord> = perimeter().collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], Coord::new(0, 0));
        assert_eq!(cells[5], Coord::new(1, 0));
        assert_eq!(cells[15], Coord::new(4, 4));
    }

    #[test]
    fn test_corner_directions() {
        let expect = [
            (Coord::new(0, 0), [Slide::Bottom, Slide::Right]),
            (Coord::new(0, 4), [Slide::Bottom, Slide::Left]),
            (Coord::new(4, 0), [Slide::Top, Slide::Right]),
            (Coord::new(4, 4), [Slide::Top, Slide::Left]),
        ];
        for (corner, dirs) in expect {
            let legal: Vec<Slide> = Slide::ALL
                .into_iter()
                .filter(|s| s.is_legal_from(corner))
                .collect();
            assert_eq!(legal, dirs, "corner {corner}");
        }
    }

    #[test]
    fn test_edge_cannot_push_back_through_own_edge() {
        assert!(!Slide::Top.is_legal_from(Coord::new(0, 2)));
        assert!(!Slide::Bottom.is_legal_from(Coord::new(4, 1)));
        assert!(!Slide::Left.is_legal_from(Coord::new(3, 0)));
        assert!(!Slide::Right.is_legal_from(Coord::new(2, 4)));
        assert!(Slide::Left.is_legal_from(Coord::new(0, 2)));
    }

    #[test]
    fn test_take_rejects_interior() {
        let mut pos = Position::new();
        let err = pos.apply(Move::new(Coord::new(2, 2), Slide::Top));
        assert_eq!(err, Err(IllegalMove::NotPerimeter(Coord::new(2, 2))));
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn test_take_rejects_opponent_cube() {
        let mut pos = layout(["O....", ".....", ".....", ".....", "....."], Player::X);
        let before = pos;
        let err = pos.apply(Move::new(Coord::new(0, 0), Slide::Right));
        assert_eq!(err, Err(IllegalMove::NotOwned(Coord::new(0, 0))));
        assert_eq!(pos, before);
    }

    #[test]
    fn test_failed_slide_rolls_back_take() {
        let mut pos = Position::new();
        let err = pos.apply(Move::new(Coord::new(0, 0), Slide::Top));
        assert!(matches!(err, Err(IllegalMove::BlockedSlide { .. })));
        assert_eq!(pos.get(Coord::new(0, 0)), None);
    }

    #[test]
    fn test_slide_right_from_middle_shifts_tail() {
        let mut pos = layout(["XO.OX", ".....", ".....", ".....", "....."], Player::O);
        play_move(&mut pos, Move::new(Coord::new(0, 2), Slide::Right)).unwrap();
        assert_eq!(&pos.hash_key()[..N], "XOOXO");
    }

    #[test]
    fn test_slide_top_from_bottom_rotates_column() {
        let mut pos = layout([".....", "X....", "O....", ".....", "....."], Player::X);
        play_move(&mut pos, Move::new(Coord::new(4, 0), Slide::Top)).unwrap();
        let column: Vec<Cell> = (0..N).map(|r| pos.get(Coord::new(r, 0))).collect();
        assert_eq!(
            column,
            vec![Some(Player::X), None, Some(Player::X), Some(Player::O), None]
        );
    }

    #[test]
    fn test_play_move_advances_turn() {
        let mut pos = Position::new();
        play_move(&mut pos, Move::new(Coord::new(0, 1), Slide::Bottom)).unwrap();
        assert_eq!(pos.to_move(), Player::O);
        assert_eq!(pos.ply(), 1);
        assert_eq!(pos.get(Coord::new(4, 1)), Some(Player::X));
    }

    #[test]
    fn test_legal_moves_on_empty_board() {
        let moves = legal_moves(&Position::new());
        assert_eq!(moves.len(), MAX_MOVES);
        assert_eq!(moves[0], Move::new(Coord::new(0, 0), Slide::Bottom));
    }

    #[test]
    fn test_lines_table() {
        assert_eq!(LINES[0], [0, 1, 2, 3, 4]);
        assert_eq!(LINES[N], [0, 5, 10, 15, 20]);
        assert_eq!(LINES[2 * N], [0, 6, 12, 18, 24]);
        assert_eq!(LINES[2 * N + 1], [4, 8, 12, 16, 20]);
    }

    #[test]
    fn test_check_winner_anti_diagonal() {
        let pos = layout(["....O", "...O.", "..O..", ".O...", "O...."], Player::X);
        assert_eq!(check_winner(&pos), Some(Player::O));
    }

    #[test]
    fn test_check_winner_double_line_goes_to_player_to_move() {
        let pos = layout(["XXXXX", "OOOOO", ".....", ".....", "....."], Player::O);
        assert_eq!(check_winner(&pos), Some(Player::O));
        let pos = layout(["XXXXX", "OOOOO", ".....", ".....", "....."], Player::X);
        assert_eq!(check_winner(&pos), Some(Player::X));
    }

    #[test]
    fn test_hash_key_ignores_turn() {
        let a = layout(["X....", ".....", "..O..", ".....", "....."], Player::X);
        let b = layout(["X....", ".....", "..O..", ".....", "....."], Player::O);
        assert_eq!(a.hash_key(), b.hash_key());
        assert_eq!(a.hash_key().len(), NUM_CELLS);
        assert_ne!(a.hash_key(), Position::new().hash_key());
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            parse_move("0 4 left"),
            Some(Move::new(Coord::new(0, 4), Slide::Left))
        );
        assert_eq!(
            parse_move("2,0,T"),
            Some(Move::new(Coord::new(2, 0), Slide::Top))
        );
        assert_eq!(
            parse_move("4 4 1"),
            Some(Move::new(Coord::new(4, 4), Slide::Bottom))
        );
        assert_eq!(parse_move("5 0 top"), None);
        assert_eq!(parse_move("0 0"), None);
        assert_eq!(parse_move("0 0 up"), None);
    }

    #[test]
    fn test_move_display_parses_back() {
        let mv = Move::new(Coord::new(3, 4), Slide::Top);
        assert_eq!(parse_move(&mv.to_string()), Some(mv));
    }

    #[test]
    fn test_from_rows_rejects_bad_layout() {
        let short = ["XXXX", ".....", ".....", ".....", "....."];
        assert!(Position::from_rows(short, Player::X).is_none());
        let bad_mark = ["XXXXZ", ".....", ".....", ".....", "....."];
        assert!(Position::from_rows(bad_mark, Player::X).is_none());
    }
}
