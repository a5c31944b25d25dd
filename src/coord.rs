use std::fmt;

use itertools::Itertools;


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;
pub const NUM_SQUARES: usize = NUM_ROWS as usize * NUM_COLS as usize;

// All four diagonal directions as (d_row, d_col).
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];


// Row 0 is the top of the board (Black's home rank), row 7 is the bottom (White's home rank).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < NUM_ROWS && col < NUM_COLS);
        Self{ row, col }
    }
    pub fn try_new(row: i64, col: i64) -> Option<Self> {
        let row = u8::try_from(row).ok()?;
        let col = u8::try_from(col).ok()?;
        (row < NUM_ROWS && col < NUM_COLS).then_some(Self{ row, col })
    }
    pub fn from_index(idx: usize) -> Self {
        assert!(idx < NUM_SQUARES);
        Self::new((idx / NUM_COLS as usize) as u8, (idx % NUM_COLS as usize) as u8)
    }

    pub const fn row(self) -> u8 { self.row }
    pub const fn col(self) -> u8 { self.col }
    pub const fn to_index(self) -> usize { self.row as usize * NUM_COLS as usize + self.col as usize }

    // Only dark squares are ever occupied.
    pub const fn is_dark(self) -> bool { (self.row + self.col) % 2 == 1 }

    pub fn all() -> impl Iterator<Item = Coord> {
        (0..NUM_ROWS).cartesian_product(0..NUM_COLS).map(|(row, col)| Coord{ row, col })
    }
    pub fn all_dark() -> impl Iterator<Item = Coord> { Self::all().filter(|c| c.is_dark()) }

    pub fn offset(self, (d_row, d_col): (i8, i8)) -> Option<Coord> {
        Self::try_new(self.row as i64 + d_row as i64, self.col as i64 + d_col as i64)
    }

    // Squares along a ray, starting next to `self` and stopping at the board edge.
    pub fn ray(self, direction: (i8, i8)) -> impl Iterator<Item = Coord> {
        std::iter::successors(self.offset(direction), move |c| c.offset(direction))
    }

    // Parses "row,col", e.g. "5,0".
    pub fn from_text(s: &str) -> Option<Self> {
        let (row, col) = s.trim().split(',').map(|v| v.trim().parse::<i64>()).collect_tuple()?;
        Self::try_new(row.ok()?, col.ok()?)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({},{})", self.row, self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for coord in Coord::all() {
            assert_eq!(Coord::from_index(coord.to_index()), coord);
        }
        assert_eq!(Coord::all().count(), NUM_SQUARES);
        assert_eq!(Coord::all_dark().count(), NUM_SQUARES / 2);
    }

    #[test]
    fn ray_stops_at_edge() {
        let ray = Coord::new(2, 3).ray((-1, 1)).collect_vec();
        assert_eq!(ray, vec![Coord::new(1, 4), Coord::new(0, 5)]);
        assert_eq!(Coord::new(0, 0).ray((-1, -1)).count(), 0);
    }

    #[test]
    fn parse_text() {
        assert_eq!(Coord::from_text("5,0"), Some(Coord::new(5, 0)));
        assert_eq!(Coord::from_text(" 7 , 6 "), Some(Coord::new(7, 6)));
        assert_eq!(Coord::from_text("8,0"), None);
        assert_eq!(Coord::from_text("-1,0"), None);
        assert_eq!(Coord::from_text("a1"), None);
    }
}
