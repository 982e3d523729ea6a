use serde::{Deserialize, Serialize};

/// Integer cell coordinate. May lie outside any grid; the grid decides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Enumeration order used when listing neighbors.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];
}

/// Row-major flat grid. No per-cell objects.
/// Neighbor lookups wrap on the axis being moved along (toroidal topology).
#[derive(Clone, Debug)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy> Grid<T> {
    pub fn filled(w: usize, h: usize, value: T) -> Self {
        Self {
            data: vec![value; w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && (pos.x as usize) < self.w && pos.y >= 0 && (pos.y as usize) < self.h
    }

    #[inline]
    fn idx(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.w + pos.x as usize)
    }

    /// Cell value, or `None` when `pos` is outside the grid.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<T> {
        self.idx(pos).map(|i| self.data[i])
    }

    /// Writes `v` at `pos`. Returns false (and writes nothing) when out of bounds.
    #[inline]
    pub fn set(&mut self, pos: Position, v: T) -> bool {
        match self.idx(pos) {
            Some(i) => {
                self.data[i] = v;
                true
            }
            None => false,
        }
    }

    /// Adjacent position in `dir`, wrapping past the edge on that axis only.
    /// `None` iff `pos` itself is out of bounds.
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        if !self.in_bounds(pos) {
            return None;
        }
        let w = self.w as i32;
        let h = self.h as i32;
        let next = match dir {
            Direction::Right => Position::new((pos.x + 1).rem_euclid(w), pos.y),
            Direction::Left => Position::new((pos.x - 1).rem_euclid(w), pos.y),
            Direction::Up => Position::new(pos.x, (pos.y - 1).rem_euclid(h)),
            Direction::Down => Position::new(pos.x, (pos.y + 1).rem_euclid(h)),
        };
        Some(next)
    }

    /// 4-connected neighbors in `Direction::ALL` order, absent ones dropped.
    pub fn neighbors4(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(pos, dir))
    }

    /// Row-major iteration over `(position, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (Position, T)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = (i % self.w) as i32;
            let y = (i / self.w) as i32;
            (Position::new(x, y), v)
        })
    }
}
