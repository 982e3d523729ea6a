use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Wall,
    Empty,
}

impl Cell {
    pub fn as_str(self) -> &'static str {
        match self {
            Cell::Wall => "wall",
            Cell::Empty => "empty",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown cell state {0:?} (expected \"wall\" or \"empty\")")]
pub struct CellParseError(pub String);

impl FromStr for Cell {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wall" => Ok(Cell::Wall),
            "empty" => Ok(Cell::Empty),
            other => Err(CellParseError(other.to_string())),
        }
    }
}

/// Wall/empty cell grid carved by a random walk.
#[derive(Clone, Debug)]
pub struct Dungeon {
    pub grid: Grid<Cell>,
}

impl Dungeon {
    /// Every cell starts as a wall.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            grid: Grid::filled(w, h, Cell::Wall),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.w
    }

    pub fn height(&self) -> usize {
        self.grid.h
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.grid.in_bounds(pos)
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.grid.get(pos)
    }

    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        self.grid.set(pos, cell)
    }

    /// Untyped write. Unknown state names are rejected like out-of-bounds writes.
    pub fn set_named(&mut self, pos: Position, state: &str) -> bool {
        match state.parse::<Cell>() {
            Ok(cell) => self.set(pos, cell),
            Err(err) => {
                log::debug!("rejected write at {:?}: {}", pos, err);
                false
            }
        }
    }

    pub fn set_wall(&mut self, pos: Position) -> bool {
        self.set(pos, Cell::Wall)
    }

    pub fn set_empty(&mut self, pos: Position) -> bool {
        self.set(pos, Cell::Empty)
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Wall)
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.grid.data.iter().filter(|&&c| c == cell).count()
    }

    /// Middle cell, rounded down on odd sizes.
    pub fn center(&self) -> Position {
        Position::new((self.grid.w / 2) as i32, (self.grid.h / 2) as i32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkStats {
    pub steps: usize,
    /// Cells turned from wall to empty by this walk.
    pub carved: usize,
    pub end: Position,
}

/// Carve `steps` cells by walking from `start` to a uniformly chosen
/// neighbor each step. Edges wrap, so the walk is never blocked.
/// An out-of-bounds `start` has no neighbors and carves nothing.
pub fn random_walk(
    dungeon: &mut Dungeon,
    start: Position,
    steps: usize,
    rng: &mut impl RandomSource,
) -> WalkStats {
    let mut current = start;
    let mut carved = 0;

    for _ in 0..steps {
        if dungeon.is_wall(current) {
            carved += 1;
        }
        dungeon.set_empty(current);

        let n = dungeon.grid.neighbors4(current).count();
        if n > 0 {
            let pick = rng.uniform_int(n);
            if let Some(next) = dungeon.grid.neighbors4(current).nth(pick) {
                current = next;
            }
        }
    }

    log::debug!(
        "random walk from {:?}: {} steps, {} cells carved, ended at {:?}",
        start,
        steps,
        carved,
        current
    );

    WalkStats {
        steps,
        carved,
        end: current,
    }
}
