//! Cell storage and the Game of Life rules.
//!
//! The grid is a flat row-major `Vec<Cell>` indexed by `y * width + x`.
//! Edges wrap on both axes.

use crate::LifeError;
use crate::renderer::wrap_coordinate;

/// What happens to a cell at the end of the current generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transition {
    #[default]
    Stable,
    Birth,
    Death,
}

/// One grid position: its state now, its pending transition, and its
/// state over the last three generations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub alive: bool,
    pub pending: Transition,
    pub prev1: bool,
    pub prev2: bool,
    pub prev3: bool,
}

impl Cell {
    fn shift_history(&mut self) {
        self.prev3 = self.prev2;
        self.prev2 = self.prev1;
        self.prev1 = self.alive;
    }
}

/// Result of applying one generation's pending transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplySummary {
    pub births: usize,
    pub deaths: usize,
    /// Every cell matches its state two generations back.
    pub matches_two_back: bool,
    /// Every cell matches its state three generations back.
    pub matches_three_back: bool,
}

impl ApplySummary {
    pub fn changes(&self) -> usize {
        self.births + self.deaths
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// Anything narrower than 3 cells on either axis would make a cell
    /// its own neighbour after wrapping, so it is rejected.
    pub fn new(width: usize, height: usize) -> Result<Self, LifeError> {
        if width < 3 || height < 3 {
            return Err(LifeError::GridTooSmall { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    /// Set a cell's state directly, discarding its history.
    pub fn set_alive(&mut self, x: usize, y: usize, alive: bool) {
        let i = self.index(x, y);
        self.cells[i] = Cell {
            alive,
            ..Cell::default()
        };
    }

    /// Kill every cell and forget all history.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn count_alive(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    /// Iterate over `(x, y, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % width, i / width, cell))
    }

    /// Coordinates of every live cell, row-major.
    pub fn alive_cells(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|(_, _, c)| c.alive)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Live cells in the 3x3 window around `(x, y)`, counted from -1.
    ///
    /// For a live centre the centre cancels the -1, giving the true
    /// neighbour count. For a dead centre the result is one less than the
    /// neighbour count, so a birth happens at 2, not 3.
    pub fn window_count(&self, x: usize, y: usize) -> i32 {
        let mut count = -1;
        for dx in -1..=1 {
            let xt = wrap_coordinate(x, dx, self.width);
            for dy in -1..=1 {
                let yt = wrap_coordinate(y, dy, self.height);
                if self.cells[yt * self.width + xt].alive {
                    count += 1;
                }
            }
        }
        count
    }

    /// Flag every cell's transition for the next generation.
    ///
    /// Returns `(births, deaths)` pending. Stale flags from the previous
    /// generation are overwritten.
    pub fn evaluate_rules(&mut self) -> (usize, usize) {
        let mut births = 0;
        let mut deaths = 0;

        for y in 0..self.height {
            for x in 0..self.width {
                let count = self.window_count(x, y);
                let cell = &mut self.cells[y * self.width + x];
                cell.pending = match (cell.alive, count) {
                    (true, c) if !(2..=3).contains(&c) => Transition::Death,
                    (false, 2) => Transition::Birth,
                    _ => Transition::Stable,
                };
                match cell.pending {
                    Transition::Birth => births += 1,
                    Transition::Death => deaths += 1,
                    Transition::Stable => {}
                }
            }
        }

        (births, deaths)
    }

    /// Shift each cell's history and apply its pending transition.
    ///
    /// Pending flags are left in place so the caller can still see which
    /// cells changed.
    pub fn apply_pending(&mut self) -> ApplySummary {
        let mut summary = ApplySummary {
            births: 0,
            deaths: 0,
            matches_two_back: true,
            matches_three_back: true,
        };

        for cell in &mut self.cells {
            cell.shift_history();
            match cell.pending {
                Transition::Birth => {
                    cell.alive = true;
                    summary.births += 1;
                }
                Transition::Death => {
                    cell.alive = false;
                    summary.deaths += 1;
                }
                Transition::Stable => {}
            }
            summary.matches_two_back &= cell.alive == cell.prev2;
            summary.matches_three_back &= cell.alive == cell.prev3;
        }

        summary
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x},{y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }
}
