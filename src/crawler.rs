//! A single pixel wandering the panel, leaving a trail.
//!
//! A lighter alternative to the Life engine that exercises the same
//! `Renderer` trait: wrap-around movement and random colors.

use crate::Color;
use crate::renderer::Renderer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Steps between color changes.
pub const RECOLOR_EVERY: u64 = 50;

/// One turn in this many steps goes left, and the same share goes right.
const TURN_ODDS: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn turn_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// `(dx, dy)` for one step; y grows downwards.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

pub struct Crawler<R: Renderer> {
    renderer: R,
    x: usize,
    y: usize,
    direction: Direction,
    color: Color,
    steps: u64,
    rng: StdRng,
}

impl<R: Renderer> Crawler<R> {
    /// Start on a random cell, heading in a random direction.
    pub fn new(renderer: R, rng_seed: Option<u64>) -> Self {
        let mut rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let x = rng.random_range(0..renderer.width());
        let y = rng.random_range(0..renderer.height());
        let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        let color = renderer.random_vivid_color(&mut rng);
        tracing::debug!(x, y, ?direction, "Crawler starting");
        Self {
            x,
            y,
            renderer,
            direction,
            color,
            steps: 0,
            rng,
        }
    }

    /// Paint the current cell, maybe turn, then move one cell.
    pub fn step(&mut self) {
        self.renderer.set_pixel(self.x, self.y, self.color);
        self.renderer.present();

        match self.rng.random_range(0..TURN_ODDS) {
            0 => self.direction = self.direction.turn_left(),
            1 => self.direction = self.direction.turn_right(),
            _ => {}
        }

        let (dx, dy) = self.direction.delta();
        self.x = self.renderer.wrap_x(self.x, dx);
        self.y = self.renderer.wrap_y(self.y, dy);

        self.steps += 1;
        if self.steps % RECOLOR_EVERY == 0 {
            self.color = self.renderer.random_vivid_color(&mut self.rng);
            tracing::debug!(steps = self.steps, "Crawler changed color");
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FrameBuffer;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Up, Direction::Left, Direction::Right)]
    #[case(Direction::Right, Direction::Up, Direction::Down)]
    #[case(Direction::Down, Direction::Right, Direction::Left)]
    #[case(Direction::Left, Direction::Down, Direction::Up)]
    fn test_turns(#[case] from: Direction, #[case] left: Direction, #[case] right: Direction) {
        assert_eq!(from.turn_left(), left);
        assert_eq!(from.turn_right(), right);
        assert_eq!(from.turn_left().turn_right(), from);
    }

    #[test]
    fn starts_at_a_random_cell_and_heading() {
        let starts: Vec<_> = (0..32)
            .map(|seed| {
                let crawler = Crawler::new(FrameBuffer::new(10, 6), Some(seed));
                let (x, y) = crawler.position();
                assert!(x < 10 && y < 6, "started off the panel at ({x},{y})");
                (crawler.position(), crawler.direction())
            })
            .collect();

        let first = starts[0];
        assert!(starts.iter().any(|&(pos, _)| pos != first.0));
        assert!(starts.iter().any(|&(_, dir)| dir != first.1));
    }

    #[test]
    fn each_step_moves_one_cell_with_wrap() {
        let mut crawler = Crawler::new(FrameBuffer::new(7, 5), Some(3));
        for _ in 0..500 {
            let (x, y) = crawler.position();
            let painted = crawler.color();
            crawler.step();

            assert_eq!(crawler.renderer().pixel(x, y), painted);
            let (nx, ny) = crawler.position();
            let dx = (nx + 7 - x) % 7;
            let dy = (ny + 5 - y) % 5;
            let moved = [(1, 0), (6, 0), (0, 1), (0, 4)];
            assert!(moved.contains(&(dx, dy)), "jumped from ({x},{y}) to ({nx},{ny})");
        }
        assert_eq!(crawler.renderer().presented(), 500);
    }

    #[test]
    fn recolors_on_schedule() {
        let mut crawler = Crawler::new(FrameBuffer::new(8, 8), Some(9));
        let mut colors = vec![crawler.color()];
        for _ in 0..RECOLOR_EVERY * 4 {
            crawler.step();
            if crawler.steps() % RECOLOR_EVERY != 0 {
                assert_eq!(crawler.color(), *colors.last().unwrap());
            } else {
                colors.push(crawler.color());
            }
        }
        assert_eq!(crawler.steps(), 200);
        assert_eq!(colors.len(), 5);
    }

    #[test]
    fn seeded_crawlers_agree() {
        let mut a = Crawler::new(FrameBuffer::new(16, 16), Some(42));
        let mut b = Crawler::new(FrameBuffer::new(16, 16), Some(42));
        for _ in 0..100 {
            a.step();
            b.step();
        }
        assert_eq!(a.position(), b.position());
        assert_eq!(a.renderer().pixels(), b.renderer().pixels());
    }
}
