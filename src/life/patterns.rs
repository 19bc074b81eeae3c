//! Starting patterns for a fresh simulation.

use serde::{Deserialize, Serialize};

/// A named way to seed the grid.
///
/// # Rust concept: deriving across crates
/// One enum serves the CLI (`clap::ValueEnum`), the HTTP API (`serde`), and
/// the OpenAPI docs (`utoipa::ToSchema`). Each derive generates its own
/// impl, so the list of patterns is written once.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Random soup at the configured density
    #[default]
    Random,
    Glider,
    Blinker,
    Block,
    Toad,
    Beacon,
    MediumSpaceship,
}

impl Pattern {
    pub const ALL: [Pattern; 7] = [
        Pattern::Random,
        Pattern::Glider,
        Pattern::Blinker,
        Pattern::Block,
        Pattern::Toad,
        Pattern::Beacon,
        Pattern::MediumSpaceship,
    ];

    /// The pattern as rows of `#` (alive) and `.` (dead).
    /// `Random` has no fixed shape.
    pub fn rows(self) -> Option<&'static [&'static str]> {
        let rows: &'static [&'static str] = match self {
            Pattern::Random => return None,
            Pattern::Glider => &[".#.", "..#", "###"],
            Pattern::Blinker => &["###"],
            Pattern::Block => &["##", "##"],
            Pattern::Toad => &[".###", "###."],
            Pattern::Beacon => &["##..", "##..", "..##", "..##"],
            Pattern::MediumSpaceship => &["..#...", "#...#.", ".....#", "#....#", ".#####"],
        };
        Some(rows)
    }

    /// Live cells of this pattern centred on a `width` x `height` grid.
    ///
    /// Patterns larger than the grid wrap around its edges.
    pub fn place(self, width: usize, height: usize) -> Vec<(usize, usize)> {
        let Some(rows) = self.rows() else {
            return Vec::new();
        };
        let pattern_width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let x0 = width.saturating_sub(pattern_width) / 2;
        let y0 = height.saturating_sub(rows.len()) / 2;

        rows.iter()
            .enumerate()
            .flat_map(|(dy, row)| {
                row.bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'#')
                    .map(move |(dx, _)| ((x0 + dx) % width, (y0 + dy) % height))
            })
            .collect()
    }
}

/// How the grid is filled on every reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seed {
    Pattern(Pattern),
    /// Explicit live cells; coordinates wrap onto the grid.
    Cells(Vec<(usize, usize)>),
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Pattern(Pattern::Random)
    }
}

impl From<Pattern> for Seed {
    fn from(pattern: Pattern) -> Self {
        Seed::Pattern(pattern)
    }
}
