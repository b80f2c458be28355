/// Tile grid: storage and geometry queries.
///
/// ## Coordinates
///
/// `(x, y)` in tile units, origin at the top-left, y increasing downward.
/// Queries take `i32` so callers can probe outside the grid freely during
/// movement enumeration; out-of-bounds reads answer conservatively
/// (`Tile::Empty`, not solid) instead of erroring.
///
/// ## Legend (text format, shared with the level loader)
///
///   '#' = Ground    '=' = Platform
///   'S' = Start     'G' = Goal      ' ' = Empty

use super::tile::Tile;

// ── Position ──

/// A tile coordinate. Value type, compared and hashed by (x, y).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Heuristic distance for the solver: no diagonal movement exists,
    /// so Manhattan fits better than Euclidean.
    pub fn manhattan_distance(&self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

// ── Grid ──

pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// A fresh grid with a full ground row along the bottom.
    /// Generation may later punch gaps into it.
    pub fn new(width: i32, height: i32) -> Self {
        let mut tiles = vec![vec![Tile::Empty; width as usize]; height as usize];
        if height > 0 {
            for cell in tiles[(height - 1) as usize].iter_mut() {
                *cell = Tile::Ground;
            }
        }
        Grid { width, height, tiles }
    }

    /// Build a grid from ascii rows using the legend above.
    /// Rows are right-padded to the widest row.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Grid {
            width,
            height,
            tiles: vec![vec![Tile::Empty; width as usize]; height as usize],
        };
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                grid.tiles[y][x] = match ch {
                    '#' => Tile::Ground,
                    '=' => Tile::Platform,
                    'S' => Tile::Start,
                    'G' => Tile::Goal,
                    _ => Tile::Empty,
                };
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    // ── Queries ──

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile at (x, y). Out of bounds reads as Empty.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[y as usize][x as usize]
        } else {
            Tile::Empty
        }
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[y as usize][x as usize] = tile;
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_solid()
    }

    /// Solid tile directly beneath (x, y)?
    pub fn has_support_below(&self, x: i32, y: i32) -> bool {
        self.is_solid(x, y + 1)
    }

    /// Can an agent stand here? Non-solid with solid support beneath.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.tile(x, y).is_passable() && self.has_support_below(x, y)
    }

    // ── Markers ──

    pub fn start(&self) -> Option<Position> {
        self.find_marker(|t| t.is_start())
    }

    pub fn goal(&self) -> Option<Position> {
        self.find_marker(|t| t.is_goal())
    }

    fn find_marker(&self, pred: impl Fn(Tile) -> bool) -> Option<Position> {
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                if pred(tile) {
                    return Some(Position::new(x as i32, y as i32));
                }
            }
        }
        None
    }

    /// How many tiles of this type exist? (fitness input)
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles
            .iter()
            .map(|row| row.iter().filter(|&&t| t == tile).count())
            .sum()
    }

    // ── Text rendering (report output and debugging) ──

    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity(((self.width + 3) * (self.height + 2)) as usize);
        out.push('+');
        for _ in 0..self.width {
            out.push('-');
        }
        out.push_str("+\n");
        for row in &self.tiles {
            out.push('|');
            for &tile in row {
                out.push(match tile {
                    Tile::Empty => ' ',
                    Tile::Ground => '#',
                    Tile::Platform => '=',
                    Tile::Start => 'S',
                    Tile::Goal => 'G',
                });
            }
            out.push_str("|\n");
        }
        out.push('+');
        for _ in 0..self.width {
            out.push('-');
        }
        out.push_str("+\n");
        out
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_has_ground_floor() {
        let g = Grid::new(5, 4);
        for x in 0..5 {
            assert_eq!(g.tile(x, 3), Tile::Ground);
            assert_eq!(g.tile(x, 2), Tile::Empty);
        }
    }

    #[test]
    fn out_of_bounds_reads_empty() {
        let g = Grid::new(5, 4);
        assert_eq!(g.tile(-1, 0), Tile::Empty);
        assert_eq!(g.tile(5, 0), Tile::Empty);
        assert_eq!(g.tile(0, 4), Tile::Empty);
        assert!(!g.is_solid(99, 99));
        assert!(!g.in_bounds(5, 0));
    }

    #[test]
    fn set_outside_is_ignored() {
        let mut g = Grid::new(3, 3);
        g.set(10, 10, Tile::Platform);
        assert_eq!(g.count(Tile::Platform), 0);
    }

    #[test]
    fn walkable_needs_support() {
        let g = Grid::from_rows(&[
            "   ",
            " = ",
        ]);
        assert!(g.is_walkable(1, 0)); // above the platform
        assert!(!g.is_walkable(0, 0)); // nothing beneath
        assert!(!g.is_walkable(1, 1)); // solid itself
    }

    #[test]
    fn support_below_matches_solidity() {
        let g = Grid::from_rows(&[
            " ",
            "#",
        ]);
        assert!(g.has_support_below(0, 0));
        assert!(!g.has_support_below(0, 1)); // below the floor is out of bounds
    }

    #[test]
    fn markers_are_found() {
        let g = Grid::from_rows(&[
            "S  G",
            "####",
        ]);
        assert_eq!(g.start(), Some(Position::new(0, 0)));
        assert_eq!(g.goal(), Some(Position::new(3, 0)));
    }

    #[test]
    fn missing_markers_are_none() {
        let g = Grid::new(4, 4);
        assert!(g.start().is_none());
        assert!(g.goal().is_none());
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let g = Grid::from_rows(&[
            "#",
            "###",
        ]);
        assert_eq!(g.width(), 3);
        assert_eq!(g.tile(2, 0), Tile::Empty);
        assert_eq!(g.tile(2, 1), Tile::Ground);
    }

    #[test]
    fn render_text_round_trips_legend() {
        let g = Grid::from_rows(&[
            "S G",
            "#=#",
        ]);
        let text = g.render_text();
        assert!(text.contains("|S G|"));
        assert!(text.contains("|#=#|"));
    }

    #[test]
    fn manhattan_distance() {
        let a = Position::new(1, 8);
        let b = Position::new(18, 2);
        assert_eq!(a.manhattan_distance(b), 23);
        assert_eq!(b.manhattan_distance(a), 23);
        assert_eq!(a.manhattan_distance(a), 0);
    }
}
