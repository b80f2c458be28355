/// Movement capability engine — single source of truth for what an agent
/// can do from a given tile.
///
/// ## Movement kinds
///
///   Run  — one tile left/right along the same row, onto supported ground.
///   Jump — an instantaneous height+distance transition, validated by a
///          discretized line-of-sight check instead of simulating an arc.
///   Fall — vertical descent to the first supported landing below.
///
/// ## Rules
///
/// Run and Jump require solid support beneath the origin; Fall requires the
/// opposite. Every emitted destination is in-bounds, non-solid, and has
/// solid support beneath it — the solver never has to re-validate.
///
/// Jumps are pruned: for a given (direction, rise) only the farthest
/// reachable horizontal distance is emitted. Under the flat per-jump cost
/// the shorter variants are dominated, and the pruning keeps the branching
/// factor small.

use super::grid::{Grid, Position};

const DIRECTIONS: [i32; 2] = [-1, 1]; // left, right

/// Tunable movement physics. Loaded from config.toml; the defaults are the
/// reference parameters the fitness scoring was calibrated against.
#[derive(Clone, Copy, Debug)]
pub struct MovementRules {
    pub run_cost: u32,
    pub jump_cost: u32,
    pub fall_cost: u32,
    /// Maximum rise of a jump, in tiles. Falling jumps may descend by the
    /// same amount.
    pub jump_height: i32,
    /// Maximum horizontal distance of a jump, in tiles.
    pub jump_distance: i32,
    /// Maximum survivable fall scan depth, in tiles.
    pub max_fall: i32,
}

impl Default for MovementRules {
    fn default() -> Self {
        MovementRules {
            run_cost: 1,
            jump_cost: 5,
            fall_cost: 1,
            jump_height: 3,
            jump_distance: 4,
            max_fall: 10,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveKind {
    Run,
    Jump,
    Fall,
}

/// A directed transition between two tiles. Produced fresh per query,
/// never mutated.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    pub from: Position,
    pub to: Position,
    pub kind: MoveKind,
    pub cost: u32,
}

impl Movement {
    #[allow(dead_code)]
    pub fn horizontal_distance(&self) -> i32 {
        (self.to.x - self.from.x).abs()
    }

    #[allow(dead_code)]
    pub fn vertical_distance(&self) -> i32 {
        (self.to.y - self.from.y).abs()
    }
}

/// Stateless movement enumerator over a read-only grid snapshot.
pub struct MovementModel<'a> {
    grid: &'a Grid,
    rules: MovementRules,
}

impl<'a> MovementModel<'a> {
    pub fn new(grid: &'a Grid, rules: MovementRules) -> Self {
        MovementModel { grid, rules }
    }

    /// Does the agent have solid ground beneath it here?
    pub fn on_ground(&self, pos: Position) -> bool {
        self.grid.has_support_below(pos.x, pos.y)
    }

    /// All legal movements from `from`. The position need not be
    /// pre-validated; an illegal origin simply yields fewer (or no)
    /// movements. Deterministic for a fixed grid and position.
    pub fn enumerate_movements(&self, from: Position) -> Vec<Movement> {
        let mut moves = Vec::new();

        if self.on_ground(from) {
            for dir in DIRECTIONS {
                if let Some(to) = self.run_target(from, dir) {
                    moves.push(Movement {
                        from,
                        to,
                        kind: MoveKind::Run,
                        cost: self.rules.run_cost,
                    });
                }
            }

            for dir in DIRECTIONS {
                for rise in -self.rules.jump_height..=self.rules.jump_height {
                    if let Some(to) = self.jump_target(from, dir, rise) {
                        moves.push(Movement {
                            from,
                            to,
                            kind: MoveKind::Jump,
                            cost: self.rules.jump_cost,
                        });
                    }
                }
            }
        } else if let Some(to) = self.fall_target(from) {
            moves.push(Movement {
                from,
                to,
                kind: MoveKind::Fall,
                cost: self.rules.fall_cost,
            });
        }

        moves
    }

    // ── Run ──

    fn run_target(&self, from: Position, dir: i32) -> Option<Position> {
        let to = Position::new(from.x + dir, from.y);
        if self.grid.is_walkable(to.x, to.y) {
            Some(to)
        } else {
            None
        }
    }

    // ── Jump ──

    /// Farthest landing for a jump in `dir` that ends `rise` tiles higher
    /// (negative = falling jump). None if no distance in range lands on a
    /// walkable tile with a clear line of sight.
    fn jump_target(&self, from: Position, dir: i32, rise: i32) -> Option<Position> {
        let mut farthest = None;
        for dist in 1..=self.rules.jump_distance {
            let to = Position::new(from.x + dir * dist, from.y - rise);
            if !self.grid.is_walkable(to.x, to.y) {
                continue;
            }
            if self.line_clear(from, to) {
                farthest = Some(to);
            }
        }
        farthest
    }

    /// Bresenham walk from `from` to `to`; endpoints excluded. Any solid
    /// intermediate cell blocks the jump.
    fn line_clear(&self, from: Position, to: Position) -> bool {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        let x_step = if to.x > from.x { 1 } else { -1 };
        let y_step = if to.y > from.y { 1 } else { -1 };

        let mut x = from.x;
        let mut y = from.y;

        if dx > dy {
            let mut error = dx / 2;
            while x != to.x {
                x += x_step;
                error -= dy;
                if error < 0 {
                    y += y_step;
                    error += dx;
                }
                if !(x == to.x && y == to.y) && self.grid.is_solid(x, y) {
                    return false;
                }
            }
        } else {
            let mut error = dy / 2;
            while y != to.y {
                y += y_step;
                error -= dx;
                if error < 0 {
                    x += x_step;
                    error += dy;
                }
                if !(x == to.x && y == to.y) && self.grid.is_solid(x, y) {
                    return false;
                }
            }
        }
        true
    }

    // ── Fall ──

    /// First supported landing below `from`, scanning at most `max_fall`
    /// rows. A solid row or the grid edge ends the scan with no landing.
    fn fall_target(&self, from: Position) -> Option<Position> {
        for drop in 1..=self.rules.max_fall {
            let to = Position::new(from.x, from.y + drop);
            if !self.grid.in_bounds(to.x, to.y) {
                return None;
            }
            if self.grid.is_solid(to.x, to.y) {
                return None;
            }
            if self.grid.has_support_below(to.x, to.y) {
                return Some(to);
            }
        }
        None
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
